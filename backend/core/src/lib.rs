pub mod error;
pub mod traits;
pub mod types;

pub use error::TexplainError;
pub use traits::{FormulaRecognizer, LlmProvider, LlmRequest, LlmResponse};
pub use types::{ProviderKind, DEFAULT_OCR_BIN, DEFAULT_OCR_TIMEOUT_SECS};
