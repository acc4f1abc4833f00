//! Default values for every config field.

pub use texplain_core::{DEFAULT_OCR_BIN, DEFAULT_OCR_TIMEOUT_SECS};

/// Model used for explanations.
pub const DEFAULT_MODEL: &str = "qwen-3-235b-a22b-instruct-2507";

/// Completion token ceiling.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Seconds allowed for the whole HTTP round trip.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Console log level when neither `RUST_LOG` nor `-v` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
