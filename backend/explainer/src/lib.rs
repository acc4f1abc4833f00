pub mod explain;
pub mod providers;

pub use explain::{build_prompt, ExplainSettings, Explainer, PROMPT_PREFIX};
pub use providers::{build_provider, ProviderSettings};
