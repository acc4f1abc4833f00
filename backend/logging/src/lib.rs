//! Structured logging for texplain.
//!
//! Handles subscriber setup, verbosity mapping, and secret redaction.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, level_for_verbosity};
pub use redact::{redact_secret, redact_sensitive_data};
