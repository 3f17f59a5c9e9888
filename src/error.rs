//! Shared error conventions.
//!
//! Every module-level error enum implements [`ErrorCode`] so log lines and
//! HTTP error bodies carry a stable, grepable code next to the message.

/// Grepable error code and retryable flag for structured error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
