//! Core error type.
//!
//! `qn-network` and `qn-sim` wrap `CoreError` as one variant of their own
//! enums via `#[from]`, so parameter errors raised here propagate with `?`.

use thiserror::Error;

/// The error type for `qn-core` and the base of the sub-crate errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A numeric parameter is outside its permitted domain (non-positive
    /// rate, zero server count, negative horizon, …).  `context` names the
    /// offending component so a malformed network can be diagnosed.
    #[error("invalid parameter `{what}` = {value} for {context}")]
    InvalidParameter {
        what:    &'static str,
        value:   f64,
        context: String,
    },
}

impl CoreError {
    /// Shorthand for building an [`CoreError::InvalidParameter`].
    pub fn invalid(what: &'static str, value: f64, context: impl Into<String>) -> Self {
        CoreError::InvalidParameter {
            what,
            value,
            context: context.into(),
        }
    }
}

/// Shorthand result type for `qn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
