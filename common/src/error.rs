//! Error types shared across pipbot crates.

use thiserror::Error;

/// Errors raised while parsing user-supplied monetary input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// The value is not a three letter alphabetic currency code.
    #[error("Invalid currency code: '{0}'")]
    InvalidCurrencyCode(String),

    /// The value cannot be represented as an exact decimal amount.
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
}

/// Result type alias for common parsing operations.
pub type Result<T> = std::result::Result<T, CommonError>;
