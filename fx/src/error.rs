//! FX engine error types.

use pipbot_common::CommonError;
use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// A currency code was not a three letter code.
    #[error("Invalid currency argument: {0}")]
    InvalidArgument(String),

    /// The amount could not be parsed, was not positive, or overflowed.
    #[error("Invalid currency amount: {0}")]
    InvalidAmount(String),

    /// The currency is not present in the cached rate table.
    #[error("Unknown currency '{0}'")]
    UnknownCurrency(String),

    /// The rate source answered with something unusable.
    #[error("Rate refresh failed: {0}")]
    RefreshFailure(String),

    /// Transport error talking to the rate source.
    #[error("Rate source request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl FxError {
    /// Whether the error was caused by the user's input rather than by the rate source.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FxError::InvalidArgument(_) | FxError::InvalidAmount(_) | FxError::UnknownCurrency(_)
        )
    }
}

impl From<CommonError> for FxError {
    fn from(error: CommonError) -> Self {
        match error {
            CommonError::InvalidCurrencyCode(code) => FxError::InvalidArgument(code),
            CommonError::InvalidAmount(amount) => FxError::InvalidAmount(amount),
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
