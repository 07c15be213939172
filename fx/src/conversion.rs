//! Currency conversion types.

use pipbot_common::{parse_amount, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FxResult;

/// A validated request to convert an amount between two currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Amount to convert, in `from` units.
    pub amount: Decimal,
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
}

impl ConversionRequest {
    /// Create a new conversion request from typed values.
    pub fn new(amount: Decimal, from: Currency, to: Currency) -> Self {
        Self { amount, from, to }
    }

    /// Build a request from raw chat tokens.
    ///
    /// Currency codes are checked before the amount, so a bad code reports
    /// `InvalidArgument` even when the amount is also garbage.
    pub fn parse(amount: &str, from: &str, to: &str) -> FxResult<Self> {
        let from = Currency::parse(from)?;
        let to = Currency::parse(to)?;
        let amount = parse_amount(amount)?;
        Ok(Self { amount, from, to })
    }

    /// Whether source and target are the same currency.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

/// Represents a completed currency conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Input amount.
    pub input: Decimal,
    /// Source currency.
    pub from: Currency,
    /// Output amount.
    pub output: Decimal,
    /// Target currency.
    pub to: Currency,
}

impl Conversion {
    /// Create a new conversion record.
    pub fn new(input: Decimal, from: Currency, output: Decimal, to: Currency) -> Self {
        Self {
            input,
            from,
            output,
            to,
        }
    }

    /// Get the effective rate used.
    pub fn effective_rate(&self) -> Decimal {
        if self.input.is_zero() {
            return Decimal::ZERO;
        }
        self.output / self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_request() {
        let request = ConversionRequest::parse("5000", "mxn", "eur").unwrap();

        assert_eq!(request.amount, dec!(5000));
        assert_eq!(request.from.code(), "MXN");
        assert_eq!(request.to, Currency::eur());
        assert!(!request.is_identity());
    }

    #[test]
    fn test_parse_checks_codes_before_amount() {
        let result = ConversionRequest::parse("lots", "dollars", "eur");
        assert!(matches!(result, Err(FxError::InvalidArgument(_))));

        let result = ConversionRequest::parse("lots", "usd", "eur");
        assert!(matches!(result, Err(FxError::InvalidAmount(_))));
    }

    #[test]
    fn test_conversion_effective_rate() {
        let conversion = Conversion::new(dec!(1000), Currency::usd(), dec!(920), Currency::eur());

        assert_eq!(conversion.effective_rate(), dec!(0.92));
    }
}
