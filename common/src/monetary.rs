//! Monetary types for pipbot.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CommonError, Result};

/// ISO 4217 style currency code: exactly three ASCII letters, upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Parse and normalize a currency code supplied by a user or a rate source.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if !is_currency_code(code) {
            return Err(CommonError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// The base currency every cached rate is quoted against.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    pub fn cny() -> Self {
        Self("CNY".to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Currency {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Check whether `code` looks like a currency code, ignoring case.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Parse a user supplied amount into an exact decimal.
///
/// Accepts plain notation (`1234.5`) as well as scientific notation
/// (`2.5e3`). Digit separators such as `1,000` or `1_000` are rejected.
/// Values that do not fit a 96-bit decimal are rejected rather than rounded
/// through a float.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(is_amount_char) {
        return Err(CommonError::InvalidAmount(input.to_string()));
    }

    if let Ok(value) = Decimal::from_str(trimmed) {
        return Ok(value);
    }

    parse_scientific(trimmed).ok_or_else(|| CommonError::InvalidAmount(input.to_string()))
}

fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
}

// A 96-bit mantissa cannot carry more than 28 powers of ten either way.
const MAX_EXPONENT: u32 = 28;

fn parse_scientific(value: &str) -> Option<Decimal> {
    let (mantissa, exponent) = value.split_once(['e', 'E'])?;
    let mantissa = Decimal::from_str(mantissa).ok()?;
    let exponent: i32 = exponent.parse().ok()?;

    if exponent.unsigned_abs() > MAX_EXPONENT {
        return None;
    }

    let factor = if exponent >= 0 {
        Decimal::from_i128_with_scale(10i128.pow(exponent.unsigned_abs()), 0)
    } else {
        Decimal::new(1, exponent.unsigned_abs())
    };
    mantissa.checked_mul(factor)
}

/// Format a decimal for chat output.
///
/// The value is truncated (never rounded up) to at most `decimals` places,
/// trailing zeros are dropped and, when `commas` is set, the integer part
/// gets thousands separators.
pub fn format_amount(value: Decimal, decimals: u32, commas: bool) -> String {
    let truncated = value
        .round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
        .normalize();
    let text = truncated.to_string();

    if !commas {
        return text;
    }

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
