//! `forex` command: currency conversion at daily ECB rates.

use std::sync::Arc;

use pipbot_common::{format_amount, parse_amount};
use pipbot_fx::FxEngine;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::CommandResult;
use crate::registry::CommandHandler;
use crate::reply::Reply;

/// Decimal places shown for both amounts.
const DISPLAY_DECIMALS: u32 = 5;

/// Results at or below this are not worth printing.
fn min_displayable() -> Decimal {
    Decimal::new(1, 4)
}

/// Results at or above this are refused to keep replies short.
fn max_displayable() -> Decimal {
    Decimal::from_i128_with_scale(10i128.pow(20), 0)
}

/// Parsed form of the command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForexQuery {
    /// No arguments: show usage.
    Usage,
    /// A conversion to perform, still as raw text.
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    /// Anything else.
    Unsupported,
}

impl ForexQuery {
    /// Interpret `cnyusd`, `5000 mxneur` and `9001 eur to usd`.
    pub fn parse(args: &[String]) -> Self {
        match args {
            [] => ForexQuery::Usage,
            [pair] => Self::from_pair("1", pair),
            [amount, pair] => Self::from_pair(amount, pair),
            [amount, from, to_word, to] if to_word.eq_ignore_ascii_case("to") => {
                ForexQuery::Convert {
                    amount: amount.clone(),
                    from: from.clone(),
                    to: to.clone(),
                }
            }
            _ => ForexQuery::Unsupported,
        }
    }

    fn from_pair(amount: &str, pair: &str) -> Self {
        if pair.len() != 6 || !pair.is_ascii() {
            return ForexQuery::Unsupported;
        }
        let (from, to) = pair.split_at(3);
        ForexQuery::Convert {
            amount: amount.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Converts between currencies using the cached rate table.
pub struct ForexHandler {
    engine: Arc<FxEngine>,
    usage: String,
}

impl ForexHandler {
    pub fn new(engine: Arc<FxEngine>, prefix: &str) -> Self {
        Self {
            engine,
            usage: format!(
                "ECB forex rates, updated daily. Usage: \
                 {0}forex cnyusd, {0}forex 5000 mxneur, {0}forex 9001 eur to usd.",
                prefix
            ),
        }
    }
}

impl CommandHandler for ForexHandler {
    fn name(&self) -> &'static str {
        "forex"
    }

    fn call(&self, user: &str, args: &[String]) -> CommandResult<Reply> {
        let (amount, from, to) = match ForexQuery::parse(args) {
            ForexQuery::Usage => return Ok(Reply::text(self.usage.clone())),
            ForexQuery::Unsupported => {
                debug!(user = %user, args = ?args, "Unsupported forex usage");
                return Ok(Reply::None);
            }
            ForexQuery::Convert { amount, from, to } => (amount, from, to),
        };

        if from.eq_ignore_ascii_case(&to) {
            return Ok(Reply::None);
        }

        let engine = self.engine.clone();
        let user = user.to_string();

        Ok(Reply::pending(async move {
            match engine.convert(&amount, &from, &to).await {
                Ok(converted) => Ok(format_conversion(&amount, &from, converted, &to)),
                Err(e) if e.is_user_error() => {
                    debug!(user = %user, error = %e, "Dropping forex reply");
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        }))
    }
}

/// Render a conversion, or nothing when the result is out of displayable range.
pub fn format_conversion(amount: &str, from: &str, converted: Decimal, to: &str) -> Option<String> {
    if converted <= min_displayable() || converted >= max_displayable() {
        debug!(converted = %converted, "Conversion result outside displayable range");
        return None;
    }

    let amount = parse_amount(amount).ok()?;

    Some(format!(
        "{} {} is {} {}",
        format_amount(amount, DISPLAY_DECIMALS, true),
        from.to_uppercase(),
        format_amount(converted, DISPLAY_DECIMALS, true),
        to.to_uppercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipbot_fx::{FxEngineConfig, MockRateSource};
    use rust_decimal_macros::dec;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn handler() -> ForexHandler {
        let source = Arc::new(MockRateSource::new("test"));
        source.set_rate("CNY", dec!(7));
        source.set_rate("EUR", dec!(0.92));
        source.set_rate("MXN", dec!(17.05));
        source.set_rate("BTC", dec!(0.00001));
        source.set_rate("VES", dec!(1000000000000));
        let engine = Arc::new(FxEngine::new(source, FxEngineConfig::default()));
        ForexHandler::new(engine, "!")
    }

    async fn run(handler: &ForexHandler, tokens: &[&str]) -> Option<String> {
        handler.call("alice", &args(tokens)).unwrap().resolve().await
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(ForexQuery::parse(&[]), ForexQuery::Usage);
        assert_eq!(
            ForexQuery::parse(&args(&["cnyusd"])),
            ForexQuery::Convert {
                amount: "1".to_string(),
                from: "cny".to_string(),
                to: "usd".to_string()
            }
        );
        assert_eq!(
            ForexQuery::parse(&args(&["5000", "mxneur"])),
            ForexQuery::Convert {
                amount: "5000".to_string(),
                from: "mxn".to_string(),
                to: "eur".to_string()
            }
        );
        assert_eq!(
            ForexQuery::parse(&args(&["9001", "eur", "TO", "usd"])),
            ForexQuery::Convert {
                amount: "9001".to_string(),
                from: "eur".to_string(),
                to: "usd".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unsupported() {
        assert_eq!(ForexQuery::parse(&args(&["cny"])), ForexQuery::Unsupported);
        assert_eq!(ForexQuery::parse(&args(&["5", "cnyusdx"])), ForexQuery::Unsupported);
        assert_eq!(ForexQuery::parse(&args(&["5", "cny", "usd"])), ForexQuery::Unsupported);
        assert_eq!(ForexQuery::parse(&args(&["5", "cny", "in", "usd"])), ForexQuery::Unsupported);
        assert_eq!(ForexQuery::parse(&args(&["€€€"])), ForexQuery::Unsupported);
    }

    #[tokio::test]
    async fn test_usage() {
        let reply = run(&handler(), &[]).await.unwrap();

        assert!(reply.starts_with("ECB forex rates, updated daily."));
        assert!(reply.contains("!forex 9001 eur to usd."));
    }

    #[tokio::test]
    async fn test_convert_pair() {
        let reply = run(&handler(), &["cnyusd"]).await;

        assert_eq!(reply.as_deref(), Some("1 CNY is 0.14285 USD"));
    }

    #[tokio::test]
    async fn test_convert_with_amount() {
        let reply = run(&handler(), &["14000", "CNYEUR"]).await;

        assert_eq!(reply.as_deref(), Some("14,000 CNY is 1,840 EUR"));
    }

    #[tokio::test]
    async fn test_convert_long_form() {
        let reply = run(&handler(), &["9001", "eur", "to", "usd"]).await;

        assert_eq!(reply.as_deref(), Some("9,001 EUR is 9,783.69565 USD"));
    }

    #[tokio::test]
    async fn test_same_currency_is_silent() {
        assert_eq!(run(&handler(), &["usdusd"]).await, None);
    }

    #[tokio::test]
    async fn test_invalid_input_is_silent() {
        let handler = handler();

        assert_eq!(run(&handler, &["zzzusd"]).await, None);
        assert_eq!(run(&handler, &["0", "cnyusd"]).await, None);
        assert_eq!(run(&handler, &["-5", "cnyusd"]).await, None);
        assert_eq!(run(&handler, &["lots", "cnyusd"]).await, None);
        assert_eq!(run(&handler, &["5", "12345"]).await, None);
    }

    #[tokio::test]
    async fn test_digit_separators_are_silent() {
        let handler = handler();

        assert_eq!(run(&handler, &["1,000", "cnyusd"]).await, None);
        assert_eq!(run(&handler, &["1_000", "cnyusd"]).await, None);
    }

    #[tokio::test]
    async fn test_extreme_results_are_suppressed() {
        let handler = handler();

        assert_eq!(run(&handler, &["1", "usdbtc"]).await, None);
        assert_eq!(run(&handler, &["1000000000", "usdves"]).await, None);
        assert_eq!(run(&handler, &["10e23892348", "vesusd"]).await, None);
    }

    #[test]
    fn test_format_conversion_bounds() {
        assert!(format_conversion("1", "usd", dec!(0.0001), "btc").is_none());
        assert!(format_conversion("1", "usd", dec!(0.00011), "btc").is_some());
        assert!(format_conversion("1", "usd", dec!(100000000000000000000), "ves").is_none());
    }
}
