//! Responder configuration.

use std::time::Duration;

use pipbot_fx::{FxEngineConfig, RateCacheConfig};

/// Forex configuration.
#[derive(Debug, Clone)]
pub struct ForexConfig {
    /// Latest-rates endpoint, queried with `?base=USD`.
    pub rates_url: String,
    /// How long a fetched rate table is reused.
    pub refresh_window: Duration,
}

impl Default for ForexConfig {
    fn default() -> Self {
        Self {
            rates_url: "https://api.frankfurter.app/latest".to_string(),
            refresh_window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Main bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Nickname of the bot, if known before connecting.
    pub bot_name: Option<String>,
    /// Leading text that marks a message as a command.
    pub command_prefix: String,
    /// Lower-case command names before lookup.
    pub case_insensitive_commands: bool,
    /// Address shown by the donate command.
    pub btc_donation_addr: Option<String>,
    /// Entries shown by `flair top`.
    pub flair_top_list_size: usize,
    /// Forex configuration.
    pub forex: ForexConfig,
    /// Bitfinex API root for the swaps command.
    pub bitfinex_api_url: String,
    /// Timeout applied to every outbound HTTP request.
    pub http_timeout: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_name: None,
            command_prefix: "!".to_string(),
            case_insensitive_commands: true,
            btc_donation_addr: None,
            flair_top_list_size: 5,
            forex: ForexConfig::default(),
            bitfinex_api_url: "https://api.bitfinex.com".to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl BotConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparseable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("BOT_NAME") {
            config.bot_name = Some(name);
        }

        if let Some(prefix) = lookup("COMMAND_PREFIX") {
            config.command_prefix = prefix;
        }

        if let Some(flag) = lookup("CASE_INSENSITIVE_COMMANDS") {
            if let Some(flag) = parse_flag(&flag) {
                config.case_insensitive_commands = flag;
            }
        }

        if let Some(addr) = lookup("BTC_DONATION_ADDR") {
            if !addr.trim().is_empty() {
                config.btc_donation_addr = Some(addr);
            }
        }

        if let Some(size) = lookup("FLAIR_TOP_LIST_SIZE") {
            if let Ok(size) = size.parse() {
                config.flair_top_list_size = size;
            }
        }

        if let Some(url) = lookup("FOREX_RATES_URL") {
            config.forex.rates_url = url;
        }

        if let Some(secs) = lookup("FOREX_REFRESH_SECS") {
            if let Ok(secs) = secs.parse() {
                config.forex.refresh_window = Duration::from_secs(secs);
            }
        }

        if let Some(url) = lookup("BITFINEX_API_URL") {
            config.bitfinex_api_url = url;
        }

        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.http_timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.command_prefix.is_empty() {
            return Err("Command prefix cannot be empty".to_string());
        }

        if self.command_prefix.chars().any(char::is_whitespace) {
            return Err("Command prefix cannot contain whitespace".to_string());
        }

        if self.flair_top_list_size == 0 {
            return Err("Flair top list size cannot be 0".to_string());
        }

        if self.forex.rates_url.is_empty() {
            return Err("Forex rates URL cannot be empty".to_string());
        }

        if self.forex.refresh_window.is_zero() {
            return Err("Forex refresh window cannot be zero".to_string());
        }

        if self.http_timeout.is_zero() {
            return Err("HTTP timeout cannot be zero".to_string());
        }

        Ok(())
    }

    /// FX engine configuration derived from this config.
    pub fn fx_engine_config(&self) -> FxEngineConfig {
        let freshness_window = chrono::Duration::from_std(self.forex.refresh_window)
            .unwrap_or_else(|_| pipbot_common::constants::rate_refresh_window());

        FxEngineConfig {
            cache: RateCacheConfig {
                freshness_window,
                ..Default::default()
            },
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.command_prefix, "!");
        assert!(config.case_insensitive_commands);
    }

    #[test]
    fn test_from_lookup() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("COMMAND_PREFIX", "."),
            ("CASE_INSENSITIVE_COMMANDS", "off"),
            ("BTC_DONATION_ADDR", "1BoatSLRHtKNngkdXEeobR76b53LETtpyT"),
            ("FLAIR_TOP_LIST_SIZE", "10"),
            ("FOREX_REFRESH_SECS", "3600"),
        ]));

        assert_eq!(config.command_prefix, ".");
        assert!(!config.case_insensitive_commands);
        assert_eq!(
            config.btc_donation_addr.as_deref(),
            Some("1BoatSLRHtKNngkdXEeobR76b53LETtpyT")
        );
        assert_eq!(config.flair_top_list_size, 10);
        assert_eq!(config.forex.refresh_window, Duration::from_secs(3600));
        assert_eq!(
            config.fx_engine_config().cache.freshness_window,
            chrono::Duration::hours(1)
        );
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("CASE_INSENSITIVE_COMMANDS", "maybe"),
            ("FLAIR_TOP_LIST_SIZE", "lots"),
            ("BTC_DONATION_ADDR", "  "),
        ]));

        assert!(config.case_insensitive_commands);
        assert_eq!(config.flair_top_list_size, 5);
        assert!(config.btc_donation_addr.is_none());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = BotConfig::default();
        config.command_prefix = String::new();
        assert!(config.validate().is_err());

        let mut config = BotConfig::default();
        config.command_prefix = "! ".to_string();
        assert!(config.validate().is_err());

        let mut config = BotConfig::default();
        config.forex.refresh_window = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
