//! Forex rate caching with a freshness window.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use parking_lot::RwLock;
use pipbot_common::{constants, is_fresh_within, now, Currency, Timestamp};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::provider::{RateQuotes, RateSource};

/// Immutable table of rates, each expressed as units of currency per one unit of base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<Currency, Decimal>,
}

impl RateTable {
    /// Build a table from raw source quotes.
    ///
    /// Codes that are not three letters and non-positive rates are dropped.
    /// The base currency is always present at exactly one.
    pub fn from_quotes(base: &Currency, quotes: RateQuotes) -> Self {
        let mut rates = HashMap::with_capacity(quotes.len() + 1);

        for (code, rate) in quotes {
            let currency = match Currency::parse(&code) {
                Ok(currency) => currency,
                Err(e) => {
                    warn!(code = %code, error = %e, "Dropping rate with invalid currency code");
                    continue;
                }
            };
            if rate <= Decimal::ZERO {
                warn!(currency = %currency, rate = %rate, "Dropping non-positive rate");
                continue;
            }
            rates.insert(currency, rate);
        }

        rates.insert(base.clone(), Decimal::ONE);
        Self { rates }
    }

    /// Get the rate for a currency.
    pub fn get(&self, currency: &Currency) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    /// Number of currencies in the table.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All currencies in the table, sorted by code.
    pub fn currencies(&self) -> Vec<Currency> {
        let mut codes: Vec<Currency> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }
}

/// Configuration for rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// How long a refreshed table is used before the next fetch.
    pub freshness_window: Duration,
    /// Currency every rate is quoted against.
    pub base: Currency,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            freshness_window: constants::rate_refresh_window(),
            base: Currency::usd(),
        }
    }
}

/// Published cache state. Replaced as a whole, never mutated.
#[derive(Debug, Default)]
struct Snapshot {
    table: Arc<RateTable>,
    refreshed_at: Option<Timestamp>,
}

/// Whole-table rate cache with lazy refresh.
///
/// Readers clone the current snapshot pointer and never observe a partially
/// written table. The lock is only held to copy or replace that pointer and
/// never across an await point.
pub struct RateCache {
    source: Arc<dyn RateSource>,
    current: RwLock<Arc<Snapshot>>,
    config: RateCacheConfig,
}

impl RateCache {
    /// Create a new rate cache with default configuration.
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_config(source, RateCacheConfig::default())
    }

    /// Create a new rate cache with custom configuration.
    pub fn with_config(source: Arc<dyn RateSource>, config: RateCacheConfig) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(Snapshot::default())),
            config,
        }
    }

    /// Whether the table was refreshed within the freshness window.
    pub fn is_fresh(&self) -> bool {
        is_fresh_within(self.last_refreshed(), self.config.freshness_window)
    }

    /// Refresh the table from the source unless it is still fresh.
    ///
    /// Returns `true` only if a new table was published. Failures are logged
    /// and leave the previous table and timestamp in place.
    pub async fn ensure_fresh(&self) -> bool {
        if self.is_fresh() {
            debug!("Forex rates still fresh, skipping refresh");
            return false;
        }

        match self.source.fetch_latest(&self.config.base).await {
            Ok(quotes) => {
                let table = RateTable::from_quotes(&self.config.base, quotes);
                let currencies = table.len();

                self.publish(table);

                info!(
                    source = self.source.name(),
                    currencies,
                    "Forex rates refreshed"
                );
                true
            }
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    "Forex rate refresh failed, keeping previous rates"
                );
                false
            }
        }
    }

    /// Get the cached rate for a currency.
    pub fn get_rate(&self, currency: &Currency) -> Option<Decimal> {
        self.snapshot().get(currency)
    }

    /// Get the current table.
    pub fn snapshot(&self) -> Arc<RateTable> {
        self.current.read().table.clone()
    }

    /// When the table was last successfully refreshed.
    pub fn last_refreshed(&self) -> Option<Timestamp> {
        self.current.read().refreshed_at
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let current = self.current.read().clone();
        CacheStats {
            currencies: current.table.len(),
            refreshed_at: current.refreshed_at,
            fresh: is_fresh_within(current.refreshed_at, self.config.freshness_window),
        }
    }

    fn publish(&self, table: RateTable) {
        let next = Arc::new(Snapshot {
            table: Arc::new(table),
            refreshed_at: Some(now()),
        });
        *self.current.write() = next;
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub currencies: usize,
    pub refreshed_at: Option<Timestamp>,
    pub fresh: bool,
}
