//! `swaps` command: open margin swap totals on Bitfinex.

use std::sync::Arc;

use chrono::Duration;
use futures::future::try_join_all;
use parking_lot::RwLock;
use pipbot_common::{constants, format_amount, is_fresh_within, now, Timestamp};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::CommandResult;
use crate::registry::CommandHandler;
use crate::reply::Reply;
use crate::services::{LendingBook, ServiceResult};

/// Currencies queried, in reply order.
const CURRENCIES: [&str; 3] = ["ltc", "btc", "usd"];

#[derive(Debug, Clone)]
struct SwapTotals {
    amounts: Vec<Decimal>,
    fetched_at: Timestamp,
}

/// Swap totals shared between calls for a short window.
pub struct SwapsCache {
    book: Arc<dyn LendingBook>,
    window: Duration,
    current: RwLock<Option<SwapTotals>>,
}

impl SwapsCache {
    pub fn new(book: Arc<dyn LendingBook>) -> Self {
        Self::with_window(book, constants::swaps_refresh_window())
    }

    pub fn with_window(book: Arc<dyn LendingBook>, window: Duration) -> Self {
        Self {
            book,
            window,
            current: RwLock::new(None),
        }
    }

    /// Totals in [`CURRENCIES`] order, refetched once the window has passed.
    pub async fn totals(&self) -> ServiceResult<Vec<Decimal>> {
        let cached = self.current.read().clone();
        if let Some(cached) = cached {
            if is_fresh_within(Some(cached.fetched_at), self.window) {
                return Ok(cached.amounts);
            }
        }

        debug!("Refreshing open swap totals");
        let amounts =
            try_join_all(CURRENCIES.iter().map(|currency| self.book.amount_lent(currency))).await?;

        *self.current.write() = Some(SwapTotals {
            amounts: amounts.clone(),
            fetched_at: now(),
        });

        Ok(amounts)
    }
}

pub struct SwapsHandler {
    cache: Option<Arc<SwapsCache>>,
}

impl SwapsHandler {
    pub fn new(book: Option<Arc<dyn LendingBook>>) -> Self {
        Self {
            cache: book.map(|book| Arc::new(SwapsCache::new(book))),
        }
    }
}

impl CommandHandler for SwapsHandler {
    fn name(&self) -> &'static str {
        "swaps"
    }

    fn call(&self, _user: &str, _args: &[String]) -> CommandResult<Reply> {
        let cache = match &self.cache {
            Some(cache) => cache.clone(),
            None => {
                warn!("No lending book configured");
                return Ok(Reply::None);
            }
        };

        Ok(Reply::pending(async move {
            let amounts = cache.totals().await?;
            let parts: Vec<String> = CURRENCIES
                .iter()
                .zip(&amounts)
                .map(|(currency, amount)| {
                    format!("{} {}", currency.to_uppercase(), format_amount(*amount, 2, true))
                })
                .collect();
            Ok(Some(format!("Bitfinex open swaps: {}", parts.join(", "))))
        }))
    }
}
