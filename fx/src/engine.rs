//! Currency converter on top of the rate cache.

use std::sync::Arc;

use pipbot_common::Currency;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::cache::{RateCache, RateCacheConfig, RateTable};
use crate::conversion::{Conversion, ConversionRequest};
use crate::error::{FxError, FxResult};
use crate::provider::RateSource;

/// Configuration for the FX engine.
#[derive(Debug, Clone, Default)]
pub struct FxEngineConfig {
    /// Cache configuration.
    pub cache: RateCacheConfig,
}

/// The currency converter.
///
/// Every conversion first gives the cache one chance to refresh, then works
/// on a single snapshot of the rate table so both legs use the same rates.
pub struct FxEngine {
    cache: RateCache,
}

impl FxEngine {
    /// Create a new FX engine with the given rate source.
    pub fn new(source: Arc<dyn RateSource>, config: FxEngineConfig) -> Self {
        Self {
            cache: RateCache::with_config(source, config.cache),
        }
    }

    /// Get the underlying rate cache.
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Convert a raw amount between two raw currency codes.
    #[instrument(skip(self))]
    pub async fn convert(&self, amount: &str, from: &str, to: &str) -> FxResult<Decimal> {
        self.cache.ensure_fresh().await;

        let request = ConversionRequest::parse(amount, from, to)?;
        let conversion = Self::execute(&self.cache.snapshot(), &request)?;
        Ok(conversion.output)
    }

    /// Convert an already typed request.
    #[instrument(skip(self, request), fields(
        amount = %request.amount,
        from = %request.from,
        to = %request.to
    ))]
    pub async fn convert_request(&self, request: &ConversionRequest) -> FxResult<Conversion> {
        self.cache.ensure_fresh().await;
        Self::execute(&self.cache.snapshot(), request)
    }

    /// Apply a request to a rate table.
    ///
    /// Divides by the source rate before multiplying by the target rate.
    pub fn execute(rates: &RateTable, request: &ConversionRequest) -> FxResult<Conversion> {
        let from_rate = Self::rate_for(rates, &request.from)?;
        let to_rate = Self::rate_for(rates, &request.to)?;

        if request.amount <= Decimal::ZERO {
            return Err(FxError::InvalidAmount(request.amount.to_string()));
        }

        let output = if request.is_identity() {
            request.amount
        } else {
            request
                .amount
                .checked_div(from_rate)
                .and_then(|base| base.checked_mul(to_rate))
                .ok_or_else(|| FxError::InvalidAmount(format!("{} overflows", request.amount)))?
        };

        debug!(
            amount = %request.amount,
            from = %request.from,
            to = %request.to,
            output = %output,
            "Conversion completed"
        );

        Ok(Conversion::new(
            request.amount,
            request.from.clone(),
            output,
            request.to.clone(),
        ))
    }

    fn rate_for(rates: &RateTable, currency: &Currency) -> FxResult<Decimal> {
        rates
            .get(currency)
            .ok_or_else(|| FxError::UnknownCurrency(currency.code().to_string()))
    }
}
