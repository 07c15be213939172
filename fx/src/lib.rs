//! pipbot FX Engine
//!
//! Exchange rate cache and currency converter behind the `forex` command.
//!
//! # Features
//!
//! - Pluggable rate sources (HTTP latest-rates endpoint, in-memory mock)
//! - A whole-table rate cache with a 24 hour freshness window
//! - Exact decimal conversion, never through binary floating point
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pipbot_fx::{FxEngine, FxEngineConfig, HttpRateSource};
//!
//! let source = Arc::new(HttpRateSource::new("https://api.frankfurter.app/latest", timeout)?);
//! let engine = FxEngine::new(source, FxEngineConfig::default());
//!
//! // 5000 MXN in EUR
//! let eur = engine.convert("5000", "mxn", "eur").await?;
//! ```

pub mod engine;
pub mod provider;
pub mod cache;
pub mod conversion;
pub mod error;

pub use engine::{FxEngine, FxEngineConfig};
pub use provider::{HttpRateSource, RateSource};
#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateSource;
pub use cache::{RateCache, RateCacheConfig, RateTable};
pub use conversion::{Conversion, ConversionRequest};
pub use error::{FxError, FxResult};
