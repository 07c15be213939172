//! External collaborators used by command handlers.
//!
//! Only the narrow request/response surface the handlers need lives here;
//! the flair, knowledge and time services are provided by the embedding
//! application.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use pipbot_common::parse_amount;
use pipbot_fx::FxEngine;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::ServiceError;

/// Result type for collaborator calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Market sentiment a user can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlairDirection {
    Bull,
    Bear,
}

impl FlairDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlairDirection::Bull => "bull",
            FlairDirection::Bear => "bear",
        }
    }
}

impl fmt::Display for FlairDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlairDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bull" => Ok(FlairDirection::Bull),
            "bear" => Ok(FlairDirection::Bear),
            _ => Err(format!("Unknown flair direction: {}", s)),
        }
    }
}

/// Reputation/voting subsystem.
#[async_trait]
pub trait FlairService: Send + Sync {
    /// Flair statistics for `user`.
    async fn status(&self, user: &str) -> ServiceResult<Option<String>>;

    /// Switch `user` to `direction`.
    async fn change(&self, user: &str, direction: FlairDirection) -> ServiceResult<Option<String>>;

    /// Leaderboard of the `count` best users.
    async fn top(&self, count: usize) -> ServiceResult<Option<String>>;
}

/// Free-form question answering.
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    /// Answers for `text`, best first.
    async fn query(&self, text: &str) -> ServiceResult<Vec<String>>;
}

/// A resolved location with its current local time.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedTime {
    /// Display name of the resolved location.
    pub location: String,
    /// Local time at the location.
    pub time: DateTime<FixedOffset>,
}

/// Geocoding plus timezone lookup.
#[async_trait]
pub trait TimeLookup: Send + Sync {
    /// Resolve `location` and express `reference` in its timezone.
    async fn lookup(
        &self,
        location: &str,
        reference: DateTime<Utc>,
    ) -> ServiceResult<Option<LocalizedTime>>;
}

/// Open swap book of a margin lending market.
#[async_trait]
pub trait LendingBook: Send + Sync {
    /// Total amount currently lent out in `currency`.
    async fn amount_lent(&self, currency: &str) -> ServiceResult<Decimal>;
}

#[derive(Debug, Deserialize)]
struct LendEntry {
    amount_lent: String,
}

/// Lending book backed by the Bitfinex v1 `lends` endpoint.
pub struct BitfinexLendingBook {
    base_url: String,
    http: Client,
}

impl BitfinexLendingBook {
    /// Create a lending book for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl LendingBook for BitfinexLendingBook {
    async fn amount_lent(&self, currency: &str) -> ServiceResult<Decimal> {
        let url = format!("{}/v1/lends/{}", self.base_url, currency);
        debug!(url = %url, "Requesting open swaps");

        let response = self.http.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ServiceError::Unavailable(format!(
                "lends lookup for {} returned HTTP {}",
                currency,
                response.status().as_u16()
            )));
        }

        let entries: Vec<LendEntry> = response.json().await?;
        latest_amount_lent(currency, &entries)
    }
}

fn latest_amount_lent(currency: &str, entries: &[LendEntry]) -> ServiceResult<Decimal> {
    let latest = entries.first().ok_or_else(|| {
        ServiceError::InvalidResponse(format!("no lending data for {}", currency))
    })?;

    parse_amount(&latest.amount_lent).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}

/// Everything the built-in handlers depend on.
///
/// Only the FX engine is mandatory; commands whose collaborator is missing
/// stay registered and answer nothing.
#[derive(Clone)]
pub struct Services {
    pub fx: Arc<FxEngine>,
    pub flair: Option<Arc<dyn FlairService>>,
    pub knowledge: Option<Arc<dyn KnowledgeService>>,
    pub time: Option<Arc<dyn TimeLookup>>,
    pub lending: Option<Arc<dyn LendingBook>>,
}

impl Services {
    /// Create services with only currency conversion available.
    pub fn new(fx: Arc<FxEngine>) -> Self {
        Self {
            fx,
            flair: None,
            knowledge: None,
            time: None,
            lending: None,
        }
    }

    /// Set the flair subsystem.
    pub fn with_flair(mut self, flair: Arc<dyn FlairService>) -> Self {
        self.flair = Some(flair);
        self
    }

    /// Set the knowledge service.
    pub fn with_knowledge(mut self, knowledge: Arc<dyn KnowledgeService>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Set the time lookup service.
    pub fn with_time_lookup(mut self, time: Arc<dyn TimeLookup>) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the lending book.
    pub fn with_lending(mut self, lending: Arc<dyn LendingBook>) -> Self {
        self.lending = Some(lending);
        self
    }
}
