//! Rate source trait and implementations.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use pipbot_common::{parse_amount, Currency};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Raw quotes as returned by a source: code to units of that currency per one unit of base.
pub type RateQuotes = HashMap<String, Decimal>;

/// A source of the latest exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch the full table of latest rates quoted against `base`.
    async fn fetch_latest(&self, base: &Currency) -> FxResult<RateQuotes>;
}

/// Rate source backed by a fixer.io-compatible `latest` HTTP endpoint.
///
/// The endpoint is queried with `?base=<CODE>` and must answer `200 OK` with a
/// JSON object carrying a `rates` map.
pub struct HttpRateSource {
    url: String,
    http: Client,
}

impl HttpRateSource {
    /// Create a source for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> FxResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_latest(&self, base: &Currency) -> FxResult<RateQuotes> {
        debug!(url = %self.url, base = %base, "Requesting latest forex rates");

        let response = self
            .http
            .get(&self.url)
            .query(&[("base", base.code())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FxError::RefreshFailure(format!(
                "bad response from rate source, HTTP code {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FxError::RefreshFailure(format!("unreadable rate payload: {e}")))?;

        parse_latest_rates(&body)
    }
}

/// Extract the `rates` map from a latest-rates payload.
///
/// Entries whose value is not a number are skipped; numbers are converted
/// through their decimal text so no binary rounding leaks into the table.
pub fn parse_latest_rates(body: &Value) -> FxResult<RateQuotes> {
    let rates = body
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| FxError::RefreshFailure(format!("unusable rate payload: {body}")))?;

    let mut quotes = RateQuotes::with_capacity(rates.len());
    for (code, value) in rates {
        let parsed = value
            .as_number()
            .and_then(|number| parse_amount(&number.to_string()).ok());

        match parsed {
            Some(rate) => {
                quotes.insert(code.clone(), rate);
            }
            None => warn!(code = %code, value = %value, "Skipping non-numeric rate"),
        }
    }

    Ok(quotes)
}

/// Mock rate source for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateSource {
    name: String,
    rates: parking_lot::Mutex<RateQuotes>,
    failing: std::sync::atomic::AtomicBool,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateSource {
    /// Create a new mock source with no rates.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: parking_lot::Mutex::new(RateQuotes::new()),
            failing: std::sync::atomic::AtomicBool::new(false),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Set the rate for a currency code.
    pub fn set_rate(&self, code: &str, rate: Decimal) {
        self.rates.lock().insert(code.to_string(), rate);
    }

    /// Make subsequent fetches fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateSource for MockRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_latest(&self, _base: &Currency) -> FxResult<RateQuotes> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(FxError::RefreshFailure("mock source unavailable".to_string()));
        }

        Ok(self.rates.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer a single HTTP request with `response`, yielding the request line.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&buf[..read]).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{}/latest", addr), server)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn http_source(url: String) -> HttpRateSource {
        HttpRateSource::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_mock_source() {
        let source = MockRateSource::new("test");
        source.set_rate("EUR", dec!(0.92));

        let quotes = source.fetch_latest(&Currency::usd()).await.unwrap();

        assert_eq!(quotes.get("EUR"), Some(&dec!(0.92)));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_source_failure() {
        let source = MockRateSource::new("test");
        source.set_failing(true);

        let result = source.fetch_latest(&Currency::usd()).await;

        assert!(matches!(result, Err(FxError::RefreshFailure(_))));
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_parse_latest_rates() {
        let body = json!({
            "base": "USD",
            "date": "2025-03-04",
            "rates": { "EUR": 0.9234, "JPY": 149.5, "CNY": 7 }
        });

        let quotes = parse_latest_rates(&body).unwrap();

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes["EUR"], dec!(0.9234));
        assert_eq!(quotes["JPY"], dec!(149.5));
        assert_eq!(quotes["CNY"], dec!(7));
    }

    #[test]
    fn test_parse_latest_rates_skips_non_numeric() {
        let body = json!({ "rates": { "EUR": 0.92, "XXX": "n/a" } });

        let quotes = parse_latest_rates(&body).unwrap();

        assert_eq!(quotes.len(), 1);
        assert!(quotes.contains_key("EUR"));
    }

    #[test]
    fn test_parse_latest_rates_missing_field() {
        let body = json!({ "error": "base currency access restricted" });

        let result = parse_latest_rates(&body);

        assert!(matches!(result, Err(FxError::RefreshFailure(_))));
    }

    #[tokio::test]
    async fn test_http_source_queries_base() {
        let (url, server) =
            serve_once(http_response("200 OK", r#"{"base":"USD","rates":{"EUR":0.92,"CNY":7}}"#)).await;

        let quotes = http_source(url).fetch_latest(&Currency::usd()).await.unwrap();
        let request_line = server.await.unwrap();

        assert!(request_line.starts_with("GET /latest?"));
        assert!(request_line.contains("base=USD"));
        assert_eq!(quotes["EUR"], dec!(0.92));
        assert_eq!(quotes["CNY"], dec!(7));
    }

    #[tokio::test]
    async fn test_http_source_non_ok_status() {
        let (url, server) = serve_once(http_response("500 Internal Server Error", "")).await;

        let result = http_source(url).fetch_latest(&Currency::usd()).await;
        server.await.unwrap();

        assert!(matches!(result, Err(FxError::RefreshFailure(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_http_source_missing_rates() {
        let (url, server) =
            serve_once(http_response("200 OK", r#"{"error":"base currency access restricted"}"#)).await;

        let result = http_source(url).fetch_latest(&Currency::usd()).await;
        server.await.unwrap();

        assert!(matches!(result, Err(FxError::RefreshFailure(_))));
    }

    #[tokio::test]
    async fn test_http_source_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = http_source(format!("http://{}/latest", addr))
            .fetch_latest(&Currency::usd())
            .await;

        assert!(matches!(result, Err(FxError::Http(_))));
    }
}
