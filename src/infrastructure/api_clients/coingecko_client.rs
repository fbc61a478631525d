use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::price::{PriceSnapshot, PriceSource};
use crate::shared::errors::FetchError;

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Quote entry of the `/simple/price` response, keyed by asset id
#[derive(Debug, Deserialize)]
struct SimplePriceQuote {
    usd: Option<f64>,
    usd_24h_vol: Option<f64>,
    usd_24h_change: Option<f64>,
}

/// CoinGecko simple price API client
pub struct CoinGeckoClient {
    http_client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(COINGECKO_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn price_url(&self, asset_id: &str) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_vol=true&include_24hr_change=true",
            self.base_url, asset_id
        )
    }
}

/// Extracts the snapshot for `asset_id` from a `/simple/price` body.
pub fn parse_simple_price(body: &str, asset_id: &str) -> Result<PriceSnapshot, FetchError> {
    let mut quotes: HashMap<String, SimplePriceQuote> =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let quote = quotes
        .remove(asset_id)
        .ok_or_else(|| FetchError::AssetNotFound(asset_id.to_string()))?;

    let price = quote
        .usd
        .ok_or_else(|| FetchError::Parse(format!("missing 'usd' price for '{}'", asset_id)))?;
    if !price.is_finite() || price <= 0.0 {
        return Err(FetchError::Parse(format!("invalid price {} for '{}'", price, asset_id)));
    }

    Ok(PriceSnapshot::new(asset_id, price, Utc::now())
        .with_market_data(quote.usd_24h_vol, quote.usd_24h_change))
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch(&self, asset_id: &str) -> Result<PriceSnapshot, FetchError> {
        let url = self.price_url(asset_id);
        debug!("Fetching price from {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("PriceWatch/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_simple_price(&body, asset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_quote() {
        let body = r#"{"bitcoin":{"usd":67123.5,"usd_24h_vol":28000000000.12,"usd_24h_change":-1.25}}"#;
        let snapshot = parse_simple_price(body, "bitcoin").unwrap();
        assert_eq!(snapshot.asset_id, "bitcoin");
        assert_eq!(snapshot.price, 67123.5);
        assert_eq!(snapshot.volume_24h, Some(28000000000.12));
        assert_eq!(snapshot.change_24h_pct, Some(-1.25));
    }

    #[test]
    fn test_parse_without_optional_fields() {
        let snapshot = parse_simple_price(r#"{"pepe":{"usd":0.000012}}"#, "pepe").unwrap();
        assert_eq!(snapshot.price, 0.000012);
        assert!(snapshot.volume_24h.is_none());
        assert!(snapshot.change_24h_pct.is_none());
    }

    #[test]
    fn test_unknown_asset() {
        let err = parse_simple_price("{}", "no-such-coin").unwrap_err();
        assert!(matches!(err, FetchError::AssetNotFound(id) if id == "no-such-coin"));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_simple_price("<html>rate limited</html>", "bitcoin"),
            Err(FetchError::Parse(_))
        ));
        assert!(matches!(
            parse_simple_price(r#"{"bitcoin":{"eur":1.0}}"#, "bitcoin"),
            Err(FetchError::Parse(_))
        ));
        assert!(matches!(
            parse_simple_price(r#"{"bitcoin":{"usd":0}}"#, "bitcoin"),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_price_url() {
        let client = CoinGeckoClient::with_base_url("http://localhost:8080/api/v3/").unwrap();
        assert_eq!(
            client.price_url("bitcoin"),
            "http://localhost:8080/api/v3/simple/price?ids=bitcoin&vs_currencies=usd&include_24hr_vol=true&include_24hr_change=true"
        );
    }

    /// Serves one canned HTTP response and hands back the raw request head.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_fetch_sends_expected_request() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 27\r\nconnection: close\r\n\r\n{\"bitcoin\":{\"usd\":65000.0}}",
        )
        .await;

        let client = CoinGeckoClient::with_base_url(base_url).unwrap();
        let snapshot = client.fetch("bitcoin").await.unwrap();
        assert_eq!(snapshot.price, 65000.0);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /simple/price?ids=bitcoin&vs_currencies=usd"));
        assert!(request.contains("accept: application/json"));
        assert!(request.contains("user-agent: pricewatch/"));
    }

    #[tokio::test]
    async fn test_fetch_http_500() {
        let (base_url, _server) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let client = CoinGeckoClient::with_base_url(base_url).unwrap();
        let err = client.fetch("bitcoin").await.unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn test_fetch_unknown_asset() {
        let (base_url, _server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}",
        )
        .await;

        let client = CoinGeckoClient::with_base_url(base_url).unwrap();
        let err = client.fetch("no-such-coin").await.unwrap_err();
        assert!(matches!(err, FetchError::AssetNotFound(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections locally.
        let client = CoinGeckoClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client.fetch("bitcoin").await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
