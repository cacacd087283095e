//! Binance spot REST implementation of [`MarketDataSource`].

use crate::{
    error::ClientError,
    pair::{DetailRecord, PairId, PriceQuote, TradingPair},
    source::MarketDataSource,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default Binance spot REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const EXCHANGE_INFO_PATH: &str = "api/v3/exchangeInfo";
const TICKER_PRICE_PATH: &str = "api/v3/ticker/price";
const TICKER_24HR_PATH: &str = "api/v3/ticker/24hr";

/// Binance REST client configuration
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST API base URL
    pub base_url: String,
    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BinanceConfig {
    /// Create a new configuration with custom base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Configuration from BINANCE_REST_URL and BINANCE_TIMEOUT_MS env vars, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        let mut config = std::env::var("BINANCE_REST_URL")
            .map(Self::new)
            .unwrap_or_default();

        if let Some(timeout_ms) = std::env::var("BINANCE_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            config = config.with_request_timeout(Duration::from_millis(timeout_ms));
        }

        config
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// `GET /api/v3/exchangeInfo` response, reduced to the fields we use.
#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<TradingPair>,
}

pub struct BinanceRestClient {
    base_url: Url,
    http: Client,
}

impl BinanceRestClient {
    pub fn new(config: BinanceConfig) -> Result<Self, ClientError> {
        // Trailing slash so relative endpoint paths keep any base path prefix
        let base_url = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))?;
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self { base_url, http })
    }

    pub fn exchange_info_url(&self) -> Result<Url, ClientError> {
        Ok(self.base_url.join(EXCHANGE_INFO_PATH)?)
    }

    /// `ticker/price` URL carrying every pair as one JSON array `symbols` parameter.
    pub fn prices_url(&self, pairs: &[PairId]) -> Result<Url, ClientError> {
        let symbols = serde_json::to_string(pairs)?;
        let mut url = self.base_url.join(TICKER_PRICE_PATH)?;
        url.query_pairs_mut().append_pair("symbols", &symbols);
        Ok(url)
    }

    pub fn detail_url(&self, pair: &PairId) -> Result<Url, ClientError> {
        let mut url = self.base_url.join(TICKER_24HR_PATH)?;
        url.query_pairs_mut().append_pair("symbol", pair.as_str());
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MarketDataSource for BinanceRestClient {
    async fn fetch_catalog(&self) -> Result<Vec<TradingPair>, ClientError> {
        let info: ExchangeInfo = self.get(self.exchange_info_url()?).await?;
        Ok(info.symbols)
    }

    async fn fetch_prices(&self, pairs: &[PairId]) -> Result<Vec<PriceQuote>, ClientError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        self.get(self.prices_url(pairs)?).await
    }

    async fn fetch_detail(&self, pair: &PairId) -> Result<DetailRecord, ClientError> {
        self.get(self.detail_url(pair)?).await
    }
}
