//! REST client for the bot backend API.
//!
//! Every call is a single request: failures are returned to the caller, who
//! decides whether and when to try again.

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::bot::types::{
    ActionResponse, ApiCandle, Balance, BotConfig, BotConfigUpdate, BotStatus, GlobalStatus,
    LogEntry, Metrics, Position, PriceTicker, SignalSnapshot, Trade,
};
use crate::error::{BotError, Result};
use crate::indicators::timeframe::Timeframe;

/// Typed client for the backend's `/api` endpoints.
#[derive(Debug, Clone)]
pub struct BotApiClient {
    http: Client,
    base_url: Url,
}

impl BotApiClient {
    /// Creates a client for the backend at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BotError::Config(format!("invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BotError::Config(format!("API URL '{}' cannot be a base", base_url)));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for `segments` below the base path.
    /// Each segment is percent-encoded, so symbols like `BTC/USDT` stay one segment.
    pub fn endpoint_url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BotError::Config(format!("API URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn request<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T> {
        self.execute(self.http.request(method, url.clone()), url).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, url: Url) -> Result<T> {
        debug!(url = %url, "Bot API request");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(url = %url, %status, "Bot API returned error status");
            return Err(BotError::Status {
                endpoint: url.path().to_string(),
                status,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint_url(segments, query)?;
        self.request(Method::GET, url).await
    }

    async fn post<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint_url(segments, &[])?;
        self.request(Method::POST, url).await
    }

    pub async fn get_global_status(&self) -> Result<GlobalStatus> {
        self.get(&["api", "status"], &[]).await
    }

    pub async fn get_symbol_status(&self, symbol: &str) -> Result<BotStatus> {
        self.get(&["api", "status", symbol], &[]).await
    }

    pub async fn get_price(&self, symbol: &str) -> Result<PriceTicker> {
        self.get(&["api", "price", symbol], &[]).await
    }

    pub async fn get_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
        heikin_ashi: bool,
    ) -> Result<Vec<ApiCandle>> {
        let query = candle_query(timeframe, limit, heikin_ashi);
        self.get(&["api", "candles", symbol], &query).await
    }

    pub async fn get_signal(&self, symbol: &str) -> Result<SignalSnapshot> {
        self.get(&["api", "signal", symbol], &[]).await
    }

    pub async fn get_positions(&self) -> Result<Vec<Position>> {
        self.get(&["api", "positions"], &[]).await
    }

    /// Returns `None` when the backend reports no open position for `symbol`.
    pub async fn get_position(&self, symbol: &str) -> Result<Option<Position>> {
        self.get(&["api", "positions", symbol], &[]).await
    }

    pub async fn get_balance(&self) -> Result<Balance> {
        self.get(&["api", "balance"], &[]).await
    }

    pub async fn get_history(&self, limit: usize) -> Result<Vec<Trade>> {
        self.get(&["api", "history"], &[("limit", limit.to_string())]).await
    }

    pub async fn get_symbol_history(&self, symbol: &str, limit: usize) -> Result<Vec<Trade>> {
        self.get(&["api", "history", symbol], &[("limit", limit.to_string())])
            .await
    }

    pub async fn start_bot(&self, symbol: &str) -> Result<ActionResponse> {
        self.post(&["api", "bot", "start", symbol]).await
    }

    pub async fn stop_bot(&self, symbol: &str) -> Result<ActionResponse> {
        self.post(&["api", "bot", "stop", symbol]).await
    }

    pub async fn start_all_bots(&self) -> Result<ActionResponse> {
        self.post(&["api", "bot", "start-all"]).await
    }

    pub async fn stop_all_bots(&self) -> Result<ActionResponse> {
        self.post(&["api", "bot", "stop-all"]).await
    }

    pub async fn get_config(&self, symbol: &str) -> Result<BotConfig> {
        self.get(&["api", "config", symbol], &[]).await
    }

    /// Sends a partial config; fields left as `None` are not transmitted.
    pub async fn update_config(
        &self,
        symbol: &str,
        update: &BotConfigUpdate,
    ) -> Result<ActionResponse> {
        let url = self.endpoint_url(&["api", "config", symbol], &[])?;
        let request = self.http.put(url.clone()).json(update);
        self.execute(request, url).await
    }

    pub async fn get_logs(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.get(&["api", "logs"], &[("limit", limit.to_string())]).await
    }

    pub async fn get_metrics(&self) -> Result<Metrics> {
        self.get(&["api", "metrics"], &[]).await
    }
}

fn candle_query(
    timeframe: Timeframe,
    limit: usize,
    heikin_ashi: bool,
) -> Vec<(&'static str, String)> {
    vec![
        ("timeframe", timeframe.to_string()),
        ("limit", limit.to_string()),
        ("heikin_ashi", heikin_ashi.to_string()),
    ]
}
