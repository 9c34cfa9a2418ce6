use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::traits::DashboardBackend;
use crate::errors::CoreError;
use crate::models::mutation::{MutationKind, MutationOutcome};
use crate::models::purchase::{Purchase, PurchaseId, PurchaseInput};
use crate::models::settings::{MarketMode, Settings};
use crate::models::ticker::TickerSnapshot;

/// Longest slice of an error body quoted back in an error message.
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the purchases backend.
///
/// - `GET /purchases` (`?market=` in multi-market mode), newest first
/// - `GET /markets`: market directory
/// - `GET /ticker/{market}`, or `GET /bitcoin` in single-market mode
/// - `POST /purchase`, `PUT /purchase/{id}`, `DELETE /purchase/{id}`
///
/// Mutations answer `{"success": bool}` or `{"invalid": true}` (HTTP 400);
/// a create answers with the stored document.
pub struct RestBackend {
    client: Client,
    base_url: String,
    mode: MarketMode,
}

impl RestBackend {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| CoreError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: settings.api_base_url.trim().trim_end_matches('/').to_string(),
            mode: settings.market_mode,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `/purchases`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[must_use]
    pub fn ticker_path(&self, market: &str) -> String {
        match self.mode {
            MarketMode::Single => "/bitcoin".to_string(),
            MarketMode::Multi => format!("/ticker/{market}"),
        }
    }

    #[must_use]
    pub fn purchase_path(id: &PurchaseId) -> String {
        format!("/purchase/{id}")
    }

    /// Decode a 2xx JSON body, or turn anything else into `CoreError::Api`.
    pub fn decode_body<T: DeserializeOwned>(
        path: &str,
        status: StatusCode,
        body: &str,
    ) -> Result<T, CoreError> {
        if !status.is_success() {
            return Err(CoreError::Api {
                endpoint: path.to_string(),
                message: format!("HTTP {status}: {}", excerpt(body)),
            });
        }
        serde_json::from_str(body).map_err(|e| CoreError::Api {
            endpoint: path.to_string(),
            message: format!("Failed to parse response: {e}"),
        })
    }

    /// Interpret a mutation response. The body is read before the status:
    /// `{"invalid": true}` arrives with HTTP 400 and is an outcome, not an
    /// error. Any other non-2xx answer is `CoreError::Api`.
    pub fn mutation_outcome(
        kind: MutationKind,
        path: &str,
        status: StatusCode,
        body: &str,
    ) -> Result<MutationOutcome, CoreError> {
        let http_error = || CoreError::Api {
            endpoint: path.to_string(),
            message: format!("HTTP {status}: {}", excerpt(body)),
        };
        match serde_json::from_str::<Value>(body) {
            Ok(value) => {
                match MutationOutcome::from_response(kind, &value) {
                    Ok(MutationOutcome::Invalid) => Ok(MutationOutcome::Invalid),
                    _ if !status.is_success() => Err(http_error()),
                    other => other,
                }
            }
            Err(_) if !status.is_success() => Err(http_error()),
            Err(e) => Err(CoreError::Api {
                endpoint: path.to_string(),
                message: format!("Failed to parse response: {e}"),
            }),
        }
    }

    async fn read_json<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, CoreError> {
        let status = resp.status();
        let body = resp.text().await?;
        Self::decode_body(path, status, &body)
    }

    async fn read_mutation(
        kind: MutationKind,
        path: &str,
        resp: Response,
    ) -> Result<MutationOutcome, CoreError> {
        let status = resp.status();
        let body = resp.text().await?;
        Self::mutation_outcome(kind, path, status, &body)
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

// ── Backend response types ──────────────────────────────────────────

/// The directory lists either bare symbols or market objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum MarketEntry {
    Symbol(String),
    Detailed { symbol: String },
}

impl MarketEntry {
    fn into_symbol(self) -> String {
        match self {
            MarketEntry::Symbol(symbol) | MarketEntry::Detailed { symbol } => symbol,
        }
    }
}

#[async_trait]
impl DashboardBackend for RestBackend {
    fn name(&self) -> &str {
        "REST"
    }

    async fn list_purchases(&self, market: Option<&str>) -> Result<Vec<Purchase>, CoreError> {
        let path = "/purchases";
        let mut request = self.client.get(self.endpoint(path));
        if let Some(market) = market {
            request = request.query(&[("market", market)]);
        }
        let resp = request.send().await?;
        Self::read_json(path, resp).await
    }

    async fn list_markets(&self) -> Result<Vec<String>, CoreError> {
        let path = "/markets";
        let resp = self.client.get(self.endpoint(path)).send().await?;
        let entries: Vec<MarketEntry> = Self::read_json(path, resp).await?;
        Ok(entries.into_iter().map(MarketEntry::into_symbol).collect())
    }

    async fn get_ticker(&self, market: &str) -> Result<TickerSnapshot, CoreError> {
        let path = self.ticker_path(market);
        let resp = self.client.get(self.endpoint(&path)).send().await?;
        let mut ticker: TickerSnapshot = Self::read_json(&path, resp).await?;
        if ticker.market.is_empty() {
            ticker.market = market.to_string();
        }
        Ok(ticker)
    }

    async fn create_purchase(&self, input: &PurchaseInput) -> Result<MutationOutcome, CoreError> {
        let path = "/purchase";
        let resp = self
            .client
            .post(self.endpoint(path))
            .json(input)
            .send()
            .await?;
        Self::read_mutation(MutationKind::Create, path, resp).await
    }

    async fn update_purchase(
        &self,
        id: &PurchaseId,
        input: &PurchaseInput,
    ) -> Result<MutationOutcome, CoreError> {
        let path = Self::purchase_path(id);
        let resp = self
            .client
            .put(self.endpoint(&path))
            .json(input)
            .send()
            .await?;
        Self::read_mutation(MutationKind::Update, &path, resp).await
    }

    async fn delete_purchase(&self, id: &PurchaseId) -> Result<MutationOutcome, CoreError> {
        let path = Self::purchase_path(id);
        let resp = self.client.delete(self.endpoint(&path)).send().await?;
        Self::read_mutation(MutationKind::Delete, &path, resp).await
    }
}
