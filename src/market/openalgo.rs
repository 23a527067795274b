//! OpenAlgo REST API client

use crate::config::UpstreamConfig;
use crate::error::{AppError, Result};
use crate::market::types::{ChainRequest, ColumnarHistory, ContractChain, HistoryRequest};
use crate::market::MarketDataSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const CHAIN_PATH: &str = "api/v1/oichain";
const HISTORY_PATH: &str = "api/v1/multihistory";

/// Client for an OpenAlgo server
pub struct OpenAlgoClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

/// Request body with the API key alongside the payload fields
#[derive(Serialize)]
struct Authenticated<'a, B: Serialize> {
    apikey: &'a str,
    #[serde(flatten)]
    body: &'a B,
}

impl OpenAlgoClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Config(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&Authenticated {
                apikey: &self.api_key,
                body,
            })
            .send()
            .await?;

        let http_status = response.status();
        let payload: serde_json::Value = response.json().await?;
        ensure_success(http_status.as_u16(), &payload)?;

        Ok(serde_json::from_value(payload)?)
    }
}

/// OpenAlgo responses carry `status: "success" | "error"` and an optional message
fn ensure_success(http_status: u16, payload: &serde_json::Value) -> Result<()> {
    let status = payload.get("status").and_then(|s| s.as_str());
    if status == Some("success") {
        return Ok(());
    }

    let message = payload
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Request failed");

    Err(AppError::Upstream(format!("{} (HTTP {})", message, http_status)))
}

#[async_trait]
impl MarketDataSource for OpenAlgoClient {
    fn id(&self) -> &'static str {
        "openalgo"
    }

    async fn fetch_contract_chain(&self, request: &ChainRequest) -> Result<ContractChain> {
        self.post(CHAIN_PATH, request).await
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<ColumnarHistory> {
        self.post(HISTORY_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(host: &str) -> UpstreamConfig {
        UpstreamConfig {
            host: host.to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let client = OpenAlgoClient::new(&config("http://127.0.0.1:5000")).unwrap();
        assert_eq!(
            client.endpoint(HISTORY_PATH).unwrap().as_str(),
            "http://127.0.0.1:5000/api/v1/multihistory"
        );

        let client = OpenAlgoClient::new(&config("https://algo.example.com/openalgo")).unwrap();
        assert_eq!(
            client.endpoint(CHAIN_PATH).unwrap().as_str(),
            "https://algo.example.com/openalgo/api/v1/oichain"
        );
    }

    #[test]
    fn test_body_carries_apikey() {
        let request = ChainRequest {
            underlying: "NIFTY".to_string(),
            exchange: "NFO".to_string(),
            expiry_date: "30JAN25".to_string(),
        };
        let body = serde_json::to_value(Authenticated {
            apikey: "k",
            body: &request,
        })
        .unwrap();

        assert_eq!(body, json!({"apikey": "k", "underlying": "NIFTY", "exchange": "NFO", "expiry_date": "30JAN25"}));
    }

    #[test]
    fn test_error_status_becomes_upstream_error() {
        assert!(ensure_success(200, &json!({"status": "success"})).is_ok());

        let err = ensure_success(403, &json!({"status": "error", "message": "Invalid openalgo apikey"}))
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref m) if m == "Invalid openalgo apikey (HTTP 403)"));

        let err = ensure_success(500, &json!({})).unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
