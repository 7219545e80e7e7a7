use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;
use crate::error::ClientError;

use super::types::{LoanApplication, PredictionOutcome};

/// Thin client for the CredSetu prediction service.
///
/// Every request carries a fixed timeout (default 5000 ms); reqwest owns the
/// deadline, so nothing is left pending on any exit path. Success and
/// failure are normalized into [`ClientError`] variants; no retries happen
/// at this layer.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::BaseUrl(format!("{}: {}", config.base_url, e)))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a bounded-timeout request and normalize the outcome.
    ///
    /// Non-2xx responses are reported as [`ClientError::Server`], using the
    /// body's `detail` field verbatim when present and "API Error: <status>"
    /// otherwise. A 2xx body that is not valid JSON is
    /// [`ClientError::Malformed`].
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ClientError::BaseUrl(format!("{}: {}", endpoint, e)))?;

        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["detail"].as_str().map(|s| s.to_string()));
            return Err(ClientError::Server(
                detail.unwrap_or_else(|| format!("API Error: {}", status.as_u16())),
            ));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        serde_json::from_str(&body).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    /// Probe the service root. Any 2xx JSON body counts as reachable.
    pub async fn check_status(&self) -> Result<Value, ClientError> {
        self.request("/", Method::GET, None).await
    }

    /// Kick off model training on the service. Not part of the normal
    /// prediction flow; exposed for the CLI.
    pub async fn train(&self) -> Result<Value, ClientError> {
        info!("Requesting model training");
        self.request("/train", Method::POST, None).await
    }

    /// Submit an application for a default-risk prediction.
    pub async fn predict(
        &self,
        application: &LoanApplication,
    ) -> Result<PredictionOutcome, ClientError> {
        let body = serde_json::to_value(application)
            .map_err(|e| ClientError::Malformed(format!("Failed to encode application: {}", e)))?;
        let response = self.request("/predict", Method::POST, Some(&body)).await?;
        serde_json::from_value(response).map_err(|e| ClientError::Malformed(e.to_string()))
    }
}
