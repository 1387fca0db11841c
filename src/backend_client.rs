use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::config::Config;

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub user_id: String,
    pub query: String,
}

/// The two style variants the backend answers with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateResponse {
    pub casual_response: String,
    pub formal_response: String,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} returned by backend: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The generation service as seen by the client.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError>;
}

pub struct BackendClient {
    generate_url: Url,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &Config) -> Self {
        Self {
            generate_url: config.endpoint("generate"),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        debug!(
            "Sending request to {}: {}",
            self.generate_url,
            serde_json::to_string(request).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.generate_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Backend request failed with {}: {}", status, body);
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        debug!("Received response from backend: {}", body);

        serde_json::from_str(&body).map_err(|e| {
            error!("Could not decode backend response: {}", e);
            BackendError::Decode(e.to_string())
        })
    }
}

/// Link to the backend's full history page for `user_id`.
pub fn history_url(config: &Config, user_id: &str) -> Url {
    let mut url = config.endpoint("history");
    url.query_pairs_mut().append_pair("user_id", user_id);
    url
}
