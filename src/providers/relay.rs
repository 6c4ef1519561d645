use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Serialize;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslateResponse, error_from_status};

/// Client for the translation relay.
///
/// The relay forwards `{ texts, apiKey }` to the provider with the target
/// language fixed, and passes the provider's status and body back verbatim.
#[derive(Debug, Clone)]
pub struct RelayClient {
    /// HTTP client for API requests
    client: Client,
    /// Relay URL, e.g. `http://localhost:3000/api/translate`
    endpoint: String,
}

/// Relay request body
#[derive(Debug, Serialize)]
pub struct RelayRequest<'a> {
    /// Texts to translate
    pub texts: &'a [String],

    /// Credential forwarded to the provider
    #[serde(rename = "apiKey")]
    pub api_key: &'a str,
}

impl RelayClient {
    /// Create a new relay client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Relay URL this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Provider for RelayClient {
    async fn translate_batch(&self, texts: &[String], api_key: &str) -> Result<Vec<String>, ProviderError> {
        let request = RelayRequest { texts, api_key };
        debug!("Relay request with {} text(s) to {}", texts.len(), self.endpoint);

        let response = self.client.post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Relay error ({}): {}", status, error_text);
            return Err(error_from_status(status.as_u16(), error_text));
        }

        let body = response.json::<TranslateResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        body.into_texts(texts.len())
    }

    fn name(&self) -> &str {
        "relay"
    }
}
