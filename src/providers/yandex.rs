use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Serialize;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslateResponse, error_from_status};

/// Default Yandex Cloud Translate v2 endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translate.api.cloud.yandex.net/translate/v2/translate";

/// Yandex Cloud Translate client
#[derive(Debug, Clone)]
pub struct Yandex {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL (defaults to the public API when empty)
    endpoint: String,
    /// Target language code sent with every request
    target_language: String,
}

/// Yandex translate request body
#[derive(Debug, Serialize)]
pub struct YandexRequest<'a> {
    /// Texts to translate
    pub texts: &'a [String],

    /// Target language code
    #[serde(rename = "targetLanguageCode")]
    pub target_language_code: &'a str,

    /// Source language code; the provider detects it when absent
    #[serde(rename = "sourceLanguageCode", skip_serializing_if = "Option::is_none")]
    pub source_language_code: Option<&'a str>,
}

impl Yandex {
    /// Create a new Yandex client
    pub fn new(endpoint: impl Into<String>, target_language: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            target_language: target_language.into(),
        }
    }

    fn api_url(&self) -> &str {
        if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            &self.endpoint
        }
    }
}

#[async_trait]
impl Provider for Yandex {
    async fn translate_batch(&self, texts: &[String], api_key: &str) -> Result<Vec<String>, ProviderError> {
        let request = YandexRequest {
            texts,
            target_language_code: &self.target_language,
            source_language_code: None,
        };
        debug!("Yandex request with {} text(s)", texts.len());

        let response = self.client.post(self.api_url())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Api-Key {}", api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Yandex API response status: {}", status);
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Yandex API error ({}): {}", status, error_text);
            return Err(error_from_status(status.as_u16(), error_text));
        }

        let body = response.json::<TranslateResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        body.into_texts(texts.len())
    }

    fn name(&self) -> &str {
        "yandex"
    }
}
