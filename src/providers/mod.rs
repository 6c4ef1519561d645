/*!
 * Provider implementations for remote translation.
 *
 * This module contains client implementations for the remote fallback used
 * when the dictionary cannot resolve a text:
 * - `relay`: same-origin relay speaking `{ texts, apiKey }`
 * - `yandex`: Yandex Cloud Translate v2, called directly
 * - `mock`: deterministic provider for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Text sent to validate an API key before a run
pub const PROBE_TEXT: &str = "test";

/// Common trait for all translation providers
///
/// A batch call is all-or-nothing: either every text comes back translated,
/// in the same order, or the whole call fails.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a batch of texts into the target language
    ///
    /// # Arguments
    /// * `texts` - Texts to translate, in order
    /// * `api_key` - Credential forwarded to the provider
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - One translation per input text
    async fn translate_batch(&self, texts: &[String], api_key: &str) -> Result<Vec<String>, ProviderError>;

    /// Check that the API key is accepted by translating a single probe text
    async fn test_connection(&self, api_key: &str) -> Result<(), ProviderError> {
        let probe = [PROBE_TEXT.to_string()];
        self.translate_batch(&probe, api_key).await.map(|_| ())
    }

    /// Human-readable provider name for logs
    fn name(&self) -> &str;
}

/// A single translated text as returned by the provider and the relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslatedText {
    /// Translated text
    pub text: String,

    /// Language detected by the provider, when reported
    #[serde(rename = "detectedLanguageCode", default, skip_serializing_if = "Option::is_none")]
    pub detected_language_code: Option<String>,
}

/// Response body shared by the provider and the relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslateResponse {
    /// Translations, positionally aligned with the request texts
    #[serde(default)]
    pub translations: Vec<TranslatedText>,
}

impl TranslateResponse {
    /// Extract the texts, checking they line up with the request
    pub fn into_texts(self, expected: usize) -> Result<Vec<String>, ProviderError> {
        if self.translations.len() != expected {
            return Err(ProviderError::ParseError(format!(
                "expected {} translations, got {}",
                expected,
                self.translations.len()
            )));
        }

        Ok(self.translations.into_iter().map(|t| t.text).collect())
    }
}

/// Map a non-success HTTP status and body to a provider error
pub(crate) fn error_from_status(status_code: u16, body: String) -> ProviderError {
    match status_code {
        401 | 403 => ProviderError::AuthenticationError(format!("{}: {}", status_code, body)),
        _ => ProviderError::ApiError {
            status_code,
            message: body,
        },
    }
}

pub mod mock;
pub mod relay;
pub mod yandex;
