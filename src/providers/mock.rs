/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with marked translations
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::fail_after_probe()` - Accepts the key, then fails every batch
 * - `MockProvider::rejecting_key()` - Rejects the key on every request
 * - `MockProvider::short_answers()` - Drops the last translation of every batch
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// First request succeeds, every later request fails
    FailAfterProbe,
    /// Every request fails with an authentication error
    RejectingKey,
    /// Returns empty translations
    Empty,
    /// Returns one translation fewer than requested
    ShortAnswers,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Every batch received, in order
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that passes the key probe and fails afterwards
    pub fn fail_after_probe() -> Self {
        Self::new(MockBehavior::FailAfterProbe)
    }

    /// Create a mock that rejects every API key
    pub fn rejecting_key() -> Self {
        Self::new(MockBehavior::RejectingKey)
    }

    /// Create a mock that returns empty translations
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that answers with one translation too few
    pub fn short_answers() -> Self {
        Self::new(MockBehavior::ShortAnswers)
    }

    /// Translation produced by the working behavior
    pub fn translated(text: &str) -> String {
        format!("[RU] {}", text)
    }

    /// Number of requests received, including the key probe
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Batches received, including the key probe
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    fn succeed(texts: &[String]) -> Vec<String> {
        texts.iter().map(|t| Self::translated(t)).collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate_batch(&self, texts: &[String], _api_key: &str) -> Result<Vec<String>, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(texts.to_vec());

        match self.behavior {
            MockBehavior::Working => Ok(Self::succeed(texts)),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(Self::succeed(texts))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::FailAfterProbe => {
                if count == 0 {
                    Ok(Self::succeed(texts))
                } else {
                    Err(ProviderError::ApiError {
                        message: "Simulated quota exhaustion".to_string(),
                        status_code: 429,
                    })
                }
            }

            MockBehavior::RejectingKey => Err(ProviderError::AuthenticationError(
                "401: Simulated invalid API key".to_string(),
            )),

            MockBehavior::Empty => Ok(vec![String::new(); texts.len()]),

            MockBehavior::ShortAnswers => {
                let mut translations = Self::succeed(texts);
                translations.pop();
                Ok(translations)
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
