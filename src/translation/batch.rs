/*!
 * Batch translation processing.
 *
 * A batch is resolved in two tiers: the dictionary first, then a single
 * remote request for whatever the dictionary left untouched. Failure
 * accounting across batches belongs to the caller.
 */

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

use super::cache::{TranslationCache, TranslationSource};
use super::dictionary::{apply_dictionary_translation, was_translated_by_dictionary};

/// Result of the remote tier for one batch
#[derive(Debug)]
pub enum RemoteResult {
    /// The dictionary resolved every text
    NotNeeded,
    /// The provider translated this many texts
    Translated(usize),
    /// The provider call failed; `pending` texts are still unresolved
    Failed {
        pending: Vec<String>,
        error: ProviderError,
    },
}

/// What happened to one batch
#[derive(Debug)]
pub struct BatchReport {
    /// Texts resolved by the dictionary
    pub dictionary_hits: usize,
    /// Remote tier outcome
    pub remote: RemoteResult,
}

/// Batch translator for resolving texts against the dictionary and a provider
pub struct BatchTranslator {
    /// Remote provider for texts the dictionary cannot resolve
    provider: Arc<dyn Provider>,

    /// Pause after each remote call
    batch_delay: Duration,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(provider: Arc<dyn Provider>, batch_delay: Duration) -> Self {
        Self {
            provider,
            batch_delay,
        }
    }

    /// Resolve one batch, storing every successful translation in the cache.
    ///
    /// On a failed remote call nothing is stored for the pending texts; the
    /// caller decides between aborting and [`BatchTranslator::store_fallback`].
    pub async fn translate_batch(
        &self,
        batch: &[String],
        api_key: &str,
        cache: &mut TranslationCache,
    ) -> BatchReport {
        let mut dictionary_hits = 0;
        let mut pending = Vec::new();

        for text in batch {
            let translation = apply_dictionary_translation(text);
            if was_translated_by_dictionary(text, &translation) {
                cache.store(text, &translation, TranslationSource::Dictionary);
                dictionary_hits += 1;
            } else {
                pending.push(text.clone());
            }
        }

        if pending.is_empty() {
            debug!("Batch of {} resolved by dictionary", batch.len());
            return BatchReport {
                dictionary_hits,
                remote: RemoteResult::NotNeeded,
            };
        }

        debug!(
            "Batch of {}: {} from dictionary, {} sent to {}",
            batch.len(),
            dictionary_hits,
            pending.len(),
            self.provider.name()
        );

        let result = self.provider.translate_batch(&pending, api_key).await;

        if !self.batch_delay.is_zero() {
            tokio::time::sleep(self.batch_delay).await;
        }

        let remote = match result {
            Ok(translations) if translations.len() != pending.len() => {
                let error = ProviderError::ParseError(format!(
                    "expected {} translations, got {}",
                    pending.len(),
                    translations.len()
                ));
                warn!("Remote translation of {} text(s) failed: {}", pending.len(), error);
                RemoteResult::Failed { pending, error }
            }
            Ok(translations) => {
                for (text, translation) in pending.iter().zip(translations.iter()) {
                    cache.store(text, translation, TranslationSource::Provider);
                }
                RemoteResult::Translated(pending.len())
            }
            Err(error) => {
                warn!("Remote translation of {} text(s) failed: {}", pending.len(), error);
                RemoteResult::Failed { pending, error }
            }
        };

        BatchReport {
            dictionary_hits,
            remote,
        }
    }

    /// Map each unresolved text to itself
    pub fn store_fallback(pending: &[String], cache: &mut TranslationCache) {
        for text in pending {
            cache.store(text, text, TranslationSource::Fallback);
        }
    }
}
