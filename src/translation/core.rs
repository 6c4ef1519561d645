/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService, which drives one run over a
 * workbook: API key check, text extraction, batched dictionary and remote
 * resolution under an error budget, progress reporting and reinsertion.
 */

use log::{debug, error, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, TranslationCommonConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::needs_translation;
use crate::providers::Provider;
use crate::providers::relay::RelayClient;
use crate::providers::yandex::Yandex;
use crate::spreadsheet::{Workbook, apply_translations, build_output, extract_unique_texts, read_workbook};

use super::batch::{BatchTranslator, RemoteResult};
use super::cache::TranslationCache;
use super::status::{StatusType, TranslationProgress, TranslationStatus};

/// Callback invoked every time progress is published
pub type ProgressListener = Box<dyn Fn(&TranslationProgress) + Send + Sync>;

/// Statistics collected over one run
#[derive(Debug, Clone)]
pub struct TranslationStats {
    /// Distinct non-blank text cells
    pub unique_texts: usize,

    /// Texts that needed translation
    pub texts_to_translate: usize,

    /// Texts resolved by the dictionary
    pub dictionary_hits: usize,

    /// Texts translated by the provider
    pub remote_translations: usize,

    /// Texts kept in the original language after a failed batch
    pub fallbacks: usize,

    /// Failed remote calls
    pub api_errors: usize,

    /// Remote calls made, excluding the key probe
    pub remote_calls: usize,

    /// Start time of the run
    pub start_time: Instant,

    /// Run duration, set on completion
    pub elapsed: Duration,
}

impl Default for TranslationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStats {
    /// Create empty stats starting now
    pub fn new() -> Self {
        Self {
            unique_texts: 0,
            texts_to_translate: 0,
            dictionary_hits: 0,
            remote_translations: 0,
            fallbacks: 0,
            api_errors: 0,
            remote_calls: 0,
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Texts that ended up with a translation (dictionary or provider)
    pub fn translated(&self) -> usize {
        self.dictionary_hits + self.remote_translations
    }

    /// Generate a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Translation Summary:\n\
             Unique texts: {}\n\
             Texts to translate: {}\n\
             Dictionary hits: {}\n\
             Remote translations: {}\n\
             Kept original: {}\n\
             Remote calls: {} ({} failed)\n\
             Elapsed time: {:.2} seconds",
            self.unique_texts,
            self.texts_to_translate,
            self.dictionary_hits,
            self.remote_translations,
            self.fallbacks,
            self.remote_calls,
            self.api_errors,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Translated single-sheet workbook; `None` when there was nothing to translate
    pub output: Option<Workbook>,

    /// Run statistics
    pub stats: TranslationStats,
}

/// Run settings
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Texts per remote request
    pub batch_size: usize,

    /// Failed batches tolerated; one more aborts the run
    pub max_api_errors: usize,

    /// Pause after each remote call
    pub batch_delay: Duration,

    /// Progress publication interval, in processed texts
    pub progress_interval: usize,

    /// Shortest API key worth probing
    pub min_api_key_length: usize,

    /// Delay before a finished run returns to idle
    pub status_reset_delay: Duration,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self::from(&TranslationCommonConfig::default())
    }
}

impl From<&TranslationCommonConfig> for TranslationOptions {
    fn from(common: &TranslationCommonConfig) -> Self {
        Self {
            batch_size: common.batch_size,
            max_api_errors: common.max_api_errors,
            batch_delay: Duration::from_millis(common.batch_delay_ms),
            progress_interval: common.progress_interval,
            min_api_key_length: common.min_api_key_length,
            status_reset_delay: Duration::from_millis(common.status_reset_delay_ms),
        }
    }
}

/// Document handed to a run
#[derive(Debug, Clone, Copy)]
enum Document<'a> {
    /// Already parsed workbook
    Parsed(&'a Workbook),
    /// Raw xlsx bytes, parsed once the API key has been accepted
    Raw(&'a [u8]),
}

/// Observable state shared with status readers
#[derive(Default)]
struct ServiceState {
    status: TranslationStatus,
    progress: Option<TranslationProgress>,
    /// Bumped on every transition so stale auto-resets can be detected
    generation: u64,
}

/// Build the remote provider selected by the configuration
pub fn build_provider(config: &Config) -> Arc<dyn Provider> {
    let translation = &config.translation;
    let endpoint = translation.get_endpoint();
    let timeout_secs = translation.get_timeout_secs();

    match translation.provider {
        ConfigTranslationProvider::Relay => Arc::new(RelayClient::new(endpoint, timeout_secs)),
        ConfigTranslationProvider::Yandex => {
            Arc::new(Yandex::new(endpoint, config.target_language.clone(), timeout_secs))
        }
    }
}

/// Main translation service for spreadsheet translation
#[derive(Clone)]
pub struct TranslationService {
    /// Remote provider
    provider: Arc<dyn Provider>,

    /// Run settings
    pub options: TranslationOptions,

    state: Arc<Mutex<ServiceState>>,

    listener: Arc<Mutex<Option<ProgressListener>>>,
}

impl TranslationService {
    /// Create a new translation service around a provider
    pub fn new(provider: Arc<dyn Provider>, options: TranslationOptions) -> Self {
        Self {
            provider,
            options,
            state: Arc::new(Mutex::new(ServiceState::default())),
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a translation service from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(build_provider(config), TranslationOptions::from(&config.translation.common))
    }

    /// Name of the remote provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current run status
    pub fn status(&self) -> TranslationStatus {
        self.state.lock().status.clone()
    }

    /// Latest published progress, if a run is in its batch phase
    pub fn progress(&self) -> Option<TranslationProgress> {
        self.state.lock().progress.clone()
    }

    /// Register a callback for progress updates
    pub fn set_progress_listener<F>(&self, listener: F)
    where
        F: Fn(&TranslationProgress) + Send + Sync + 'static,
    {
        *self.listener.lock() = Some(Box::new(listener));
    }

    /// Remove the progress callback
    pub fn clear_progress_listener(&self) {
        *self.listener.lock() = None;
    }

    /// Return a finished run to idle immediately. Ignored while processing.
    pub fn reset_status(&self) {
        let mut state = self.state.lock();
        if state.status.is_processing() {
            debug!("Ignoring status reset while a translation is in progress");
            return;
        }
        state.generation += 1;
        state.status = TranslationStatus::idle();
        state.progress = None;
    }

    /// Translate the first sheet of a workbook.
    ///
    /// Every call ends in `Success` or `Error`; both return to `Idle` after
    /// the configured delay. A call made while another run is processing is
    /// rejected without touching that run.
    pub async fn translate_workbook(
        &self,
        workbook: &Workbook,
        api_key: &str,
    ) -> Result<TranslationOutcome, TranslationError> {
        self.run(Document::Parsed(workbook), api_key).await
    }

    /// Translate the first sheet of an xlsx document held in memory.
    ///
    /// The bytes are parsed after the API key check, so a rejected key is
    /// reported before any parsing error.
    pub async fn translate_file(&self, bytes: &[u8], api_key: &str) -> Result<TranslationOutcome, TranslationError> {
        self.run(Document::Raw(bytes), api_key).await
    }

    async fn run(&self, document: Document<'_>, api_key: &str) -> Result<TranslationOutcome, TranslationError> {
        {
            let mut state = self.state.lock();
            if state.status.is_processing() {
                return Err(TranslationError::AlreadyRunning);
            }
            state.generation += 1;
            state.status = TranslationStatus::new(StatusType::Processing, "Checking API key...");
            state.progress = None;
        }

        let mut stats = TranslationStats::new();
        let result = self.execute(document, api_key, &mut stats).await;
        stats.elapsed = stats.start_time.elapsed();

        match result {
            Ok(output) => {
                let message = match &output {
                    Some(_) => format!(
                        "File translated successfully ({} of {} texts translated)",
                        stats.translated(),
                        stats.texts_to_translate
                    ),
                    None => "The file contains no texts to translate".to_string(),
                };
                info!("{}", message);
                info!("{}", stats.summary());
                self.finish(StatusType::Success, message);
                Ok(TranslationOutcome { output, stats })
            }
            Err(e) => {
                error!("Translation failed: {}", e);
                self.finish(StatusType::Error, format!("Error: {}", e));
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        document: Document<'_>,
        api_key: &str,
        stats: &mut TranslationStats,
    ) -> Result<Option<Workbook>, TranslationError> {
        if self.options.batch_size == 0 {
            return Err(TranslationError::InvalidInput("batch size must be greater than zero".to_string()));
        }
        if self.options.progress_interval == 0 {
            return Err(TranslationError::InvalidInput("progress interval must be greater than zero".to_string()));
        }

        self.validate_api_key(api_key).await?;

        self.set_status(StatusType::Processing, "Reading file...");
        let parsed;
        let workbook = match document {
            Document::Parsed(workbook) => workbook,
            Document::Raw(bytes) => {
                parsed = read_workbook(bytes)?;
                &parsed
            }
        };
        let sheet = workbook.first_sheet()?;

        self.set_status(StatusType::Processing, "Analyzing texts...");
        let unique = extract_unique_texts(&sheet.grid);
        stats.unique_texts = unique.len();

        let mut texts: Vec<String> = unique.into_iter().filter(|t| needs_translation(t)).collect();
        texts.sort();
        stats.texts_to_translate = texts.len();

        if texts.is_empty() {
            info!("Sheet '{}' has {} text(s), none need translation", sheet.name, stats.unique_texts);
            return Ok(None);
        }

        let total = texts.len();
        info!("Found {} text(s) to translate in sheet '{}'", total, sheet.name);
        self.publish_progress(TranslationProgress::new(0, total, format!("Found {} texts to translate", total)));

        let mut cache = TranslationCache::new();
        self.resolve_batches(&texts, api_key, &mut cache, stats).await?;

        self.set_status(StatusType::Processing, "Building document...");
        let translated = apply_translations(&sheet.grid, cache.as_map());
        Ok(Some(build_output(workbook, &sheet.name, translated)))
    }

    /// Reject short keys locally, then probe the provider once
    async fn validate_api_key(&self, api_key: &str) -> Result<(), TranslationError> {
        if api_key.trim().chars().count() < self.options.min_api_key_length {
            return Err(TranslationError::InvalidApiKey(format!(
                "key must be at least {} characters",
                self.options.min_api_key_length
            )));
        }

        debug!("Probing {} with the API key", self.provider.name());
        self.provider
            .test_connection(api_key)
            .await
            .map_err(|e| TranslationError::InvalidApiKey(format!("the provider rejected the key ({})", e)))
    }

    async fn resolve_batches(
        &self,
        texts: &[String],
        api_key: &str,
        cache: &mut TranslationCache,
        stats: &mut TranslationStats,
    ) -> Result<(), TranslationError> {
        let batch_size = self.options.batch_size;
        let total = texts.len();
        let translator = BatchTranslator::new(Arc::clone(&self.provider), self.options.batch_delay);

        for (index, batch) in texts.chunks(batch_size).enumerate() {
            let report = translator.translate_batch(batch, api_key, cache).await;
            stats.dictionary_hits += report.dictionary_hits;

            match report.remote {
                RemoteResult::NotNeeded => {}
                RemoteResult::Translated(count) => {
                    stats.remote_calls += 1;
                    stats.remote_translations += count;
                }
                RemoteResult::Failed { pending, error } => {
                    stats.remote_calls += 1;
                    stats.api_errors += 1;
                    self.check_error_budget(stats.api_errors, error)?;
                    stats.fallbacks += pending.len();
                    BatchTranslator::store_fallback(&pending, cache);
                }
            }

            let processed = (index + 1) * batch_size;
            if processed >= total || processed % self.options.progress_interval == 0 {
                let current = processed.min(total);
                self.publish_progress(TranslationProgress::new(
                    current,
                    total,
                    format!("Processed {} of {}", current, total),
                ));
            }
        }

        Ok(())
    }

    fn check_error_budget(&self, api_errors: usize, error: ProviderError) -> Result<(), TranslationError> {
        if api_errors > self.options.max_api_errors {
            return Err(TranslationError::TooManyApiErrors {
                errors: api_errors,
                last: error,
            });
        }
        debug!(
            "API error {} of {} tolerated, keeping original texts",
            api_errors, self.options.max_api_errors
        );
        Ok(())
    }

    fn set_status(&self, status_type: StatusType, message: impl Into<String>) {
        let mut state = self.state.lock();
        state.status = TranslationStatus::new(status_type, message);
    }

    fn publish_progress(&self, progress: TranslationProgress) {
        debug!("Progress {}/{}: {}", progress.current, progress.total, progress.message);
        self.state.lock().progress = Some(progress.clone());
        if let Some(listener) = self.listener.lock().as_ref() {
            listener(&progress);
        }
    }

    /// Record the final status, clear progress and schedule the return to idle
    fn finish(&self, status_type: StatusType, message: String) {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.status = TranslationStatus::new(status_type, message);
            state.progress = None;
            state.generation
        };

        let state = Arc::clone(&self.state);
        let delay = self.options.status_reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock();
            if state.generation == generation {
                state.status = TranslationStatus::idle();
                state.progress = None;
            }
        });
    }
}
