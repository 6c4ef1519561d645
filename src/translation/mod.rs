/*!
 * Hybrid translation pipeline.
 *
 * This module contains the dictionary tier, the per-run cache and the
 * orchestration of remote batches. It is split into several submodules:
 *
 * - `core`: The translation service driving a whole run
 * - `batch`: Dictionary-then-remote resolution of one batch
 * - `cache`: Per-run translation cache
 * - `dictionary`: Built-in terms and ordered rewrite rules
 * - `status`: Run status and progress records
 */

// Re-export main types for easier usage
pub use self::batch::BatchTranslator;
pub use self::core::{
    TranslationOptions, TranslationOutcome, TranslationService, TranslationStats, build_provider,
};
pub use self::dictionary::{apply_dictionary_translation, was_translated_by_dictionary};
pub use self::status::{StatusType, TranslationProgress, TranslationStatus};

// Submodules
pub mod batch;
pub mod cache;
pub mod core;
pub mod dictionary;
pub mod status;
