/*!
 * Per-run translation cache.
 *
 * Maps each original cell text to its final translation for the duration of
 * a single run. The cache is never shared between runs or files.
 */

use std::collections::HashMap;
use log::debug;

/// Where a cached translation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationSource {
    /// Resolved by the built-in dictionary
    Dictionary,
    /// Returned by the remote provider
    Provider,
    /// Provider failed, original text kept
    Fallback,
}

/// Translation cache for one run
#[derive(Debug, Default, Clone)]
pub struct TranslationCache {
    /// Original text -> translated text
    entries: HashMap<String, String>,
}

impl TranslationCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a translation.
    ///
    /// An empty or whitespace-only translation is replaced by the original
    /// text so that no cell is ever blanked out by a bad response.
    pub fn store(&mut self, original: &str, translation: &str, source: TranslationSource) {
        let value = if translation.trim().is_empty() {
            debug!("Empty translation for '{}', keeping original", truncate_text(original, 30));
            original
        } else {
            translation
        };

        debug!(
            "Cached {:?} translation for '{}'",
            source,
            truncate_text(original, 30)
        );
        self.entries.insert(original.to_string(), value.to_string());
    }

    /// Get a translation from the cache
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    /// Check whether a text has a translation
    pub fn contains(&self, original: &str) -> bool {
        self.entries.contains_key(original)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the underlying map for reinsertion
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.entries
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
