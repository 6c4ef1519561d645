use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

// Language utilities for cell text classification
//
// Decides which language a cell is written in, using Unicode script ranges
// and a small keyword heuristic, and resolves ISO 639 codes to display names.

/// Language detected for a piece of cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    /// Armenian script (U+0530..U+058F)
    Armenian,
    /// Latin-only text with banking/invoice keywords
    English,
    /// Cyrillic script (U+0400..U+04FF), already in the target language
    Russian,
    /// Anything else: numbers, codes, names, mixed content
    Unknown,
}

impl LanguageCode {
    /// ISO 639-1 code, or `unknown`
    pub fn iso_code(&self) -> &'static str {
        match self {
            Self::Armenian => "hy",
            Self::English => "en",
            Self::Russian => "ru",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iso_code())
    }
}

const ARMENIAN_BLOCK: std::ops::RangeInclusive<char> = '\u{0530}'..='\u{058F}';
const CYRILLIC_BLOCK: std::ops::RangeInclusive<char> = '\u{0400}'..='\u{04FF}';

/// Latin letters, digits, whitespace and common punctuation only
static LATIN_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9\s.,!?;:()\-/\\]+$").expect("latin-only pattern is valid")
});

/// Keywords marking a Latin-script cell as English banking/invoice text
const ENGLISH_KEYWORDS: [&str; 10] = [
    "invoice",
    "date",
    "payment",
    "transfer",
    "account",
    "commission",
    "exchange",
    "card",
    "software",
    "development",
];

/// Detect the language of a cell text
///
/// Armenian wins over every other script present in the same text; Cyrillic
/// text is treated as already translated.
pub fn detect_language(text: &str) -> LanguageCode {
    if text.is_empty() {
        return LanguageCode::Unknown;
    }

    if text.chars().any(|c| ARMENIAN_BLOCK.contains(&c)) {
        return LanguageCode::Armenian;
    }

    if text.chars().any(|c| CYRILLIC_BLOCK.contains(&c)) {
        return LanguageCode::Russian;
    }

    if LATIN_ONLY.is_match(text) {
        let lower = text.to_lowercase();
        if ENGLISH_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
            return LanguageCode::English;
        }
    }

    LanguageCode::Unknown
}

/// Whether a cell text has to go through the translation pipeline
pub fn needs_translation(text: &str) -> bool {
    matches!(
        detect_language(text),
        LanguageCode::Armenian | LanguageCode::English
    )
}

/// Resolve an ISO 639-1 or ISO 639-3 code to a language
fn lookup_language(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = lookup_language(code).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(lang.to_name().to_string())
}
