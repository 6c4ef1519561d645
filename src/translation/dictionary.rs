/*!
 * Dictionary-based pre-translation.
 *
 * Known banking terms and invoice boilerplate are rewritten into Russian
 * without calling the remote provider. Lookups happen in two tiers:
 *
 * 1. an exact match against [`BANKING_TERMS`], which short-circuits;
 * 2. the ordered [`TRANSLATION_PATTERNS`], each applied to the output of the
 *    previous one.
 *
 * Both tables are built once and never mutated.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Whole-cell terms and their canonical Russian rendering
pub static BANKING_TERMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Փոխկպ. հաշվից վճ/Linked Acc. Paym", "Оплата со связанного счета"),
        ("Փոխկպ. հաշվից վճ", "Оплата со связанного счета"),
        ("Linked Acc. Paym", "Оплата со связанного счета"),
        (
            "Հաճախորդի սպասարկում  ռեզ.իրավ.անձ ,հաշվի.",
            "Обслуживание клиента рез. юр. лицо, счет",
        ),
        (
            "Հաճախորդի սպասարկում ռեզ.իրավ.անձ ,հաշվի.",
            "Обслуживание клиента рез. юр. лицо, счет",
        ),
        ("Գանձում փոխանցումից\\Commission", "Комиссия за перевод"),
        ("Գանձում փոխանցումից", "Комиссия за перевод"),
        ("Փոխանցում քարտին/Transfer To Card", "Перевод на карту"),
        ("Փոխանցում քարտին", "Перевод на карту"),
        ("Transfer To Card", "Перевод на карту"),
        ("Transfer to Account", "Перевод на счет"),
        ("Currency Exchange", "Обмен валюты"),
        ("Commission", "Комиссия"),
        ("US Dollar", "Доллар США"),
    ])
});

/// Ordered rewrite rules.
///
/// A bilingual rule must stay ahead of the Armenian-only rule for the same
/// phrase: once the Armenian half is rewritten the bilingual form can no
/// longer match. Armenian-only rules are case-sensitive.
pub static TRANSLATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let rules: [(&str, &str); 16] = [
        (
            r"(?i)Փոխկպ\.\s*հաշվից\s*վճ[/\\]?Linked\s*Acc\.\s*Paym",
            "Оплата со связанного счета",
        ),
        (r"Փոխկպ\.\s*հաշվից\s*վճ", "Оплата со связанного счета"),
        (
            r"Հաճախորդի\s*սպասարկում\s*ռեզ\.իրավ\.անձ\s*,հաշվի\.",
            "Обслуживание клиента рез. юр. лицо, счет",
        ),
        (r"(?i)Գանձում\s*փոխանցումից[/\\]?Commission", "Комиссия за перевод"),
        (r"Գանձում\s*փոխանցումից", "Комиссия за перевод"),
        (r"(?i)Փոխանցում\s*քարտին[/\\]?Transfer\s*To\s*Card", "Перевод на карту"),
        (r"Փոխանցում\s*քարտին", "Перевод на карту"),
        (r"(?i)INVOICE\s+NO\.", "СЧЕТ-ФАКТУРА №"),
        (r"(?i)INVOICE\s+DATE:", "ДАТА СЧЕТА:"),
        (r"(?i)INVOICE\s+", "СЧЕТ-ФАКТУРА "),
        (r"(?i)INV\.", "СФ."),
        // ASCII word boundary: a preceding Armenian letter does not block the match
        (r"(?i)(?-u:\b)DATE\s+", "ДАТА "),
        (r"(?i)SOFTWARE\s+DEVELOPMENT", "РАЗРАБОТКА ПРОГРАММНОГО ОБЕСПЕЧЕНИЯ"),
        (r"(?i)Transfer\s+To\s+Card", "Перевод на карту"),
        (r"(?i)Transfer\s+to\s+Account", "Перевод на счет"),
        (r"(?i)Currency\s+Exchange", "Обмен валюты"),
    ];

    rules
        .into_iter()
        .map(|(pattern, replacement)| {
            let regex = Regex::new(pattern).expect("dictionary pattern is valid");
            (regex, replacement)
        })
        .collect()
});

/// Translate a cell text using only the built-in dictionary.
///
/// Returns the input unchanged when neither a term nor a pattern applies.
pub fn apply_dictionary_translation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    if let Some(term) = BANKING_TERMS.get(text) {
        return (*term).to_string();
    }

    let mut result = text.to_string();
    for (pattern, replacement) in TRANSLATION_PATTERNS.iter() {
        if pattern.is_match(&result) {
            result = pattern.replace_all(&result, NoExpand(replacement)).into_owned();
        }
    }

    result
}

/// Whether the dictionary changed the text.
///
/// A rule that maps a text onto itself is reported as not resolved.
pub fn was_translated_by_dictionary(original: &str, translated: &str) -> bool {
    original != translated
}
