//! Utterance normalization shared by the intent rules

use unicode_segmentation::UnicodeSegmentation;

/// Normalize an utterance for phrase matching.
///
/// Lowercases, folds typographic apostrophes to `'`, keeps only unicode words
/// and joins them with single spaces. The result is padded with one space on
/// each side so that `contains_phrase` can match on word boundaries.
pub fn normalize_utterance(text: &str) -> String {
    let folded = text.to_lowercase().replace(['\u{2019}', '\u{2018}', '`'], "'");

    let words: Vec<&str> = folded.unicode_words().collect();
    if words.is_empty() {
        return String::new();
    }

    let mut normalized = String::with_capacity(folded.len() + 2);
    normalized.push(' ');
    normalized.push_str(&words.join(" "));
    normalized.push(' ');
    normalized
}

/// Whether `phrase` occurs as whole words in an already normalized utterance
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    if normalized.is_empty() || phrase.is_empty() {
        return false;
    }
    normalized.contains(&format!(" {} ", phrase))
}
