use tracing::debug;

use crate::model::Language;

const ROMANIZED_HINDI: &[&str] = &["kachra", "kuda", "paani", "gadda", "naali"];
const ROMANIZED_TAMIL: &[&str] = &["kuppai", "thanni", "saalai", "vilakku"];

fn is_devanagari(c: char) -> bool {
    matches!(c, '\u{0900}'..='\u{097F}')
}

fn is_tamil(c: char) -> bool {
    matches!(c, '\u{0B80}'..='\u{0BFF}')
}

/// Detect the language of a complaint.
///
/// Native script wins over romanized tokens, and the first Indic character in
/// the text decides between Hindi and Tamil. Never fails: text without any
/// recognizable signal is `Unknown`.
pub fn detect_language(text: &str) -> Language {
    let lang = detect(text);
    debug!(language = %lang, "language detected");
    lang
}

fn detect(text: &str) -> Language {
    for c in text.chars() {
        if is_devanagari(c) {
            return Language::Hindi;
        }
        if is_tamil(c) {
            return Language::Tamil;
        }
    }

    let lower = text.to_lowercase();
    if ROMANIZED_HINDI.iter().any(|token| lower.contains(token)) {
        return Language::Hindi;
    }
    if ROMANIZED_TAMIL.iter().any(|token| lower.contains(token)) {
        return Language::Tamil;
    }
    if lower.chars().any(|c| c.is_ascii_lowercase()) {
        return Language::English;
    }

    Language::Unknown
}
