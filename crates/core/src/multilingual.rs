//! Multilingual field extraction
//!
//! Upstream records pack several language variants of one value into a single
//! string. Two encodings are observed in the wild:
//!
//! - **Pipe-delimited**: `"en^Brazil|pt-br^Brasil|es^Brasil"`, one `lang^text`
//!   segment per language.
//! - **Caret-only**: `"Brasil^iBR^pt^Brazil^iGB^en"`, values interleaved with
//!   language codes and `iXX` country codes that carry no display text.
//!
//! [`extract`] picks the mode from the input and always returns a string; it
//! never fails.

use serde_json::Value;
use std::sync::LazyLock;

use regex::Regex;

/// Language used when the caller has no preference
pub const DEFAULT_LANGUAGE: &str = "en";

/// Two-letter language codes that appear as noise tokens in caret-only values
pub const LANGUAGE_CODES: [&str; 10] = ["pt", "en", "es", "fr", "de", "it", "ru", "zh", "ja", "ar"];

static COUNTRY_CODE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^i[A-Z]{2}$").expect("country code pattern is valid"));

/// How a raw string is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// No delimiters, the string is returned as-is
    Plain,
    /// `lang^text|lang^text`
    PipeDelimited,
    /// `text^code^text^code` without any pipe
    CaretOnly,
}

impl ExtractionMode {
    /// Select the mode for a string. Any `|` wins over `^`.
    pub fn detect(text: &str) -> Self {
        if text.contains('|') {
            ExtractionMode::PipeDelimited
        } else if text.contains('^') {
            ExtractionMode::CaretOnly
        } else {
            ExtractionMode::Plain
        }
    }
}

/// Render a JSON scalar as text. Objects and null yield an empty string.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Reduce a raw field to one string: arrays contribute their first element
pub fn first_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.first().map(scalar_text).unwrap_or_default(),
        other => scalar_text(other),
    }
}

/// Whether `token` is one of the known two-letter language codes (case-insensitive)
pub fn is_language_code(token: &str) -> bool {
    LANGUAGE_CODES
        .iter()
        .any(|code| code.eq_ignore_ascii_case(token))
}

/// Extract the display string of a raw field for `preferred_lang`
///
/// # Arguments
/// * `value` - A string, an array (first element is used) or null
/// * `preferred_lang` - Language tag such as `"en"` or `"pt-br"`
pub fn extract(value: &Value, preferred_lang: &str) -> String {
    extract_text(&first_text(value), preferred_lang)
}

/// Same as [`extract`] for an already reduced string
pub fn extract_text(text: &str, preferred_lang: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match ExtractionMode::detect(trimmed) {
        ExtractionMode::Plain => trimmed.to_string(),
        ExtractionMode::PipeDelimited => extract_pipe_delimited(trimmed, preferred_lang),
        ExtractionMode::CaretOnly => extract_caret_only(trimmed),
    }
}

/// Extract every element of a list field, dropping the ones that come out empty
pub fn extract_all(value: &Value, preferred_lang: &str) -> Vec<String> {
    let texts: Vec<String> = match value {
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        other => vec![scalar_text(other)],
    };

    texts
        .iter()
        .map(|text| extract_text(text, preferred_lang))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Pipe-delimited mode
///
/// Returns the segment tagged with `preferred_lang`; otherwise the text of the
/// first segment (everything after its first `^`, or the whole segment when it
/// has no tag).
pub fn extract_pipe_delimited(text: &str, preferred_lang: &str) -> String {
    let prefix = format!("{}^", preferred_lang.trim());

    for segment in text.split('|') {
        if let Some(rest) = segment.trim().strip_prefix(&prefix) {
            return rest.trim().to_string();
        }
    }

    let first = text.split('|').next().unwrap_or_default().trim();
    match first.split_once('^') {
        Some((_, rest)) => rest.trim().to_string(),
        None => first.to_string(),
    }
}

/// Caret-only mode
///
/// Drops empty tokens, `iXX` country codes and language codes, then keeps the
/// longest remaining token. Equal lengths keep the earliest token. When nothing
/// survives, the first token longer than two characters that is not a language
/// code is used, and failing that the trimmed input.
pub fn extract_caret_only(text: &str) -> String {
    let tokens: Vec<&str> = text.split('^').map(str::trim).collect();

    let mut best: Option<&str> = None;
    for token in tokens.iter().copied().filter(|t| is_display_token(t)) {
        let longer = best.map_or(true, |b| token.chars().count() > b.chars().count());
        if longer {
            best = Some(token);
        }
    }

    best.or_else(|| {
        tokens
            .iter()
            .copied()
            .find(|t| t.chars().count() > 2 && !is_language_code(t))
    })
    .map(str::to_string)
    .unwrap_or_else(|| text.trim().to_string())
}

fn is_display_token(token: &str) -> bool {
    !token.is_empty() && !COUNTRY_CODE_TOKEN.is_match(token) && !is_language_code(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BRAZIL: &str = "en^Brazil|pt-br^Brasil|es^Brasil|fr^Brézil";

    #[test]
    fn test_extract_pipe_preferred_language() {
        assert_eq!(extract(&json!([BRAZIL]), "pt-br"), "Brasil");
        assert_eq!(extract(&json!([BRAZIL]), "en"), "Brazil");
        assert_eq!(extract(&json!(BRAZIL), "fr"), "Brézil");
    }

    #[test]
    fn test_extract_pipe_unmatched_language_uses_first_segment() {
        assert_eq!(extract(&json!([BRAZIL]), "de"), "Brazil");
    }

    #[test]
    fn test_extract_pipe_prefix_must_include_caret() {
        // "pt" must not match the "pt-br^" segment
        assert_eq!(extract_text("en^Brazil|pt-br^Brasil", "pt"), "Brazil");
    }

    #[test]
    fn test_extract_pipe_first_segment_without_tag() {
        assert_eq!(extract_text("Saúde pública|en^Public health", "es"), "Saúde pública");
    }

    #[test]
    fn test_extract_pipe_trims_segments() {
        assert_eq!(extract_text(" en^ Brazil | pt-br^ Brasil ", "pt-br"), "Brasil");
    }

    #[test]
    fn test_extract_caret_tie_keeps_first_occurrence() {
        // "Brasil" and "Brazil" are both six characters long
        assert_eq!(extract(&json!("Brasil^iBR^pt^Brazil^iGB^en"), "en"), "Brasil");
    }

    #[test]
    fn test_extract_caret_longest_token_wins() {
        assert_eq!(
            extract_text("Chile^iCL^es^Republic of Chile^en", "en"),
            "Republic of Chile"
        );
    }

    #[test]
    fn test_extract_caret_language_codes_case_insensitive() {
        assert_eq!(extract_text("EN^Peru^PT", "en"), "Peru");
    }

    #[test]
    fn test_extract_caret_fallback_when_only_codes() {
        // Only noise tokens: first token longer than two characters
        assert_eq!(extract_text("iBR^pt^en", "en"), "iBR");
        // Nothing longer than two characters: the trimmed input
        assert_eq!(extract_text(" pt^en ", "en"), "pt^en");
    }

    #[test]
    fn test_extract_empty_inputs() {
        assert_eq!(extract(&Value::Null, "en"), "");
        assert_eq!(extract(&json!([]), "en"), "");
        assert_eq!(extract(&json!(""), "en"), "");
        assert_eq!(extract(&json!({"nested": true}), "en"), "");
    }

    #[test]
    fn test_extract_plain_text() {
        assert_eq!(extract(&json!("PlainText"), "en"), "PlainText");
        assert_eq!(extract(&json!(["  Padded  "]), "en"), "Padded");
        assert_eq!(extract(&json!(2024), "en"), "2024");
    }

    #[test]
    fn test_detect_mode() {
        assert_eq!(ExtractionMode::detect("abc"), ExtractionMode::Plain);
        assert_eq!(ExtractionMode::detect("a^b"), ExtractionMode::CaretOnly);
        assert_eq!(ExtractionMode::detect("en^a|pt^b"), ExtractionMode::PipeDelimited);
        assert_eq!(ExtractionMode::detect("a|b"), ExtractionMode::PipeDelimited);
    }

    #[test]
    fn test_extract_all_list_field() {
        let value = json!(["en^English|pt^Inglês", "en^Spanish|pt^Espanhol", ""]);
        assert_eq!(extract_all(&value, "pt"), vec!["Inglês", "Espanhol"]);
        assert_eq!(extract_all(&json!("Plain"), "pt"), vec!["Plain"]);
        assert!(extract_all(&Value::Null, "pt").is_empty());
    }
}
