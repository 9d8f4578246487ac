//! Resource cards and inline notices for the rendering layer
//!
//! Every kind is reduced to the same [`ResourceCardDto`] so the grid renderer
//! never needs to know which kind it is drawing.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

use crate::error::BvsError;
use crate::mapper::NormalizedDocument;

/// Longest summary shown on a card, in characters
pub const SUMMARY_MAX_CHARS: usize = 300;

/// How a kind's fields are placed on a card
#[derive(Debug, PartialEq, Eq)]
pub struct CardLayout {
    /// Field rendered as the leading paragraph
    pub summary: Option<&'static str>,
    /// `(label, field)` pairs rendered as labelled lines
    pub content: &'static [(&'static str, &'static str)],
    /// List fields whose formatted elements become tags
    pub tags: &'static [&'static str],
}

/// Kind-agnostic card handed to the grid renderer
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResourceCardDto {
    /// HTML
    pub title: String,
    /// HTML
    pub content: String,
    pub link: Option<String>,
    pub tags: Vec<String>,
}

/// Build the card for one document
pub fn to_card(doc: &NormalizedDocument, lang: &str) -> ResourceCardDto {
    let layout = &doc.table().card;
    let link = doc.url().map(str::to_string);

    let label = doc.title().or(doc.id()).unwrap_or_default();
    let title = match &link {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            encode_double_quoted_attribute(url),
            encode_text(label)
        ),
        None => encode_text(label).into_owned(),
    };

    let mut parts: Vec<String> = Vec::new();
    if let Some(summary) = layout.summary.and_then(|field| doc.formatted(field, lang)) {
        parts.push(format!("<p>{}</p>", encode_text(&truncate(&summary))));
    }

    let lines: Vec<String> = layout
        .content
        .iter()
        .filter_map(|(label, field)| {
            let value = doc.formatted(field, lang)?;
            Some(format!(
                "<strong>{}:</strong> {}",
                encode_text(label),
                encode_text(&value)
            ))
        })
        .collect();
    if !lines.is_empty() {
        parts.push(lines.join("<br>"));
    }

    let mut tags: Vec<String> = Vec::new();
    for tag in layout
        .tags
        .iter()
        .flat_map(|field| doc.formatted_list(field, lang))
    {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    ResourceCardDto {
        title,
        content: parts.join("\n"),
        link,
        tags,
    }
}

/// Cards for a whole result list
pub fn to_cards(docs: &[NormalizedDocument], lang: &str) -> Vec<ResourceCardDto> {
    docs.iter().map(|doc| to_card(doc, lang)).collect()
}

/// Inline marker shown in place of a grid when a render fails
///
/// Configuration errors link to the settings location when one is known.
pub fn error_notice(error: &BvsError, settings_url: Option<&str>) -> String {
    let message = encode_text(&error.to_string()).into_owned();
    let hint = match (error, settings_url) {
        (BvsError::Configuration { .. }, Some(url)) => format!(
            " <a href=\"{}\">Verifique as configurações</a>",
            encode_double_quoted_attribute(url)
        ),
        _ => String::new(),
    };

    format!(
        "<div class=\"bvs-error bvs-error--{}\">{message}{hint}</div>",
        error.kind()
    )
}

/// Marker for a search that returned no valid document
pub fn no_results_notice() -> String {
    "<div class=\"bvs-empty\">Nenhum resultado encontrado.</div>".to_string()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::map_document;
    use crate::tables::ResourceKind;
    use serde_json::json;

    #[test]
    fn test_to_card_journal() {
        let doc = map_document(
            &json!({
                "title": "Revista <Saúde>",
                "link": "https://example.org/j?a=1&b=2",
                "issn": "1234-5678",
                "country": "en^Brazil|pt-br^Brasil",
                "subject_area": ["en^Nursing|pt-br^Enfermagem", "Enfermagem"],
                "description": "Short mission."
            }),
            &ResourceKind::Journal,
        );

        let card = to_card(&doc, "pt-br");

        assert_eq!(
            card.title,
            "<a href=\"https://example.org/j?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener\">Revista &lt;Saúde&gt;</a>"
        );
        assert_eq!(card.link.as_deref(), Some("https://example.org/j?a=1&b=2"));
        assert_eq!(
            card.content,
            "<p>Short mission.</p>\n<strong>ISSN:</strong> 1234-5678<br><strong>País:</strong> Brasil"
        );
        assert_eq!(card.tags, vec!["Enfermagem"]);
    }

    #[test]
    fn test_to_card_without_link_uses_plain_title() {
        let doc = map_document(&json!({"id": "db-7"}), &ResourceKind::BibliographicDatabase);
        let card = to_card(&doc, "en");
        assert_eq!(card.title, "db-7");
        assert_eq!(card.link, None);
        assert_eq!(card.content, "");
        assert!(card.tags.is_empty());
    }

    #[test]
    fn test_to_card_legislation_labels() {
        let doc = map_document(
            &json!({"title": "Lei 8.080", "act_type": "lei", "issue_date": "19900919"}),
            &ResourceKind::Legislation,
        );
        let card = to_card(&doc, "pt");
        assert_eq!(
            card.content,
            "<strong>Tipo:</strong> Lei<br><strong>Data:</strong> 19/09/1990"
        );
    }

    #[test]
    fn test_summary_is_truncated() {
        let long = "a".repeat(SUMMARY_MAX_CHARS + 50);
        let doc = map_document(
            &json!({"title": "T", "description": long}),
            &ResourceKind::Generic("x".into()),
        );
        let card = to_card(&doc, "en");
        assert!(card.content.starts_with("<p>aaa"));
        assert!(card.content.ends_with("…</p>"));
    }

    #[test]
    fn test_error_notice_configuration_links_settings() {
        let err = BvsError::configuration("journals", "API key is not set");
        let html = error_notice(&err, Some("/wp-admin/options-general.php?page=bvs"));
        assert!(html.starts_with("<div class=\"bvs-error bvs-error--configuration\">"));
        assert!(html.contains("Configuration error for journals: API key is not set"));
        assert!(html.contains("href=\"/wp-admin/options-general.php?page=bvs\""));
    }

    #[test]
    fn test_error_notice_http_status_has_no_settings_link() {
        let err = BvsError::HttpStatus {
            code: 502,
            message: "<bad gateway>".into(),
        };
        let html = error_notice(&err, Some("/settings"));
        assert_eq!(
            html,
            "<div class=\"bvs-error bvs-error--http_status\">HTTP error [502]: &lt;bad gateway&gt;</div>"
        );
    }

    #[test]
    fn test_no_results_notice_is_distinct() {
        assert!(no_results_notice().contains("bvs-empty"));
        assert!(!no_results_notice().contains("bvs-error"));
    }
}
