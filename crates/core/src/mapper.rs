//! Generic document mapper
//!
//! Every resource kind is described by a declarative [`FieldTable`]; one engine
//! projects raw upstream records through it. Raw values are stored as found and
//! the multilingual/date/code formatting runs on demand in the accessors.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::card::CardLayout;
use crate::dates::format_date;
use crate::multilingual::{extract_text, first_text, scalar_text};
use crate::normalize::RawDocument;
use crate::tables::ResourceKind;

/// Whether a field holds one value or a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// First element of an array, or the value itself
    Scalar,
    /// Bare strings wrapped in a one-element list, arrays passed through
    List,
}

/// Formatting applied by the on-demand accessors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Multilingual,
    Date,
    Codes(&'static CodeTable),
}

/// Static code -> label table for enumerated fields
#[derive(Debug, PartialEq, Eq)]
pub struct CodeTable {
    pub name: &'static str,
    pub labels: &'static [(&'static str, &'static str)],
}

impl CodeTable {
    /// Label for a code; unmapped codes come back with their first letter upper-cased
    pub fn label(&self, code: &str) -> String {
        let code = code.trim();
        let wanted = code.to_lowercase();
        self.labels
            .iter()
            .find(|(known, _)| *known == wanted)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| ucfirst(code))
    }
}

/// Extraction rule for one target field
#[derive(Debug, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    /// Source keys probed in order, first non-empty wins
    pub sources: &'static [&'static str],
    pub shape: Shape,
    pub format: Format,
}

impl FieldRule {
    pub const fn scalar(name: &'static str, sources: &'static [&'static str]) -> Self {
        Self {
            name,
            sources,
            shape: Shape::Scalar,
            format: Format::Text,
        }
    }

    pub const fn list(name: &'static str, sources: &'static [&'static str]) -> Self {
        Self {
            name,
            sources,
            shape: Shape::List,
            format: Format::Text,
        }
    }

    pub const fn multilingual(self) -> Self {
        Self {
            format: Format::Multilingual,
            ..self
        }
    }

    pub const fn date(self) -> Self {
        Self {
            format: Format::Date,
            ..self
        }
    }

    pub const fn codes(self, table: &'static CodeTable) -> Self {
        Self {
            format: Format::Codes(table),
            ..self
        }
    }

    /// Apply this rule's format to one raw value
    pub fn format_value(&self, raw: &str, lang: &str) -> String {
        match self.format {
            Format::Text => raw.trim().to_string(),
            Format::Multilingual => extract_text(raw, lang),
            Format::Date => format_date(raw),
            Format::Codes(table) => {
                let code = extract_text(raw, lang);
                if code.is_empty() {
                    code
                } else {
                    table.label(&code)
                }
            }
        }
    }
}

/// Declarative description of one resource kind
#[derive(Debug, PartialEq, Eq)]
pub struct FieldTable {
    pub fields: &'static [FieldRule],
    pub card: CardLayout,
}

impl FieldTable {
    pub fn rule(&self, name: &str) -> Option<&'static FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }
}

/// Stored value of a mapped field
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(Option<String>),
    List(Vec<String>),
}

/// Typed projection of one upstream record
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub kind: ResourceKind,
    pub fields: BTreeMap<&'static str, FieldValue>,
}

impl NormalizedDocument {
    pub fn table(&self) -> &'static FieldTable {
        self.kind.field_table()
    }

    /// Raw scalar value, `None` when missing or empty
    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Scalar(Some(value))) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Raw list value, empty when missing
    pub fn list(&self, name: &str) -> &[String] {
        match self.fields.get(name) {
            Some(FieldValue::List(values)) => values,
            _ => &[],
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.scalar("id")
    }

    pub fn title(&self) -> Option<&str> {
        self.scalar("title")
    }

    pub fn url(&self) -> Option<&str> {
        self.scalar("url")
    }

    pub fn description(&self) -> Option<&str> {
        self.scalar("description")
    }

    /// A document is renderable when it has a title or an id
    pub fn is_valid(&self) -> bool {
        self.title().is_some() || self.id().is_some()
    }

    /// Formatted scalar field (multilingual, date or code label as declared)
    ///
    /// List fields yield their formatted elements joined with `", "`.
    pub fn formatted(&self, name: &str, lang: &str) -> Option<String> {
        let rule = self.table().rule(name)?;
        let text = match rule.shape {
            Shape::Scalar => rule.format_value(self.scalar(name)?, lang),
            Shape::List => self.formatted_list(name, lang).join(", "),
        };
        (!text.is_empty()).then_some(text)
    }

    /// Formatted list field, empty elements dropped
    pub fn formatted_list(&self, name: &str, lang: &str) -> Vec<String> {
        let Some(rule) = self.table().rule(name) else {
            return Vec::new();
        };
        let raw: Vec<&str> = match self.fields.get(name) {
            Some(FieldValue::List(values)) => values.iter().map(String::as_str).collect(),
            Some(FieldValue::Scalar(Some(value))) => vec![value.as_str()],
            _ => Vec::new(),
        };
        raw.into_iter()
            .map(|value| rule.format_value(value, lang))
            .filter(|value| !value.is_empty())
            .collect()
    }

    pub fn formatted_country(&self, lang: &str) -> Option<String> {
        self.formatted("country", lang)
    }

    /// Every non-empty field, formatted, in table order
    pub fn display_fields(&self, lang: &str) -> Vec<(&'static str, String)> {
        self.table()
            .fields
            .iter()
            .filter_map(|rule| Some((rule.name, self.formatted(rule.name, lang)?)))
            .collect()
    }
}

/// Project one raw record through a field table
pub fn map_document(doc: &RawDocument, kind: &ResourceKind) -> NormalizedDocument {
    let table = kind.field_table();
    let fields = table
        .fields
        .iter()
        .map(|rule| {
            let value = match rule.shape {
                Shape::Scalar => FieldValue::Scalar(probe_scalar(doc, rule.sources)),
                Shape::List => FieldValue::List(probe_list(doc, rule.sources)),
            };
            (rule.name, value)
        })
        .collect();

    NormalizedDocument {
        kind: kind.clone(),
        fields,
    }
}

/// Map a result list, dropping documents that have neither title nor id
pub fn map_documents(docs: &[RawDocument], kind: &ResourceKind) -> Vec<NormalizedDocument> {
    docs.iter()
        .map(|doc| map_document(doc, kind))
        .filter(NormalizedDocument::is_valid)
        .collect()
}

fn probe_scalar(doc: &Value, sources: &[&str]) -> Option<String> {
    sources.iter().find_map(|key| {
        let text = first_text(doc.get(*key)?);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

fn probe_list(doc: &Value, sources: &[&str]) -> Vec<String> {
    sources
        .iter()
        .filter_map(|key| doc.get(*key))
        .map(to_list)
        .find(|values| !values.is_empty())
        .unwrap_or_default()
}

fn to_list(value: &Value) -> Vec<String> {
    let values = match value {
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        other => vec![scalar_text(other)],
    };
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Upper-case the first character, leave the rest untouched
pub fn ucfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
