//! Response envelope normalization
//!
//! The search API has shipped several envelope formats for the same logical
//! query without any version flag. [`normalize`] recognises them in a fixed
//! priority order (first match wins, shapes are never merged) and produces one
//! [`CanonicalSearchResult`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One upstream record, passed unmodified to the document mapper
pub type RawDocument = Value;

/// A single bucket of a facet histogram
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Canonical `{ total, start, docs, facets }` view of any known envelope
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct CanonicalSearchResult {
    pub total: u64,
    pub start: u64,
    pub docs: Vec<RawDocument>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, Vec<FacetCount>>,
}

/// Which envelope was recognised
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeShape {
    /// `{"diaServerResponse": [{...}]}`
    DiaServerList,
    /// `{"diaServerResponse": {...}}`
    DiaServerObject,
    /// `{"response": {"docs": [...], "numFound": n}}`
    ResponseDocs,
    /// `{"docs": [...], "numFound": n}`
    Docs,
    /// `{"data": [...] | {...}, "total": n}`
    Data,
    /// `{"journals": ...}` or `{"resources": ...}`
    AlreadyCanonical,
    /// `[{"title": ...}, ...]`
    BareList,
    /// None of the above
    Unrecognized,
}

/// Result of [`normalize`]
///
/// The two pass-through shapes keep the raw value untouched; callers that need
/// documents from them go through [`Normalized::into_canonical`], which probes
/// the expected keys defensively.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Canonical(EnvelopeShape, CanonicalSearchResult),
    Passthrough(EnvelopeShape, Value),
}

impl Normalized {
    pub fn shape(&self) -> EnvelopeShape {
        match self {
            Normalized::Canonical(shape, _) | Normalized::Passthrough(shape, _) => *shape,
        }
    }

    /// Canonical view of any outcome
    ///
    /// Pass-through values are searched for a document list under `docs`,
    /// `journals`, `resources` or `data`, and for a count under `total` or
    /// `numFound`. Unknown shapes yield an empty result.
    pub fn into_canonical(self) -> CanonicalSearchResult {
        match self {
            Normalized::Canonical(_, result) => result,
            Normalized::Passthrough(_, raw) => canonical_from_passthrough(raw),
        }
    }
}

/// Normalize a parsed upstream response
pub fn normalize(mut raw: Value) -> Normalized {
    if let Some(obj) = raw.as_object_mut() {
        if let Some(dia) = present(obj, "diaServerResponse") {
            return match dia {
                Value::Array(mut items) if !items.is_empty() => Normalized::Canonical(
                    EnvelopeShape::DiaServerList,
                    from_dia_server(items.swap_remove(0)),
                ),
                single => Normalized::Canonical(
                    EnvelopeShape::DiaServerObject,
                    from_dia_server(single),
                ),
            };
        }

        let response_docs = obj
            .get("response")
            .and_then(|r| r.get("docs"))
            .is_some_and(|d| !d.is_null());
        if response_docs {
            let facets = present(obj, "facet_counts").map(parse_facets);
            let mut response = present(obj, "response").unwrap_or(Value::Null);
            let result = from_solr_object(&mut response, facets.unwrap_or_default());
            return Normalized::Canonical(EnvelopeShape::ResponseDocs, result);
        }

        if obj.get("docs").is_some_and(|d| !d.is_null()) {
            let facets = present(obj, "facet_counts").map(parse_facets);
            let result = from_solr_object(&mut raw, facets.unwrap_or_default());
            return Normalized::Canonical(EnvelopeShape::Docs, result);
        }

        if let Some(data) = present(obj, "data") {
            let docs = match data {
                Value::Array(items) => items,
                single => vec![single],
            };
            let total = obj.get("total").and_then(as_count);
            let start = obj.get("start").and_then(as_count).unwrap_or(0);
            return Normalized::Canonical(
                EnvelopeShape::Data,
                canonical(total, start, docs, BTreeMap::new()),
            );
        }

        if obj.contains_key("journals") || obj.contains_key("resources") {
            return Normalized::Passthrough(EnvelopeShape::AlreadyCanonical, raw);
        }
    }

    match raw {
        Value::Array(docs) if docs.first().is_some_and(|first| first.get("title").is_some()) => {
            let total = docs.len() as u64;
            Normalized::Canonical(
                EnvelopeShape::BareList,
                canonical(Some(total), 0, docs, BTreeMap::new()),
            )
        }
        other => Normalized::Passthrough(EnvelopeShape::Unrecognized, other),
    }
}

/// Parse Solr `facet_counts` into ordered `(value, count)` buckets
///
/// Accepts both the `{"facet_fields": {...}}` wrapper and a bare field map, and
/// both the flat `["a", 3, "b", 1]` and the paired `[["a", 3], ["b", 1]]`
/// bucket encodings.
pub fn parse_facets(facet_counts: Value) -> BTreeMap<String, Vec<FacetCount>> {
    let fields = match facet_counts {
        Value::Object(mut obj) => match obj.remove("facet_fields") {
            Some(Value::Object(fields)) => fields,
            _ => obj,
        },
        _ => return BTreeMap::new(),
    };

    fields
        .into_iter()
        .filter_map(|(name, buckets)| match buckets {
            Value::Array(items) => Some((name, parse_buckets(&items))),
            _ => None,
        })
        .collect()
}

fn parse_buckets(items: &[Value]) -> Vec<FacetCount> {
    let paired = items.iter().all(Value::is_array);
    if paired {
        return items
            .iter()
            .filter_map(|pair| {
                let pair = pair.as_array()?;
                bucket(pair.first()?, pair.get(1)?)
            })
            .collect();
    }

    items
        .chunks(2)
        .filter_map(|chunk| match chunk {
            [value, count] => bucket(value, count),
            _ => None,
        })
        .collect()
}

fn bucket(value: &Value, count: &Value) -> Option<FacetCount> {
    let value = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(FacetCount {
        value,
        count: as_count(count)?,
    })
}

fn from_dia_server(mut envelope: Value) -> CanonicalSearchResult {
    let facets = envelope
        .get_mut("facet_counts")
        .map(Value::take)
        .map(parse_facets)
        .unwrap_or_default();
    let mut response = envelope
        .get_mut("response")
        .map(Value::take)
        .unwrap_or(Value::Null);

    let total = response.get("numFound").and_then(as_count).unwrap_or(0);
    let start = response.get("start").and_then(as_count).unwrap_or(0);
    let docs = response
        .get_mut("docs")
        .map(Value::take)
        .map(into_docs)
        .unwrap_or_default();

    canonical(Some(total), start, docs, facets)
}

fn from_solr_object(
    object: &mut Value,
    facets: BTreeMap<String, Vec<FacetCount>>,
) -> CanonicalSearchResult {
    let total = object.get("numFound").and_then(as_count);
    let start = object.get("start").and_then(as_count).unwrap_or(0);
    let docs = object
        .get_mut("docs")
        .map(Value::take)
        .map(into_docs)
        .unwrap_or_default();

    canonical(total, start, docs, facets)
}

fn canonical_from_passthrough(mut raw: Value) -> CanonicalSearchResult {
    let Some(obj) = raw.as_object_mut() else {
        return CanonicalSearchResult::default();
    };

    let docs = ["docs", "journals", "resources", "data"]
        .iter()
        .find_map(|key| present(obj, key))
        .map(into_docs)
        .unwrap_or_default();
    let total = obj
        .get("total")
        .or_else(|| obj.get("numFound"))
        .and_then(as_count);
    let start = obj.get("start").and_then(as_count).unwrap_or(0);

    canonical(total, start, docs, BTreeMap::new())
}

/// Assemble a result, keeping `docs.len() <= total`
fn canonical(
    total: Option<u64>,
    start: u64,
    docs: Vec<RawDocument>,
    facets: BTreeMap<String, Vec<FacetCount>>,
) -> CanonicalSearchResult {
    let listed = docs.len() as u64;
    CanonicalSearchResult {
        total: total.unwrap_or(listed).max(listed),
        start,
        docs,
        facets,
    }
}

fn into_docs(value: Value) -> Vec<RawDocument> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

/// Remove `key` from `obj` when it holds a non-null value
fn present(obj: &mut Map<String, Value>, key: &str) -> Option<Value> {
    match obj.get(key) {
        Some(v) if !v.is_null() => obj.remove(key),
        _ => None,
    }
}

/// Counts arrive as numbers or numeric strings depending on the deployment
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
