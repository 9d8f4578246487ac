//! Results handed to the rendering layer
//!
//! Pure projections of a [`CanonicalSearchResult`] into mapped documents,
//! cards and labelled facet histograms.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::card::{no_results_notice, to_cards, ResourceCardDto};
use crate::mapper::{map_documents, NormalizedDocument};
use crate::multilingual::extract_text;
use crate::normalize::{CanonicalSearchResult, FacetCount};
use crate::tables::ResourceKind;

/// Mapped result of one search render
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SearchOutput {
    pub kind: ResourceKind,
    pub total: u64,
    pub start: u64,
    /// Valid documents only
    pub documents: Vec<NormalizedDocument>,
    /// Upstream documents dropped for having neither title nor id
    #[serde(skip_serializing_if = "is_zero")]
    pub dropped: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, Vec<FacetCount>>,
}

impl SearchOutput {
    /// Output of a search that matched nothing upstream
    pub fn empty(kind: ResourceKind, start: u64) -> Self {
        Self {
            kind,
            total: 0,
            start,
            documents: Vec::new(),
            dropped: 0,
            facets: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Card grid payload
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CardsOutput {
    pub total: u64,
    pub start: u64,
    pub cards: Vec<ResourceCardDto>,
    /// Present when there is nothing to draw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Facet bucket with a display label extracted for the preferred language
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FacetLabel {
    pub value: String,
    pub label: String,
    pub count: u64,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Map a canonical result for one kind, dropping invalid documents
pub fn to_search_output(kind: &ResourceKind, result: CanonicalSearchResult) -> SearchOutput {
    let documents = map_documents(&result.docs, kind);
    let dropped = result.docs.len() - documents.len();

    SearchOutput {
        kind: kind.clone(),
        total: result.total,
        start: result.start,
        documents,
        dropped,
        facets: result.facets,
    }
}

pub fn to_cards_output(output: &SearchOutput, lang: &str) -> CardsOutput {
    CardsOutput {
        total: output.total,
        start: output.start,
        cards: to_cards(&output.documents, lang),
        notice: output.is_empty().then(no_results_notice),
    }
}

/// Attach multilingual labels to facet buckets
///
/// Buckets whose label comes out empty are dropped; order is kept.
pub fn label_facets(
    facets: &BTreeMap<String, Vec<FacetCount>>,
    lang: &str,
) -> BTreeMap<String, Vec<FacetLabel>> {
    facets
        .iter()
        .map(|(field, counts)| {
            let labels = counts
                .iter()
                .filter_map(|facet| {
                    let label = extract_text(&facet.value, lang);
                    (!label.is_empty()).then(|| FacetLabel {
                        value: facet.value.clone(),
                        label,
                        count: facet.count,
                    })
                })
                .collect();
            (field.clone(), labels)
        })
        .collect()
}
