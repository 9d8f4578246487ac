//! Core library for bvs
//!
//! This crate implements the **Functional Core** of the bvs application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The bvs project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`bvs_core`** (this crate): Pure transformation functions with no network I/O
//! - **`bvs`**: HTTP, configuration and orchestration (the Imperative Shell)
//!
//! The shell fetches raw JSON from the BVS search API family (journals, events,
//! web resources, legislation, multimedia, bibliographic databases) and hands it
//! to this crate, which turns it into cards a renderer can draw.
//!
//! # Module Organization
//!
//! Leaves first:
//!
//! - [`multilingual`]: Display string extraction from `lang^text|lang^text` fields
//! - [`normalize`]: Reconciles the known response envelopes into one canonical result
//! - [`mapper`]: Generic document mapper driven by declarative field tables
//! - [`tables`]: Resource kinds, their field tables and code -> label tables
//! - [`card`]: Kind-agnostic resource cards and inline notices
//! - [`output`]: Search, card and facet payloads for the rendering layer
//! - [`dates`], [`country`], [`query`]: Formatting and query construction helpers
//! - [`error`]: Error taxonomy surfaced to the renderer as values
//! - [`cache`]: File-backed TTL cache entries
//!
//! # Example Usage
//!
//! ```rust
//! use bvs_core::mapper::map_documents;
//! use bvs_core::normalize::normalize;
//! use bvs_core::tables::ResourceKind;
//!
//! let raw = serde_json::json!({"diaServerResponse": [{"response": {
//!     "numFound": 2, "start": 0, "docs": [{"title": "A"}, {"title": "B"}]
//! }}]});
//!
//! let result = normalize(raw).into_canonical();
//! let docs = map_documents(&result.docs, &ResourceKind::Journal);
//!
//! assert_eq!(result.total, 2);
//! assert_eq!(docs[1].title(), Some("B"));
//! ```

pub mod cache;
pub mod card;
pub mod country;
pub mod dates;
pub mod error;
pub mod mapper;
pub mod multilingual;
pub mod normalize;
pub mod output;
pub mod query;
pub mod tables;
