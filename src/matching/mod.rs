//! Occupation matching against the ANZSCO reference catalog.
//!
//! Suggested job titles are embedded in one batched provider call, scored
//! against the catalog snapshot with cosine similarity, deduplicated, and
//! ranked. Failures degrade to an empty result so a partial match set is
//! never shown to a reviewer.

pub mod catalog;
pub mod embedding;
pub mod matcher;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogError, OccupationCatalog, OccupationEntry, OccupationRecord, StoredEmbedding,
};
pub use embedding::{EmbeddingError, EmbeddingGateway, OpenAiEmbeddingClient};
pub use matcher::{OccupationMatch, OccupationMatcher, SuggestedOccupation, MAX_MATCHES};
