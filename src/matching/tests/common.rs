use std::collections::HashMap;

use crate::matching::catalog::{OccupationCatalog, OccupationEntry};
use crate::matching::embedding::{EmbeddingError, EmbeddingGateway};
use crate::matching::matcher::{OccupationMatcher, SuggestedOccupation};

/// Gateway returning canned vectors per input text.
#[derive(Debug, Default)]
pub(super) struct StaticEmbeddingGateway {
    vectors: HashMap<String, Vec<f32>>,
}

impl StaticEmbeddingGateway {
    pub(super) fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }
}

impl EmbeddingGateway for StaticEmbeddingGateway {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0, 0.0, 0.0])
            })
            .collect())
    }
}

/// Gateway simulating a provider outage.
#[derive(Debug)]
pub(super) struct FailingGateway;

impl EmbeddingGateway for FailingGateway {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Backend("provider offline".to_string()))
    }
}

/// Gateway returning fewer vectors than inputs.
#[derive(Debug)]
pub(super) struct TruncatingGateway;

impl EmbeddingGateway for TruncatingGateway {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(vec![vec![1.0, 0.0, 0.0]])
    }
}

pub(super) fn entry(code: &str, name: &str, embedding: Vec<f32>) -> OccupationEntry {
    OccupationEntry {
        code: code.to_string(),
        name: name.to_string(),
        list: "MLTSSL".to_string(),
        visa_subclasses: vec!["189".to_string(), "190".to_string()],
        assessing_authority: "ACS".to_string(),
        embedding,
    }
}

pub(super) fn software_catalog() -> OccupationCatalog {
    OccupationCatalog::from_entries(vec![
        entry("261313", "Software Engineer", vec![1.0, 0.0, 0.0]),
        entry("261312", "Developer Programmer", vec![0.0, 1.0, 0.0]),
        entry("263111", "Network Administrator", vec![0.0, 0.0, 1.0]),
    ])
}

pub(super) fn matcher(gateway: impl EmbeddingGateway + 'static) -> OccupationMatcher {
    OccupationMatcher::new(Box::new(gateway))
}

pub(super) fn suggest(titles: &[&str]) -> Vec<SuggestedOccupation> {
    titles
        .iter()
        .map(|title| SuggestedOccupation(title.to_string()))
        .collect()
}
