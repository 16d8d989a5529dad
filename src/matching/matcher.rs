use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::catalog::{OccupationCatalog, OccupationEntry};
use super::embedding::EmbeddingGateway;

/// Upper bound on the ranked match list returned to reviewers.
pub const MAX_MATCHES: usize = 5;

/// A free-text job title produced by the CV analysis step. Not guaranteed
/// to exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedOccupation(pub String);

/// A catalog occupation paired with the confidence that it corresponds to
/// the suggested title. Derived per run, never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationMatch {
    pub code: String,
    pub name: String,
    pub list: String,
    pub visa_subclasses: Vec<String>,
    pub assessing_authority: String,
    /// Percentage in [0, 100], rounded to one decimal place.
    pub confidence: f32,
    pub suggested: String,
}

/// Maps suggested occupation names onto catalog entries by embedding
/// similarity. The catalog is small enough that an exact full scan per
/// query beats maintaining an index.
pub struct OccupationMatcher {
    gateway: Box<dyn EmbeddingGateway>,
}

impl OccupationMatcher {
    pub fn new(gateway: Box<dyn EmbeddingGateway>) -> Self {
        Self { gateway }
    }

    /// Rank catalog occupations against the suggested titles.
    ///
    /// Returns at most [`MAX_MATCHES`] entries, descending confidence,
    /// deduplicated by occupation name. An empty input or a failed
    /// embedding call yields an empty result; the failure cause is logged
    /// so operators can tell it apart from "no matches found".
    pub fn match_occupations(
        &self,
        suggested: &[SuggestedOccupation],
        catalog: &OccupationCatalog,
    ) -> Vec<OccupationMatch> {
        if suggested.is_empty() || catalog.is_empty() {
            return Vec::new();
        }

        let texts: Vec<String> = suggested.iter().map(|title| title.0.clone()).collect();
        let vectors = match self.gateway.embed(&texts) {
            Ok(vectors) => vectors,
            Err(err) => {
                warn!(error = %err, "embedding call failed; returning no matches");
                return Vec::new();
            }
        };

        if vectors.len() != texts.len() {
            warn!(
                expected = texts.len(),
                received = vectors.len(),
                "embedding batch size mismatch; returning no matches"
            );
            return Vec::new();
        }

        let mut best_by_name: BTreeMap<String, OccupationMatch> = BTreeMap::new();
        for (title, vector) in texts.iter().zip(vectors.iter()) {
            let Some((entry, similarity)) = best_entry(vector, catalog.entries()) else {
                continue;
            };

            let confidence = round_to_tenth(similarity * 100.0);
            debug!(suggested = %title, matched = %entry.name, confidence, "best catalog match");

            let candidate = OccupationMatch {
                code: entry.code.clone(),
                name: entry.name.clone(),
                list: entry.list.clone(),
                visa_subclasses: entry.visa_subclasses.clone(),
                assessing_authority: entry.assessing_authority.clone(),
                confidence,
                suggested: title.clone(),
            };

            match best_by_name.get(&candidate.name) {
                Some(existing) if existing.confidence >= candidate.confidence => {}
                _ => {
                    best_by_name.insert(candidate.name.clone(), candidate);
                }
            }
        }

        let mut matches: Vec<OccupationMatch> = best_by_name.into_values().collect();
        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        matches.truncate(MAX_MATCHES);
        matches
    }
}

/// Highest-similarity catalog entry for a query vector. Ties keep the
/// first entry in catalog order so repeated runs rank identically.
fn best_entry<'a>(query: &[f32], entries: &'a [OccupationEntry]) -> Option<(&'a OccupationEntry, f32)> {
    let mut best: Option<(&OccupationEntry, f32)> = None;
    for entry in entries {
        let similarity = cosine_similarity(query, &entry.embedding);
        match best {
            Some((_, current)) if similarity <= current => {}
            _ => best = Some((entry, similarity)),
        }
    }
    best
}

/// Cosine similarity with explicit zero-norm and length guards: an
/// all-zero or mismatched vector scores 0.0 instead of propagating NaN.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
