use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single occupation from the ANZSCO reference catalog, ready for
/// similarity scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationEntry {
    pub code: String,
    pub name: String,
    pub list: String,
    pub visa_subclasses: Vec<String>,
    pub assessing_authority: String,
    pub embedding: Vec<f32>,
}

/// An occupation row as delivered by a bulk catalog source. The persisted
/// embedding arrives either as a raw numeric array or as an encoded string
/// that needs parsing on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationRecord {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub list: String,
    #[serde(default)]
    pub visa_subclasses: Vec<String>,
    #[serde(default)]
    pub assessing_authority: String,
    #[serde(default)]
    pub embedding: Option<StoredEmbedding>,
}

/// Persisted embedding representations tolerated by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEmbedding {
    Raw(Vec<f32>),
    Encoded(String),
}

impl StoredEmbedding {
    /// Decode into a numeric vector. Returns `None` for empty or
    /// unparseable values; the caller decides whether to skip the row.
    pub fn decode(&self) -> Option<Vec<f32>> {
        match self {
            StoredEmbedding::Raw(vector) => {
                if vector.is_empty() {
                    None
                } else {
                    Some(vector.clone())
                }
            }
            StoredEmbedding::Encoded(text) => decode_embedding_text(text),
        }
    }
}

fn decode_embedding_text(text: &str) -> Option<Vec<f32>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<f32>>(trimmed)
            .ok()
            .filter(|vector| !vector.is_empty());
    }

    let parsed: Result<Vec<f32>, _> = trimmed
        .split_whitespace()
        .map(|token| token.trim_matches(',').parse::<f32>())
        .collect();
    parsed.ok().filter(|vector| !vector.is_empty())
}

/// Immutable snapshot of the occupation catalog used by a matching run.
///
/// Entries keep their load order so similarity ties resolve the same way on
/// every run.
#[derive(Debug, Clone, Default)]
pub struct OccupationCatalog {
    entries: Vec<OccupationEntry>,
}

impl OccupationCatalog {
    /// Build a snapshot from bulk-read records. Rows without a decodable
    /// embedding are skipped and logged, never fatal.
    pub fn from_records(records: Vec<OccupationRecord>) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let Some(embedding) = record.embedding.as_ref().and_then(StoredEmbedding::decode)
            else {
                warn!(code = %record.code, name = %record.name, "skipping occupation without usable embedding");
                continue;
            };

            entries.push(OccupationEntry {
                code: record.code,
                name: record.name,
                list: record.list,
                visa_subclasses: record.visa_subclasses,
                assessing_authority: record.assessing_authority,
                embedding,
            });
        }

        Self { entries }
    }

    /// Build a snapshot from already-decoded entries.
    pub fn from_entries(entries: Vec<OccupationEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|entry| {
                if entry.embedding.is_empty() {
                    warn!(code = %entry.code, name = %entry.name, "skipping occupation without usable embedding");
                    false
                } else {
                    true
                }
            })
            .collect();
        Self { entries }
    }

    /// Read the reference catalog from CSV (the export produced by the
    /// occupation import tooling).
    pub fn load_csv<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;
            records.push(OccupationRecord {
                code: row.anzsco_code,
                name: row.occupation_name,
                list: row.list.unwrap_or_default(),
                visa_subclasses: split_subclasses(row.visa_subclasses.as_deref()),
                assessing_authority: row.assessing_authority.unwrap_or_default(),
                embedding: row.occupation_embedding.map(StoredEmbedding::Encoded),
            });
        }

        Ok(Self::from_records(records))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::load_csv(file)
    }

    pub fn entries(&self) -> &[OccupationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    anzsco_code: String,
    occupation_name: String,
    #[serde(default)]
    list: Option<String>,
    #[serde(default)]
    visa_subclasses: Option<String>,
    #[serde(default)]
    assessing_authority: Option<String>,
    #[serde(default)]
    occupation_embedding: Option<String>,
}

fn split_subclasses(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split([',', ';'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Error reading the occupation reference catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog row: {0}")]
    Csv(#[from] csv::Error),
}
