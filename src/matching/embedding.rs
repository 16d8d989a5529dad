use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::config::EmbeddingConfig;

/// Adapter boundary for the remote embedding model. One batched call per
/// matching run; implementations must return one vector per input text, in
/// input order.
pub trait EmbeddingGateway: Debug {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider credentials missing (set EMBEDDING_API_KEY)")]
    MissingCredentials,
    #[error("embedding call failed: {0}")]
    Backend(String),
    #[error("embedding runtime unavailable: {0}")]
    Runtime(String),
    #[error("embedding response shape unexpected: {0}")]
    MalformedResponse(String),
}

/// Client for an OpenAI-compatible `/embeddings` endpoint, allowing the
/// synchronous matching workflow to call the async HTTP stack without
/// exposing async details.
pub struct OpenAiEmbeddingClient {
    http: reqwest::Client,
    runtime: Runtime,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddingClient {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(EmbeddingError::MissingCredentials)?;

        let runtime = Runtime::new().map_err(|err| EmbeddingError::Runtime(err.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            runtime,
            api_base: config.api_base.clone(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn map_error<E: std::fmt::Display>(err: E) -> EmbeddingError {
        EmbeddingError::Backend(err.to_string())
    }
}

impl Debug for OpenAiEmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingGateway for OpenAiEmbeddingClient {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.api_base);
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self.runtime.block_on(async {
            let http_response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(Self::map_error)?;

            let http_response = http_response.error_for_status().map_err(Self::map_error)?;
            http_response
                .json::<EmbeddingResponse>()
                .await
                .map_err(Self::map_error)
        })?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingError::MalformedResponse(format!(
                "expected {} vectors, received {}",
                texts.len(),
                response.data.len()
            )));
        }

        // Providers may return data out of order; the index field is
        // authoritative.
        let mut vectors: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        for datum in response.data {
            let slot = vectors.get_mut(datum.index).ok_or_else(|| {
                EmbeddingError::MalformedResponse(format!(
                    "vector index {} out of range",
                    datum.index
                ))
            })?;
            *slot = Some(datum.embedding);
        }

        vectors
            .into_iter()
            .enumerate()
            .map(|(position, vector)| {
                vector.ok_or_else(|| {
                    EmbeddingError::MalformedResponse(format!(
                        "missing vector for input {position}"
                    ))
                })
            })
            .collect()
    }
}
