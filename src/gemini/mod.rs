//! Gemini API integration: vision descriptions and batch embeddings.

mod client;
mod retry;

pub use client::GeminiClient;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned while talking to the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Gemini responded with an unexpected status code.
    #[error("Unexpected Gemini response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the API.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// The model returned no usable content for the request.
    #[error("Gemini returned an empty response")]
    EmptyResponse,
    /// The embedding endpoint returned a different number of vectors than
    /// inputs supplied.
    #[error("Gemini returned {actual} embeddings for {expected} inputs")]
    EmbeddingCountMismatch {
        /// Number of texts submitted in the batch.
        expected: usize,
        /// Number of embedding vectors received.
        actual: usize,
    },
}
