//! Runtime configuration for the ingestion pipeline.
//!
//! Everything is read from the environment (with `.env` support via `dotenvy`)
//! into an explicit [`Config`] value that is passed into each stage
//! constructor. Only `GOOGLE_API_KEY` is mandatory; every other knob has a
//! default matching the shipped Oxford Handbook corpus build.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration shared by the pipeline stages.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key used for vision descriptions and embeddings.
    pub google_api_key: String,
    /// Base URL for the Gemini API (override point for tests).
    pub gemini_base_url: String,
    /// Vision model used to describe extracted images.
    pub vision_model: String,
    /// Embedding model identifier passed to the batch embed endpoint.
    pub embedding_model: String,
    /// Dimensionality of the produced vectors.
    pub embedding_dimension: usize,
    /// Base URL of the Qdrant instance that stores the corpus.
    pub qdrant_url: String,
    /// Optional API key required to access Qdrant.
    pub qdrant_api_key: Option<String>,
    /// Name of the Qdrant collection holding the corpus.
    pub collection_name: String,
    /// Path to the source PDF.
    pub pdf_path: PathBuf,
    /// Directory where extracted images are written.
    pub image_output_dir: PathBuf,
    /// Human-readable source label stored with every card.
    pub source_label: String,
    /// Chunk budget in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters.
    pub chunk_overlap: usize,
    /// Number of cards embedded and upserted per batch.
    pub batch_size: usize,
    /// Pause after each successful image description.
    pub image_pause: Duration,
    /// Pause between consecutive storage batches.
    pub batch_pause: Duration,
    /// Maximum attempts per Gemini HTTP call (retries on 429/5xx).
    pub gemini_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables, performing validation
    /// along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            google_api_key: load_env("GOOGLE_API_KEY")?,
            gemini_base_url: load_env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            vision_model: load_env_or("VISION_MODEL", "gemini-1.5-pro-latest"),
            embedding_model: load_env_or("EMBEDDING_MODEL", "text-embedding-004"),
            embedding_dimension: parse_env_or("EMBEDDING_DIMENSION", 768)?,
            qdrant_url: load_env_or("QDRANT_URL", "http://127.0.0.1:6333"),
            qdrant_api_key: load_env_optional("QDRANT_API_KEY"),
            collection_name: load_env_or("QDRANT_COLLECTION_NAME", "oxford_multimodal"),
            pdf_path: PathBuf::from(load_env_or("PDF_FILE_PATH", "assets/oxford.pdf")),
            image_output_dir: PathBuf::from(load_env_or("IMAGE_OUTPUT_DIR", "images")),
            source_label: load_env_or("SOURCE_LABEL", "Oxford Handbook"),
            chunk_size: parse_env_or("CHUNK_SIZE", 1000)?,
            chunk_overlap: parse_env_or("CHUNK_OVERLAP", 200)?,
            batch_size: parse_env_or("BATCH_SIZE", 100)?,
            image_pause: Duration::from_millis(parse_env_or("IMAGE_PAUSE_MS", 1000)?),
            batch_pause: Duration::from_millis(parse_env_or("BATCH_PAUSE_MS", 500)?),
            gemini_max_attempts: parse_env_or("GEMINI_MAX_ATTEMPTS", 3)?,
        })
    }
}

/// Optional HTTP port for the stub web service.
pub fn server_port_from_env() -> Result<Option<u16>, ConfigError> {
    load_env_optional("SERVER_PORT")
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
        })
        .transpose()
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_or(key: &str, default: &str) -> String {
    load_env_optional(key).unwrap_or_else(|| default.to_string())
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match load_env_optional(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_env(key: &str, value: &str) {
        // SAFETY: Tests in this module run on a single thread per process
        // invocation and restore nothing; keys are test-unique.
        unsafe { env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        // SAFETY: See `set_env`.
        unsafe { env::remove_var(key) }
    }

    // Environment mutation is process-global, so the scenarios share one test
    // body instead of racing each other across the parallel test runner.
    #[test]
    fn env_loading_covers_missing_defaulted_and_invalid_values() {
        remove_env("GOOGLE_API_KEY");
        let error = Config::from_env().unwrap_err();
        assert!(matches!(error, ConfigError::MissingVariable(ref key) if key == "GOOGLE_API_KEY"));

        set_env("GOOGLE_API_KEY", "test-key");
        remove_env("CHUNK_SIZE");
        remove_env("QDRANT_COLLECTION_NAME");
        let config = Config::from_env().expect("config loads with defaults");
        assert_eq!(config.collection_name, "oxford_multimodal");
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.pdf_path, PathBuf::from("assets/oxford.pdf"));
        assert_eq!(config.image_pause, Duration::from_millis(1000));
        assert_eq!(config.batch_pause, Duration::from_millis(500));
        assert_eq!(config.gemini_max_attempts, 3);

        set_env("EMBEDDING_DIMENSION", "not-a-number");
        let error = Config::from_env().unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue(ref key) if key == "EMBEDDING_DIMENSION"));
        remove_env("EMBEDDING_DIMENSION");
    }
}
