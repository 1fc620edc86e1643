#![deny(missing_docs)]

//! Core library for the oxbrain ingestion pipeline.

/// HTTP routing for the stub web service.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Gemini vision and embedding client.
pub mod gemini;
/// Structured logging and tracing setup.
pub mod logging;
/// PDF text and image extraction.
pub mod pdf;
/// Card construction and the ingestion pipeline.
pub mod processing;
/// Qdrant vector store integration.
pub mod qdrant;
