//! Card types and error definitions for the ingestion pipeline.

use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

use crate::processing::describe::SkippedImage;

/// Errors produced while turning page text into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// Ingestion configured an impossible chunk budget.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Chunking step failed to segment a page.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// PDF extraction failed.
    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] crate::pdf::PdfError),
    /// Gemini interaction failed during description or embedding.
    #[error("Gemini request failed: {0}")]
    Gemini(#[from] crate::gemini::GeminiError),
    /// Qdrant interaction failed during collection setup or storage.
    #[error("Qdrant request failed: {0}")]
    Qdrant(#[from] crate::qdrant::QdrantError),
}

/// One overlapping chunk of a page's text.
#[derive(Debug, Clone)]
pub struct TextCard {
    /// Chunk text.
    pub content: String,
    /// Human-readable label for the source document.
    pub source: String,
    /// One-indexed page the chunk was cut from.
    pub page: u32,
    /// Position within the page's chunk sequence, restarting at 0 per page.
    pub chunk_id: usize,
}

/// Model-generated description of one extracted image.
#[derive(Debug, Clone)]
pub struct ImageCard {
    /// Free-text description returned by the vision model.
    pub content: String,
    /// Human-readable label for the source document.
    pub source: String,
    /// Path of the saved image file the description refers to.
    pub image_path: PathBuf,
}

/// The unit stored in the vector collection.
#[derive(Debug, Clone)]
pub enum Card {
    /// A chunk of page text.
    Text(TextCard),
    /// A described image.
    Image(ImageCard),
}

/// Discriminator used to label stored cards and form their ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    /// Text chunk cards.
    Text,
    /// Image description cards.
    Image,
}

impl CardType {
    /// Label embedded in card ids and payloads.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl Card {
    /// Text content submitted for embedding and stored as the document body.
    pub fn content(&self) -> &str {
        match self {
            Self::Text(card) => &card.content,
            Self::Image(card) => &card.content,
        }
    }

    /// Build the payload stored alongside the card's vector.
    pub(crate) fn payload(&self, card_id: &str, ingested_at: &str) -> Value {
        match self {
            Self::Text(card) => json!({
                "card_id": card_id,
                "text": card.content,
                "type": CardType::Text.label(),
                "source": card.source,
                "page": card.page,
                "chunk_id": card.chunk_id,
                "ingested_at": ingested_at,
            }),
            Self::Image(card) => json!({
                "card_id": card_id,
                "text": card.content,
                "type": CardType::Image.label(),
                "source": card.source,
                "image_path": card.image_path.display().to_string(),
                "ingested_at": ingested_at,
            }),
        }
    }
}

/// Counters for one `store_cards` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreSummary {
    /// Number of cards persisted.
    pub stored: usize,
    /// Number of batches submitted.
    pub batches: usize,
}

/// Summary of a completed corpus build.
#[derive(Debug)]
pub struct IngestReport {
    /// Pages with non-empty text.
    pub pages: usize,
    /// Text cards stored.
    pub text_cards: usize,
    /// Image files extracted from the PDF.
    pub images_extracted: usize,
    /// Image cards stored.
    pub image_cards: usize,
    /// Images skipped during description, with reasons.
    pub images_skipped: Vec<SkippedImage>,
    /// Total points in the collection after the run.
    pub total_points: u64,
}
