//! Card construction and the ingestion pipeline: chunking, description,
//! embedding, and storage orchestration.

pub mod chunking;
pub mod describe;
mod service;
pub mod types;

pub use chunking::build_text_cards;
pub use describe::{DescriptionReport, SkippedImage, describe_images};
pub use service::IngestService;
pub use types::{Card, CardType, ChunkingError, ImageCard, IngestError, IngestReport, TextCard};
