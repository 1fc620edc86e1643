//! Qdrant vector store integration.

pub mod client;
pub mod payload;
pub mod types;

pub use client::QdrantService;
pub use payload::point_uuid;
pub use types::{CardPoint, QdrantError};
