//! PDF text and image extraction built on `lopdf`.

mod images;
mod text;

pub use images::extract_images;
pub use text::{PageRecord, extract_pages};

use thiserror::Error;

/// Errors raised while reading the source PDF or writing extracted assets.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The document could not be opened or parsed.
    #[error("Failed to read PDF: {0}")]
    Document(#[from] lopdf::Error),
    /// Filesystem operation failed while writing extracted images.
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}
