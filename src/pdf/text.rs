//! Page-by-page text extraction.

use std::path::Path;

use lopdf::Document;

use super::PdfError;

/// Raw text of a single PDF page plus its provenance.
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// Extracted plain text for the page.
    pub text: String,
    /// Human-readable label for the source document.
    pub source: String,
    /// One-indexed page number within the document.
    pub page: u32,
}

/// Extract plain text from every page of the PDF at `pdf_path`.
///
/// Pages whose text is empty or whitespace-only are dropped, so the returned
/// records cover exactly the pages with visible text, in document order. Page
/// numbers are one-indexed. An unopenable document is a fatal error; a page
/// whose text extraction fails is treated as empty and skipped.
pub fn extract_pages(pdf_path: &Path, source: &str) -> Result<Vec<PageRecord>, PdfError> {
    tracing::info!(path = %pdf_path.display(), "Extracting text from PDF");
    let doc = Document::load(pdf_path)?;

    let mut records = Vec::new();
    for &page_number in doc.get_pages().keys() {
        let text = match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(page = page_number, error = %err, "Page text extraction failed; skipping");
                continue;
            }
        };
        if text.trim().is_empty() {
            continue;
        }
        records.push(PageRecord {
            text,
            source: source.to_string(),
            page: page_number,
        });
    }

    tracing::info!(pages = records.len(), "Finished extracting text from PDF");
    Ok(records)
}
