//! Embedded image extraction.
//!
//! Walks each page's `XObject` resources in listed order and writes every
//! `/Subtype /Image` stream to disk as `page_{page}_img_{index}.png`. The
//! page number is one-indexed and the image index restarts at 0 per page, so
//! filenames are unique across the document. Stream bytes are Flate-decoded
//! when applicable and written verbatim otherwise; the `.png` extension is a
//! naming contract, not a format guarantee.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};

use super::PdfError;

/// Extract every embedded image from the PDF at `pdf_path` into `output_dir`.
///
/// The output directory is created (with parents) when missing. Returns the
/// ordered list of written file paths.
pub fn extract_images(pdf_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, PdfError> {
    fs::create_dir_all(output_dir)?;
    tracing::info!(
        path = %pdf_path.display(),
        output = %output_dir.display(),
        "Extracting images from PDF"
    );
    let doc = Document::load(pdf_path)?;

    let mut written = Vec::new();
    for (page_number, page_id) in doc.get_pages() {
        for (index, bytes) in image_streams(&doc, page_id).into_iter().enumerate() {
            let path = output_dir.join(format!("page_{page_number}_img_{index}.png"));
            fs::write(&path, &bytes)?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote embedded image");
            written.push(path);
        }
    }

    tracing::info!(images = written.len(), "Finished extracting images");
    Ok(written)
}

/// Collect the raw bytes of every image XObject referenced by a page, in the
/// order the resource dictionary lists them.
fn image_streams(doc: &Document, page_id: ObjectId) -> Vec<Vec<u8>> {
    let Some(resources) = page_resources(doc, page_id) else {
        return Vec::new();
    };
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|object| resolve_dict(doc, object))
    else {
        return Vec::new();
    };

    let mut images = Vec::new();
    for (_name, entry) in xobjects.iter() {
        let stream = match entry {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Stream(stream)) => stream,
                _ => continue,
            },
            Object::Stream(stream) => stream,
            _ => continue,
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .and_then(|object| object.as_name())
            .map(|name| name == b"Image")
            .unwrap_or(false);
        if !is_image {
            continue;
        }
        let bytes = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        images.push(bytes);
    }
    images
}

/// Resolve a page's resource dictionary, following `Parent` links for
/// resources inherited from the page tree.
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(object) = dict.get(b"Resources") {
            return resolve_dict(doc, object);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        _ => None,
    }
}
