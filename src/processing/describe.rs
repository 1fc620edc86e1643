//! Vision descriptions for extracted images.
//!
//! Each saved image is sent to the vision model with the fixed medical
//! prompt. Failures are per-item: a card is produced on success and a skip
//! record (path plus reason) otherwise, so one bad image never aborts the
//! batch. The caller gets both lists back and can report a summary instead of
//! grepping logs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gemini::GeminiClient;

use super::types::ImageCard;

/// An image that could not be described, with the failure reason.
#[derive(Debug, Clone)]
pub struct SkippedImage {
    /// Path of the image file that was skipped.
    pub path: PathBuf,
    /// Why the image was skipped (load error or API error).
    pub reason: String,
}

/// Outcome of describing a batch of images.
#[derive(Debug, Default)]
pub struct DescriptionReport {
    /// Cards for successfully described images, in input order.
    pub cards: Vec<ImageCard>,
    /// Images that were skipped, with reasons, in input order.
    pub skipped: Vec<SkippedImage>,
}

/// Describe every image in `paths` with the vision model.
///
/// `pause` is slept after each successful call to stay under the provider's
/// rate limits; transient API failures are retried inside the client before
/// an image is given up on.
pub async fn describe_images(
    gemini: &GeminiClient,
    paths: &[PathBuf],
    source: &str,
    pause: Duration,
) -> DescriptionReport {
    tracing::info!(images = paths.len(), "Creating image cards");
    let mut report = DescriptionReport::default();

    for path in paths {
        match describe_one(gemini, path, source).await {
            Ok(card) => {
                tracing::info!(path = %path.display(), "Described image");
                report.cards.push(card);
                if !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
            }
            Err(reason) => {
                tracing::warn!(path = %path.display(), reason = %reason, "Skipping image");
                report.skipped.push(SkippedImage {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    tracing::info!(
        described = report.cards.len(),
        skipped = report.skipped.len(),
        "Finished describing images"
    );
    report
}

async fn describe_one(
    gemini: &GeminiClient,
    path: &Path,
    source: &str,
) -> Result<ImageCard, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| format!("failed to read image: {err}"))?;
    let content = gemini
        .describe_image(&bytes)
        .await
        .map_err(|err| err.to_string())?;
    Ok(ImageCard {
        content,
        source: source.to_string(),
        image_path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use std::fs;

    fn test_gemini(base_url: String) -> GeminiClient {
        let config = crate::config::Config {
            google_api_key: "test-key".into(),
            gemini_base_url: base_url,
            vision_model: "gemini-1.5-pro-latest".into(),
            embedding_model: "text-embedding-004".into(),
            embedding_dimension: 2,
            qdrant_url: "http://127.0.0.1:6333".into(),
            qdrant_api_key: None,
            collection_name: "test".into(),
            pdf_path: "unused.pdf".into(),
            image_output_dir: "unused".into(),
            source_label: "Test Handbook".into(),
            chunk_size: 1000,
            chunk_overlap: 200,
            batch_size: 100,
            image_pause: Duration::ZERO,
            batch_pause: Duration::ZERO,
            gemini_max_attempts: 1,
        };
        GeminiClient::new(&config).expect("client")
    }

    #[tokio::test]
    async fn one_bad_image_does_not_abort_the_batch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-1.5-pro-latest:generateContent");
                then.status(200).json_body(serde_json::json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "Diagram of the heart." }] }
                    }]
                }));
            })
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("page_1_img_0.png");
        fs::write(&good, [1, 2, 3]).expect("write image");
        let missing = dir.path().join("page_2_img_0.png");

        let gemini = test_gemini(server.base_url());
        let report = describe_images(
            &gemini,
            &[missing.clone(), good.clone()],
            "Test Handbook",
            Duration::ZERO,
        )
        .await;

        assert_eq!(report.cards.len(), 1);
        assert_eq!(report.cards[0].content, "Diagram of the heart.");
        assert_eq!(report.cards[0].image_path, good);
        assert_eq!(report.cards[0].source, "Test Handbook");

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, missing);
        assert!(report.skipped[0].reason.contains("failed to read image"));
    }

    #[tokio::test]
    async fn api_failures_become_skip_records() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-1.5-pro-latest:generateContent");
                then.status(400).body("unsupported image");
            })
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let image = dir.path().join("page_1_img_0.png");
        fs::write(&image, [9, 9, 9]).expect("write image");

        let gemini = test_gemini(server.base_url());
        let report =
            describe_images(&gemini, &[image.clone()], "Test Handbook", Duration::ZERO).await;

        assert!(report.cards.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("400"));
    }
}
