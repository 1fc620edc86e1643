//! Ingestion service coordinating extraction, chunking, description,
//! embedding, and Qdrant writes.

use crate::{
    config::Config,
    gemini::GeminiClient,
    pdf,
    processing::{
        chunking::build_text_cards,
        describe::describe_images,
        types::{Card, CardType, IngestError, IngestReport, StoreSummary},
    },
    qdrant::{CardPoint, QdrantService, payload::current_timestamp_rfc3339, point_uuid},
};

/// Coordinates the full offline corpus build.
///
/// The service owns long-lived handles to the Gemini and Qdrant clients and
/// the run configuration. Control flow is linear and run once: extract text,
/// chunk, store; extract images, describe, store.
pub struct IngestService {
    gemini: GeminiClient,
    qdrant: QdrantService,
    config: Config,
}

impl IngestService {
    /// Wire up the backing clients from the run configuration.
    pub fn new(config: Config) -> Result<Self, IngestError> {
        let gemini = GeminiClient::new(&config)?;
        let qdrant = QdrantService::new(&config)?;
        Ok(Self {
            gemini,
            qdrant,
            config,
        })
    }

    /// Execute the whole pipeline and return a build summary.
    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        tracing::info!(
            collection = %self.config.collection_name,
            pdf = %self.config.pdf_path.display(),
            "Starting offline corpus build"
        );
        self.qdrant
            .create_collection_if_not_exists(
                &self.config.collection_name,
                self.config.embedding_dimension as u64,
            )
            .await?;

        tracing::info!("Processing text from the PDF");
        let pages = pdf::extract_pages(&self.config.pdf_path, &self.config.source_label)?;
        let text_cards = build_text_cards(&pages, self.config.chunk_size, self.config.chunk_overlap)?;
        let text_cards: Vec<Card> = text_cards.into_iter().map(Card::Text).collect();
        let text_summary = self.store_cards(&text_cards, CardType::Text).await?;

        tracing::info!("Processing images from the PDF");
        let image_paths =
            pdf::extract_images(&self.config.pdf_path, &self.config.image_output_dir)?;
        let description = describe_images(
            &self.gemini,
            &image_paths,
            &self.config.source_label,
            self.config.image_pause,
        )
        .await;
        let image_cards: Vec<Card> = description.cards.into_iter().map(Card::Image).collect();
        let image_summary = self.store_cards(&image_cards, CardType::Image).await?;

        let total_points = self.qdrant.count_points(&self.config.collection_name).await?;
        let report = IngestReport {
            pages: pages.len(),
            text_cards: text_summary.stored,
            images_extracted: image_paths.len(),
            image_cards: image_summary.stored,
            images_skipped: description.skipped,
            total_points,
        };
        tracing::info!(
            pages = report.pages,
            text_cards = report.text_cards,
            images_extracted = report.images_extracted,
            image_cards = report.image_cards,
            images_skipped = report.images_skipped.len(),
            total_points = report.total_points,
            "Corpus build complete"
        );
        Ok(report)
    }

    /// Embed and persist a homogeneous list of cards in batches.
    ///
    /// Card ids are `{type}_{global_index}` over the whole list, so ids stay
    /// unique across batches within one call. A failing batch aborts the
    /// remaining ones; retries happen only at the HTTP-call level inside the
    /// Gemini client.
    pub async fn store_cards(
        &self,
        cards: &[Card],
        card_type: CardType,
    ) -> Result<StoreSummary, IngestError> {
        let label = card_type.label();
        tracing::info!(cards = cards.len(), card_type = label, "Storing cards");
        let ingested_at = current_timestamp_rfc3339();

        let mut summary = StoreSummary::default();
        for (batch_index, batch) in cards.chunks(self.config.batch_size).enumerate() {
            if batch_index > 0 && !self.config.batch_pause.is_zero() {
                tokio::time::sleep(self.config.batch_pause).await;
            }

            let texts: Vec<String> = batch
                .iter()
                .map(|card| card.content().to_string())
                .collect();
            let vectors = self.gemini.embed_batch(&texts).await?;

            let points: Vec<CardPoint> = batch
                .iter()
                .zip(vectors)
                .enumerate()
                .map(|(offset, (card, vector))| {
                    let global_index = batch_index * self.config.batch_size + offset;
                    let card_id = format!("{label}_{global_index}");
                    CardPoint {
                        id: point_uuid(&card_id),
                        payload: card.payload(&card_id, &ingested_at),
                        vector,
                    }
                })
                .collect();

            self.qdrant
                .upsert_points(&self.config.collection_name, &points)
                .await?;
            summary.stored += points.len();
            summary.batches += 1;
            tracing::info!(
                batch = batch_index + 1,
                cards = points.len(),
                card_type = label,
                "Stored batch"
            );
        }

        tracing::info!(
            stored = summary.stored,
            batches = summary.batches,
            card_type = label,
            "Finished storing cards"
        );
        Ok(summary)
    }
}
