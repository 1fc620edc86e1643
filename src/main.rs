use clap::Parser;
use oxbrain::{
    config::{Config, ConfigError},
    logging,
    processing::IngestService,
};
use std::path::PathBuf;

/// Build the multimodal retrieval corpus from a handbook PDF.
#[derive(Parser)]
#[command(name = "oxbrain", version)]
struct Args {
    /// Path to the source PDF (overrides PDF_FILE_PATH).
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// Directory for extracted images (overrides IMAGE_OUTPUT_DIR).
    #[arg(long)]
    images_dir: Option<PathBuf>,
    /// Target collection name (overrides QDRANT_COLLECTION_NAME).
    #[arg(long)]
    collection: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err @ ConfigError::MissingVariable(_)) => {
            eprintln!("ERROR: {err}");
            eprintln!("Set GOOGLE_API_KEY in the environment or in a .env file.");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };
    if let Some(pdf) = args.pdf {
        config.pdf_path = pdf;
    }
    if let Some(images_dir) = args.images_dir {
        config.image_output_dir = images_dir;
    }
    if let Some(collection) = args.collection {
        config.collection_name = collection;
    }

    logging::init_tracing();

    let service = IngestService::new(config)?;
    let report = service.run().await?;

    for skipped in &report.images_skipped {
        tracing::warn!(path = %skipped.path.display(), reason = %skipped.reason, "Image skipped during build");
    }
    tracing::info!(
        total_points = report.total_points,
        "The corpus is ready for retrieval"
    );
    Ok(())
}
