use std::path::PathBuf;

use anyhow::{Context, bail};

use docpipe::application::services::OutputFormatter;
use docpipe::domain::{DestinationKind, DestinationParams, OutputFormat, SourceKind, SourceParams};
use docpipe::infrastructure::observability::{TracingConfig, init_tracing};
use docpipe::presentation::{AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: docpipe <path> [json|xml|csv|txt]");
    };
    let format = match args.next() {
        Some(name) => OutputFormatter::parse_format(&name)?,
        None => OutputFormat::Json,
    };

    let settings = Settings::load().context("Failed to load settings")?;
    init_tracing(
        TracingConfig::default()
            .with_filter(settings.logging.level.clone())
            .with_json_format(settings.logging.json),
    );

    let state = AppState::from_settings(settings).context("Failed to initialize services")?;

    let raw_file = state
        .ingestion_service
        .ingest(SourceKind::LocalPath, SourceParams::path(path))
        .await?;

    let limit = state.settings.limits.max_file_size_bytes();
    if raw_file.size_bytes() > limit {
        bail!(
            "{} exceeds the {} MB limit",
            raw_file.name,
            state.settings.limits.max_file_size_mb
        );
    }

    let document = state.extraction_service.process_file(&raw_file).await?;
    let rendered = OutputFormatter::format(&document, format)?;

    let stem = raw_file
        .name
        .rsplit_once('.')
        .map_or(raw_file.name.as_str(), |(stem, _)| stem);
    let output_name = format!("{stem}.{}", format.file_extension());

    let location = state
        .storage_service
        .save(
            &rendered,
            &output_name,
            DestinationKind::Local,
            DestinationParams::default(),
        )
        .await?;

    tracing::info!(location = %location, "Document processed");
    println!("{location}");

    Ok(())
}
