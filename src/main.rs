use std::fs;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rayon::ThreadPoolBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sprite_extract_rs::config::Cli;
use sprite_extract_rs::progress_tracker::ProgressTracker;
use sprite_extract_rs::{ImageProcessor, PngDirectorySink};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    cli.validate()?;
    let config = cli.extract_config();

    ensure!(
        cli.input.exists(),
        "Input path does not exist: {}",
        cli.input.display()
    );

    if let Some(num_threads) = cli.num_threads {
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }

    fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            cli.output_dir.display()
        )
    })?;
    let sink = PngDirectorySink::new(&cli.output_dir);

    if cli.input.is_file() {
        let processor = ImageProcessor::new(sink, config);
        if let Err(e) = processor.process_file(&cli.input) {
            error!("Error processing {}: {}", cli.input.display(), e);
        }
        return Ok(());
    }

    let tracker = ProgressTracker::new(&cli.input);
    ensure!(
        !tracker.is_empty(),
        "No images found in {}",
        cli.input.display()
    );

    let processor = ImageProcessor::new(sink, config).with_input_root(&cli.input);
    let summary = tracker.process_images(&processor);

    info!(
        "Done! Extracted {} sprites from {} images.",
        summary.sprites, summary.images
    );
    if summary.failures > 0 {
        warn!("{} images could not be processed", summary.failures);
    }

    Ok(())
}
