use std::path::{Path, PathBuf};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::error;
use walkdir::WalkDir;

use crate::image_processor::{is_supported_image_format, ImageProcessor};
use crate::traits::SpriteSink;

/// Totals for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub images: usize,
    pub sprites: usize,
    pub failures: usize,
}

impl BatchSummary {
    const fn merge(self, other: Self) -> Self {
        Self {
            images: self.images + other.images,
            sprites: self.sprites + other.sprites,
            failures: self.failures + other.failures,
        }
    }
}

/// Processes a set of sheets in parallel behind a progress bar.
pub struct ProgressTracker {
    progress_bar: ProgressBar,
    image_paths: Vec<PathBuf>,
}

impl ProgressTracker {
    /// Collects every supported image below `input_dir`.
    pub fn new(input_dir: &Path) -> Self {
        let mut image_paths: Vec<_> = WalkDir::new(input_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_supported_image_format(e.path()))
            .map(|e| e.into_path())
            .collect();
        image_paths.sort();

        Self::from_paths(image_paths)
    }

    pub fn from_paths(image_paths: Vec<PathBuf>) -> Self {
        let progress_bar = ProgressBar::new(image_paths.len() as u64);
        progress_bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        Self {
            progress_bar,
            image_paths,
        }
    }

    /// Suppresses the progress bar.
    pub fn hidden(mut self) -> Self {
        self.progress_bar = ProgressBar::hidden();
        self.progress_bar.set_length(self.image_paths.len() as u64);
        self
    }

    pub fn image_paths(&self) -> &[PathBuf] {
        &self.image_paths
    }

    pub fn is_empty(&self) -> bool {
        self.image_paths.is_empty()
    }

    /// Processes every collected sheet. A sheet that fails is logged and counted, and the
    /// rest of the batch carries on.
    pub fn process_images<S: SpriteSink>(&self, processor: &ImageProcessor<S>) -> BatchSummary {
        let summary = self
            .image_paths
            .par_iter()
            .progress_with(self.progress_bar.clone())
            .map(|path| match processor.process_file(path) {
                Ok(sprites) => BatchSummary {
                    images: 1,
                    sprites,
                    failures: 0,
                },
                Err(e) => {
                    if cfg!(debug_assertions) {
                        error!("Error processing {}: {:#?}", path.display(), e);
                    } else {
                        error!("Error processing {}: {}", path.display(), e);
                    }
                    BatchSummary {
                        images: 1,
                        sprites: 0,
                        failures: 1,
                    }
                }
            })
            .reduce(BatchSummary::default, BatchSummary::merge);

        self.progress_bar.finish();
        summary
    }
}
