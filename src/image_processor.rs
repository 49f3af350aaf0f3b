use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::RgbImage;
use tracing::{info, warn};

use crate::config::ExtractConfig;
use crate::errors::{Result, SpriteError};
use crate::pipeline::{strip_alpha, Sprite, SpriteSheet};
use crate::traits::SpriteSink;

pub fn is_supported_image_format(path: &Path) -> bool {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    match extension.to_lowercase().as_str() {
        "png" | "jpg" | "jpeg" | "webp" | "bmp" => true,
        "gif" | "tif" | "tiff" => cfg!(feature = "image-extra"),
        _ => false,
    }
}

/// Decodes a sheet into 8-bit RGB, dropping any alpha channel.
pub fn load_sheet(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|source| SpriteError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(strip_alpha(&image))
}

pub fn sprite_file_name(index: usize) -> String {
    format!("pose_{index}.png")
}

/// Writes sprites as `<root>/<sheet>/pose_<index>.png`.
#[derive(Debug, Clone)]
pub struct PngDirectorySink {
    root: PathBuf,
}

impl PngDirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SpriteSink for PngDirectorySink {
    fn store(&self, sheet: &Path, sprite: &Sprite) -> Result<PathBuf> {
        let dir = self.root.join(sheet);
        fs::create_dir_all(&dir).map_err(|source| SpriteError::FileSystem {
            path: dir.clone(),
            operation: "create sheet directory".to_string(),
            source,
        })?;

        let path = dir.join(sprite_file_name(sprite.index));
        let file = File::create(&path).map_err(|source| SpriteError::FileSystem {
            path: path.clone(),
            operation: "create sprite file".to_string(),
            source,
        })?;

        let encoder = PngEncoder::new_with_quality(
            BufWriter::new(file),
            CompressionType::Fast,
            FilterType::Adaptive,
        );
        sprite
            .image
            .write_with_encoder(encoder)
            .map_err(|source| SpriteError::Encode {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

/// Runs the pipeline for one input file at a time and hands the results to a sink.
pub struct ImageProcessor<S: SpriteSink> {
    sink: S,
    config: ExtractConfig,
    input_root: Option<PathBuf>,
}

impl<S: SpriteSink> ImageProcessor<S> {
    pub const fn new(sink: S, config: ExtractConfig) -> Self {
        Self {
            sink,
            config,
            input_root: None,
        }
    }

    /// Sheets below `root` keep their relative directory in the output.
    pub fn with_input_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.input_root = Some(root.into());
        self
    }

    pub const fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Decodes and processes one file. Returns the number of sprites written.
    pub fn process_file(&self, path: &Path) -> Result<usize> {
        info!("Processing: {}", path.display());
        let image = load_sheet(path)?;
        self.process_image(&image, &self.sheet_name(path))
    }

    /// Processes an already decoded sheet. Finding no sprites is not an error.
    pub fn process_image(&self, image: &RgbImage, sheet: &Path) -> Result<usize> {
        info!("  Resolution: {}x{}", image.width(), image.height());

        let analysis = SpriteSheet::analyze(image, &self.config);
        info!("  Found {} sprites", analysis.region_count());
        if analysis.region_count() == 0 {
            warn!(
                "  No sprites detected in {}. Try adjusting tolerance.",
                sheet.display()
            );
            return Ok(0);
        }

        let sprites = analysis.extract(&self.config)?;
        for sprite in &sprites {
            let location = self.sink.store(sheet, sprite)?;
            info!(
                "  Saved: {} ({}x{})",
                location.display(),
                sprite.image.width(),
                sprite.image.height()
            );
        }

        Ok(sprites.len())
    }

    /// Output name for a sheet: its path relative to the input root, without extension.
    pub fn sheet_name(&self, path: &Path) -> PathBuf {
        let stem = path.file_stem().unwrap_or(OsStr::new("sheet"));
        let parent = self
            .input_root
            .as_deref()
            .and_then(|root| path.parent()?.strip_prefix(root).ok())
            .unwrap_or(Path::new(""));
        parent.join(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{FailingSink, MemorySink};
    use image::Rgb;

    fn sheet() -> RgbImage {
        RgbImage::from_fn(300, 120, |x, y| {
            if (20..60).contains(&y) && ((20..70).contains(&x) || (150..200).contains(&x)) {
                Rgb([200, 40, 40])
            } else {
                Rgb([255, 0, 255])
            }
        })
    }

    #[test]
    fn test_supported_formats() {
        let test_cases = vec![
            ("test.jpg", true),
            ("test.JPEG", true),
            ("test.png", true),
            ("test.webp", true),
            ("test.bmp", true),
            ("test.txt", false),
            ("test", false),
        ];

        for (filename, expected) in test_cases {
            assert_eq!(
                is_supported_image_format(Path::new(filename)),
                expected,
                "{filename}"
            );
        }
    }

    #[test]
    fn test_sheet_name_without_root() {
        let processor = ImageProcessor::new(MemorySink::new(), ExtractConfig::default());
        assert_eq!(
            processor.sheet_name(Path::new("/tmp/sheets/hero.png")),
            PathBuf::from("hero")
        );
    }

    #[test]
    fn test_sheet_name_keeps_relative_dirs() {
        let processor = ImageProcessor::new(MemorySink::new(), ExtractConfig::default())
            .with_input_root("/data/input");
        assert_eq!(
            processor.sheet_name(Path::new("/data/input/npc/guard.webp")),
            PathBuf::from("npc/guard")
        );
        assert_eq!(
            processor.sheet_name(Path::new("/elsewhere/guard.webp")),
            PathBuf::from("guard")
        );
    }

    #[test]
    fn test_process_image_stores_every_sprite() -> Result<()> {
        let processor = ImageProcessor::new(MemorySink::new(), ExtractConfig::default());
        let count = processor.process_image(&sheet(), Path::new("hero"))?;

        assert_eq!(count, 2);
        let stored = processor.sink().sprites();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|(name, _)| name == Path::new("hero")));
        assert_eq!(stored[0].1.index, 0);
        assert_eq!(stored[1].1.index, 1);
        Ok(())
    }

    #[test]
    fn test_no_sprites_writes_nothing() -> Result<()> {
        let processor = ImageProcessor::new(MemorySink::new(), ExtractConfig::default());
        let blank = RgbImage::from_pixel(50, 50, Rgb([255, 0, 255]));

        assert_eq!(processor.process_image(&blank, Path::new("blank"))?, 0);
        assert!(processor.sink().is_empty());
        Ok(())
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let processor = ImageProcessor::new(FailingSink, ExtractConfig::default());
        let result = processor.process_image(&sheet(), Path::new("hero"));
        assert!(matches!(result, Err(SpriteError::FileSystem { .. })));
    }

    #[test]
    fn test_undecodable_file() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let path = temp_dir.path().join("broken.png");
        fs::write(&path, b"not an image")?;

        let processor = ImageProcessor::new(MemorySink::new(), ExtractConfig::default());
        let result = processor.process_file(&path);
        assert!(matches!(result, Err(SpriteError::Decode { .. })));
        Ok(())
    }

    #[test]
    fn test_png_sink_writes_files() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let sink = PngDirectorySink::new(temp_dir.path());
        let processor = ImageProcessor::new(sink, ExtractConfig::default().with_remove_background(true));

        processor.process_image(&sheet(), Path::new("chars/hero"))?;

        let dir = temp_dir.path().join("chars/hero");
        for index in 0..2 {
            let written = image::open(dir.join(sprite_file_name(index)))
                .map_err(|source| SpriteError::Decode {
                    path: dir.clone(),
                    source,
                })?;
            assert!(written.color().has_alpha());
        }
        assert!(!dir.join(sprite_file_name(2)).exists());
        Ok(())
    }
}
