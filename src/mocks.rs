use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::errors::{Result, SpriteError};
use crate::pipeline::Sprite;
use crate::traits::SpriteSink;

/// Sink that keeps sprites in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    stored: Mutex<Vec<(PathBuf, Sprite)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stored.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.lock().is_empty()
    }

    /// Stored sprites ordered by sheet, then index.
    pub fn sprites(&self) -> Vec<(PathBuf, Sprite)> {
        let mut sprites = self.stored.lock().clone();
        sprites.sort_by(|(a, sa), (b, sb)| a.cmp(b).then(sa.index.cmp(&sb.index)));
        sprites
    }
}

impl SpriteSink for MemorySink {
    fn store(&self, sheet: &Path, sprite: &Sprite) -> Result<PathBuf> {
        let location = sheet.join(format!("pose_{}", sprite.index));
        self.stored.lock().push((sheet.to_path_buf(), sprite.clone()));
        Ok(location)
    }
}

/// Sink whose writes always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

impl SpriteSink for FailingSink {
    fn store(&self, sheet: &Path, _sprite: &Sprite) -> Result<PathBuf> {
        Err(SpriteError::FileSystem {
            path: sheet.to_path_buf(),
            operation: "store sprite".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only sink"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use image::RgbaImage;

    fn sprite(index: usize) -> Sprite {
        Sprite {
            index,
            bbox: BoundingBox::new(0, 0, 2, 2),
            image: RgbaImage::new(2, 2),
        }
    }

    #[test]
    fn test_memory_sink_orders_sprites() -> Result<()> {
        let sink = MemorySink::new();
        sink.store(Path::new("b"), &sprite(0))?;
        sink.store(Path::new("a"), &sprite(1))?;
        let location = sink.store(Path::new("a"), &sprite(0))?;

        assert_eq!(location, Path::new("a/pose_0"));
        let order: Vec<_> = sink
            .sprites()
            .into_iter()
            .map(|(sheet, s)| (sheet, s.index))
            .collect();
        assert_eq!(
            order,
            vec![
                (PathBuf::from("a"), 0),
                (PathBuf::from("a"), 1),
                (PathBuf::from("b"), 0),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_failing_sink() {
        assert!(FailingSink.store(Path::new("x"), &sprite(0)).is_err());
    }
}
