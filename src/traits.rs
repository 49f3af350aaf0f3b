use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::pipeline::Sprite;

/// Where extracted sprites end up.
///
/// Keeps persistence out of the detection pipeline so it can be swapped for tests.
pub trait SpriteSink: Send + Sync {
    /// Stores one sprite of `sheet`, a relative name such as `heroes/knight`, and
    /// returns the location it was written to.
    fn store(&self, sheet: &Path, sprite: &Sprite) -> Result<PathBuf>;
}
