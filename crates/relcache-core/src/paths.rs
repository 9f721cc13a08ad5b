use std::path::{Path, PathBuf};

use crate::error::FetchError;

/// Resolves where cached files live.
pub trait CachePaths: Send + Sync {
    fn cache_dir(&self) -> &Path;

    /// Path of a cached file with the given name.
    ///
    /// Only the final component of `file_name` is used.
    fn cache_path(&self, file_name: &str) -> Result<PathBuf, FetchError> {
        let name = Path::new(file_name).file_name().ok_or_else(|| {
            FetchError::filesystem(
                self.cache_dir().join(file_name),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "asset name has no file name"),
            )
        })?;

        Ok(self.cache_dir().join(name))
    }
}

#[derive(Debug, Clone)]
pub struct CacheDir(PathBuf);

impl CacheDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self(dir.into())
    }

    pub fn make_absolute(self) -> anyhow::Result<Self> {
        if self.0.is_absolute() {
            return Ok(self);
        }

        Ok(Self(std::env::current_dir()?.join(self.0)))
    }
}

impl Default for CacheDir {
    fn default() -> Self {
        Self::new(crate::DOT_RELCACHE_CACHE_DIR)
    }
}

impl CachePaths for CacheDir {
    fn cache_dir(&self) -> &Path {
        &self.0
    }
}
