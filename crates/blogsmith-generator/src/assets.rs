//! Static asset publishing.
//!
//! Copies a fixed list of files from the assets directory into
//! `<output>/assets/`. Files already present in the output are left alone.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, warn};

/// Asset publishing errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset name is not a plain file name.
    #[error("invalid asset name: {0}")]
    InvalidName(String),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Publishes named assets into the output directory.
#[derive(Debug)]
pub struct AssetPublisher {
    source_dir: PathBuf,
    names: Vec<String>,
}

impl AssetPublisher {
    /// Create a publisher for `names` inside `source_dir`.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, names: Vec<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            names,
        }
    }

    /// Copy every asset into `<output_dir>/assets/`, returning how many were copied.
    ///
    /// Missing sources and existing destinations are skipped.
    pub fn publish(&self, output_dir: &Path) -> Result<usize> {
        let dest_dir = output_dir.join("assets");
        fs::create_dir_all(&dest_dir)?;

        let mut copied = 0;
        for name in &self.names {
            if !is_plain_file_name(name) {
                return Err(AssetError::InvalidName(name.clone()));
            }

            let source = self.source_dir.join(name);
            let dest = dest_dir.join(name);

            if dest.exists() {
                debug!(path = %dest.display(), "asset already published");
                continue;
            }
            if !source.is_file() {
                warn!(path = %source.display(), "asset not found, skipping");
                continue;
            }

            fs::copy(&source, &dest)?;
            debug!(from = %source.display(), to = %dest.display(), "copied asset");
            copied += 1;
        }

        Ok(copied)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
