//! Stylesheet compilation.
//!
//! Compiles the SCSS entry file, following its imports, into the single
//! compressed `blog.css` served next to the blog.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

/// File name of the compiled stylesheet inside the output directory.
pub const STYLESHEET_NAME: &str = "blog.css";

/// Stylesheet errors.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The entry file or one of its imports failed to compile.
    #[error("failed to compile {path}: {message}")]
    Compile { path: PathBuf, message: String },

    /// The compiled stylesheet could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for stylesheet operations.
pub type Result<T> = std::result::Result<T, StyleError>;

/// SCSS compiler for the blog stylesheet.
#[derive(Debug)]
pub struct StyleCompiler {
    entry: PathBuf,
}

impl StyleCompiler {
    /// Create a compiler for `entry`.
    #[must_use]
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
        }
    }

    /// Compile the entry file to compressed CSS.
    pub fn compile(&self) -> Result<String> {
        let options = grass::Options::default().style(grass::OutputStyle::Compressed);
        grass::from_path(&self.entry, &options).map_err(|e| StyleError::Compile {
            path: self.entry.clone(),
            message: e.to_string(),
        })
    }

    /// Compile and write `blog.css` into `output_dir`, returning its path.
    pub fn compile_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let css = self.compile()?;
        let path = output_dir.join(STYLESHEET_NAME);

        fs::create_dir_all(output_dir)
            .and_then(|()| fs::write(&path, &css))
            .map_err(|source| StyleError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(entry = %self.entry.display(), bytes = css.len(), "compiled stylesheet");
        Ok(path)
    }
}
