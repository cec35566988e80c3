//! Post loading.
//!
//! Reads every markdown file directly inside the posts directory, drops
//! drafts, and skips files that fail to parse.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use blogsmith_core::{ContentType, Document};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Loader errors.
///
/// Problems with individual files are not errors; see [`SkippedFile`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The posts directory exists but could not be listed.
    #[error("failed to read posts directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// A file left out of the build, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Published documents plus what was left out.
#[derive(Debug, Default)]
pub struct Collection {
    /// Non-draft documents, newest first.
    pub documents: Vec<Document>,

    /// Number of drafts left out.
    pub drafts: usize,

    /// Files that could not be turned into a document.
    pub skipped: Vec<SkippedFile>,
}

/// Loads documents from a posts directory.
#[derive(Debug)]
pub struct ContentLoader {
    posts_dir: PathBuf,
}

impl ContentLoader {
    /// Create a loader for `posts_dir`.
    #[must_use]
    pub fn new(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
        }
    }

    /// Load every post.
    ///
    /// A missing directory yields an empty collection.
    pub fn load(&self) -> Result<Collection> {
        let files = self.find_post_files()?;
        debug!(dir = %self.posts_dir.display(), count = files.len(), "found post files");

        let mut collection = Collection::default();
        let mut slugs = HashSet::new();

        for path in files {
            let doc = match read_document(&path) {
                Ok(doc) => doc,
                Err(reason) => {
                    warn!(path = %path.display(), error = %reason, "skipping post");
                    collection.skipped.push(SkippedFile { path, reason });
                    continue;
                }
            };

            if doc.draft {
                debug!(slug = %doc.slug, "skipping draft");
                collection.drafts += 1;
                continue;
            }

            if !slugs.insert(doc.slug.clone()) {
                let reason = format!("duplicate slug '{}'", doc.slug);
                warn!(path = %path.display(), error = %reason, "skipping post");
                collection.skipped.push(SkippedFile { path, reason });
                continue;
            }

            collection.documents.push(doc);
        }

        sort_newest_first(&mut collection.documents);

        info!(
            posts = collection.documents.len(),
            drafts = collection.drafts,
            skipped = collection.skipped.len(),
            "loaded posts"
        );

        Ok(collection)
    }

    /// Markdown files directly inside the posts directory, sorted by name.
    fn find_post_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.posts_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(dir = %self.posts_dir.display(), "posts directory not found");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(LoadError::ReadDir {
                    path: self.posts_dir.clone(),
                    source,
                });
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && ContentType::from_path(path).is_some())
            .collect();
        files.sort();
        Ok(files)
    }
}

fn read_document(path: &Path) -> std::result::Result<Document, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    Document::parse(&content, path).map_err(|e| e.to_string())
}

/// Stable sort by date, newest first.
pub fn sort_newest_first(docs: &mut [Document]) {
    docs.sort_by(|a, b| b.date.cmp(&a.date));
}
