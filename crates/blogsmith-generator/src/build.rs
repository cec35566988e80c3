//! Build orchestration.
//!
//! Runs the stages in a fixed order: stylesheet, assets, posts, index,
//! feed, sitemap. The output directory is written into, never cleaned.

use std::{
    fs,
    path::Path,
    time::Instant,
};

use blogsmith_core::{BuildConfig, Document};
use blogsmith_parser::{MarkdownRenderer, SyntaxError};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    assets::{AssetError, AssetPublisher},
    html::{HtmlError, PageComposer},
    loader::{Collection, ContentLoader, LoadError},
    rss::{RssError, RssGenerator},
    sitemap::SitemapGenerator,
    style::{StyleCompiler, StyleError},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stylesheet compilation failed.
    #[error("style error: {0}")]
    Style(#[from] StyleError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Loader error.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Highlight stylesheet error.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// RSS generation error.
    #[error("RSS error: {0}")]
    Rss(#[from] RssError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of post pages written.
    pub posts: usize,

    /// Number of drafts left out.
    pub drafts: usize,

    /// Number of files skipped because they could not be loaded.
    pub skipped: usize,

    /// Number of assets copied.
    pub assets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: BuildConfig,
    renderer: MarkdownRenderer,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        let renderer = MarkdownRenderer::with_theme(&config.syntax_theme);
        Self { config, renderer }
    }

    fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            posts = %self.config.posts_dir.display(),
            output = %self.output_dir().display(),
            "starting build"
        );

        let css = StyleCompiler::new(&self.config.style_entry).compile_to(self.output_dir())?;
        info!(path = %css.display(), "compiled stylesheet");

        stats.assets = AssetPublisher::new(&self.config.assets_dir, self.config.assets.clone())
            .publish(self.output_dir())?;
        info!(count = stats.assets, "published assets");

        let Collection {
            documents,
            drafts,
            skipped,
        } = ContentLoader::new(&self.config.posts_dir).load()?;
        stats.drafts = drafts;
        stats.skipped = skipped.len();

        let composer = PageComposer::load(self.config.clone())?;

        stats.posts = self.write_posts(&composer, &documents)?;
        info!(count = stats.posts, "wrote post pages");

        let index = composer.index_path(self.output_dir());
        write_file(&index, &composer.compose_index(&documents))?;
        info!(path = %index.display(), "wrote index");

        let feed = self.output_dir().join("blog").join("rss.xml");
        write_file(&feed, &RssGenerator::new(self.config.clone()).generate(&documents)?)?;
        info!(path = %feed.display(), "wrote feed");

        let sitemap = self.output_dir().join("sitemap.xml");
        write_file(&sitemap, &SitemapGenerator::new(self.config.clone()).generate(&documents))?;
        info!(path = %sitemap.display(), urls = 2 + documents.len(), "wrote sitemap");

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            posts = stats.posts,
            drafts = stats.drafts,
            skipped = stats.skipped,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Render and write every post plus the shared highlight stylesheet.
    fn write_posts(&self, composer: &PageComposer, docs: &[Document]) -> Result<usize> {
        let highlight_css = self.renderer.highlighter().stylesheet()?;
        write_file(
            &self.output_dir().join("blog").join("highlight.css"),
            &highlight_css,
        )?;

        for doc in docs {
            let rendered = self.renderer.render_document(doc);
            let html = composer.compose_post(doc, &rendered);
            write_file(&composer.post_path(doc, self.output_dir()), &html)?;
        }

        Ok(docs.len())
    }
}

/// Write `contents` to `path`, creating parent directories.
fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
