//! Page composition.
//!
//! Turns documents into the post pages and the blog index by filling the
//! loaded templates from typed contexts.

use std::path::{Path, PathBuf};

use blogsmith_core::{BuildConfig, Document, escape_html};
use blogsmith_parser::RenderedDocument;
use thiserror::Error;
use tracing::debug;

use crate::template::{TemplateContext, TemplateError, TemplateSet};

/// Site-relative URL of the highlight stylesheet.
pub const HIGHLIGHT_CSS_URL: &str = "/blog/highlight.css";

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Placeholder values for a post page.
///
/// Every field except `content` holds markup-safe text.
#[derive(Debug, Clone)]
pub struct PostContext {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub date_iso: String,
    pub date_formatted: String,
    pub reading_time: String,
    pub author: String,
    pub content: String,
    pub tags_html: String,
    pub og_image_tag: String,
    pub twitter_image_tag: String,
    pub highlight_css: String,
    pub analytics_snippet: String,
}

impl PostContext {
    /// Build the context for one rendered document.
    pub fn new(doc: &Document, rendered: &RenderedDocument, config: &BuildConfig) -> Self {
        let author = doc.author.as_deref().unwrap_or(&config.default_author);
        let image_url = doc
            .image
            .as_deref()
            .map(|image| escape_html(&format!("{}{image}", config.site_url)));

        Self {
            title: escape_html(&doc.title),
            description: escape_html(doc.description.as_deref().unwrap_or_default()),
            canonical_url: escape_html(&config.url_for(&doc.url_path())),
            date_iso: doc.date_iso(),
            date_formatted: doc.date_formatted(),
            reading_time: rendered.reading_time.to_string(),
            author: escape_html(author),
            content: rendered.html.clone(),
            tags_html: tag_list(&doc.tags, "blog-post__tags", "blog-post__tag"),
            og_image_tag: image_url
                .as_deref()
                .map(|url| format!(r#"<meta property="og:image" content="{url}" />"#))
                .unwrap_or_default(),
            twitter_image_tag: image_url
                .as_deref()
                .map(|url| format!(r#"<meta name="twitter:image" content="{url}" />"#))
                .unwrap_or_default(),
            highlight_css: format!(r#"<link rel="stylesheet" href="{HIGHLIGHT_CSS_URL}" />"#),
            analytics_snippet: config.analytics_snippet(),
        }
    }
}

impl From<PostContext> for TemplateContext {
    fn from(ctx: PostContext) -> Self {
        TemplateContext::new()
            .with_var("title", ctx.title)
            .with_var("description", ctx.description)
            .with_var("canonical_url", ctx.canonical_url)
            .with_var("date_iso", ctx.date_iso)
            .with_var("date_formatted", ctx.date_formatted)
            .with_var("reading_time", ctx.reading_time)
            .with_var("author", ctx.author)
            .with_var("content", ctx.content)
            .with_var("tags_html", ctx.tags_html)
            .with_var("og_image_tag", ctx.og_image_tag)
            .with_var("twitter_image_tag", ctx.twitter_image_tag)
            .with_var("highlight_css", ctx.highlight_css)
            .with_var("analytics_snippet", ctx.analytics_snippet)
    }
}

/// Placeholder values for the blog index.
#[derive(Debug, Clone)]
pub struct IndexContext {
    pub site_url: String,
    pub posts_html: String,
    pub analytics_snippet: String,
}

impl IndexContext {
    /// Build the index context; cards keep the order of `docs`.
    pub fn new(docs: &[Document], config: &BuildConfig) -> Self {
        let posts_html = docs.iter().map(post_card).collect::<Vec<_>>().join("\n");

        Self {
            site_url: escape_html(&config.site_url),
            posts_html,
            analytics_snippet: config.analytics_snippet(),
        }
    }
}

impl From<IndexContext> for TemplateContext {
    fn from(ctx: IndexContext) -> Self {
        TemplateContext::new()
            .with_var("site_url", ctx.site_url)
            .with_var("posts_html", ctx.posts_html)
            .with_var("analytics_snippet", ctx.analytics_snippet)
    }
}

/// Composes post and index pages from a template set.
#[derive(Debug)]
pub struct PageComposer {
    templates: TemplateSet,
    config: BuildConfig,
}

impl PageComposer {
    /// Create a composer with explicit templates.
    #[must_use]
    pub fn new(config: BuildConfig, templates: TemplateSet) -> Self {
        Self { templates, config }
    }

    /// Create a composer with templates read from `config.template_dir`.
    pub fn load(config: BuildConfig) -> Result<Self> {
        let templates = TemplateSet::load(&config.template_dir)?;
        Ok(Self::new(config, templates))
    }

    /// Compose the full page of one post.
    pub fn compose_post(&self, doc: &Document, rendered: &RenderedDocument) -> String {
        debug!(slug = %doc.slug, "composing post page");
        let ctx = PostContext::new(doc, rendered, &self.config);
        self.templates.post.render(&ctx.into())
    }

    /// Compose the blog index listing `docs` in the given order.
    pub fn compose_index(&self, docs: &[Document]) -> String {
        debug!(count = docs.len(), "composing index page");
        let ctx = IndexContext::new(docs, &self.config);
        self.templates.index.render(&ctx.into())
    }

    /// Output file for a post page.
    pub fn post_path(&self, doc: &Document, output_dir: &Path) -> PathBuf {
        output_dir.join("blog").join(&doc.slug).join("index.html")
    }

    /// Output file for the index page.
    pub fn index_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join("blog").join("index.html")
    }
}

/// Index card for one post.
pub fn post_card(doc: &Document) -> String {
    format!(
        r#"<a href="/blog/{slug}" class="post-card"><div class="post-card__date">{date}</div><h2 class="post-card__title">{title}</h2><p class="post-card__description">{description}</p>{tags}</a>"#,
        slug = escape_html(&doc.slug),
        date = doc.date_formatted(),
        title = escape_html(&doc.title),
        description = escape_html(doc.description.as_deref().unwrap_or_default()),
        tags = tag_list(&doc.tags, "post-card__tags", "post-card__tag"),
    )
}

fn tag_list(tags: &[String], list_class: &str, tag_class: &str) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let spans: String = tags
        .iter()
        .map(|tag| format!(r#"<span class="{tag_class}">{}</span>"#, escape_html(tag)))
        .collect();
    format!(r#"<div class="{list_class}">{spans}</div>"#)
}
