//! HTML template system for page generation.
//!
//! Templates contain `{{ name }}` placeholders, where `name` is an identifier.
//! Rendering is a single left to right pass: inserted values are never scanned
//! again, so a value containing `{{…}}` cannot cause a second substitution.
//! Braces around anything other than an identifier are plain text.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, warn};

/// Template loading errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file exists but could not be read.
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
        .expect("Invalid regex pattern for template placeholders")
});

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Placeholder values for one render.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A template with `{{ name }}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Placeholders whose name is not in the context, and stray braces, are
    /// copied to the output unchanged.
    #[must_use]
    pub fn render(&self, context: &TemplateContext) -> String {
        PLACEHOLDER
            .replace_all(&self.content, |caps: &Captures<'_>| {
                context
                    .get(&caps[1])
                    .unwrap_or(&caps[0])
                    .to_string()
            })
            .into_owned()
    }
}

/// The two page templates of a blog.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    /// Per-post page.
    pub post: Template,
    /// Blog index page.
    pub index: Template,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            post: Template::new("post", DEFAULT_POST_TEMPLATE),
            index: Template::new("index", DEFAULT_INDEX_TEMPLATE),
        }
    }
}

impl TemplateSet {
    /// Load `post.html` and `index.html` from `dir`.
    ///
    /// A missing file falls back to the built-in template.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            post: load_or_default(dir, "post", DEFAULT_POST_TEMPLATE)?,
            index: load_or_default(dir, "index", DEFAULT_INDEX_TEMPLATE)?,
        })
    }
}

fn load_or_default(dir: &Path, name: &str, fallback: &str) -> Result<Template> {
    let path = dir.join(format!("{name}.html"));
    match fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "loaded template");
            Ok(Template::new(name, content))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "template not found, using built-in default");
            Ok(Template::new(name, fallback))
        }
        Err(source) => Err(TemplateError::Read { path, source }),
    }
}

/// Built-in post page template.
pub const DEFAULT_POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}}</title>
    <meta name="description" content="{{description}}">
    <meta name="author" content="{{author}}">
    <link rel="canonical" href="{{canonical_url}}">
    <meta property="og:type" content="article">
    <meta property="og:title" content="{{title}}">
    <meta property="og:description" content="{{description}}">
    <meta property="og:url" content="{{canonical_url}}">
    {{og_image_tag}}
    <meta name="twitter:card" content="summary_large_image">
    {{twitter_image_tag}}
    <link rel="alternate" type="application/rss+xml" title="RSS" href="/blog/rss.xml">
    <link rel="stylesheet" href="/blog.css">
    {{highlight_css}}
    {{analytics_snippet}}
</head>
<body>
    <main class="blog-post">
        <a class="blog-post__back" href="/blog">&larr; All posts</a>
        <article>
            <header class="blog-post__header">
                <h1 class="blog-post__title">{{title}}</h1>
                <div class="blog-post__meta">
                    <span>{{author}}</span>
                    <time datetime="{{date_iso}}">{{date_formatted}}</time>
                    <span>{{reading_time}} min read</span>
                </div>
                {{tags_html}}
            </header>
            <div class="blog-post__content">
{{content}}
            </div>
        </article>
    </main>
</body>
</html>
"#;

/// Built-in blog index template.
pub const DEFAULT_INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Blog</title>
    <link rel="canonical" href="{{site_url}}/blog">
    <link rel="alternate" type="application/rss+xml" title="RSS" href="/blog/rss.xml">
    <link rel="stylesheet" href="/blog.css">
    {{analytics_snippet}}
</head>
<body>
    <main class="blog-index">
        <h1 class="blog-index__title">Blog</h1>
        <div class="blog-index__posts">
{{posts_html}}
        </div>
    </main>
</body>
</html>
"#;
