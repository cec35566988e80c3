//! Build configuration management.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    escape::escape_html,
};

/// Process-wide settings for one build run.
///
/// Every field maps to an environment variable of the same name in upper
/// case (`site_url` ← `SITE_URL`) and has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Absolute base URL of the site, without trailing slash.
    pub site_url: String,

    /// Analytics provider selector: `none`, `plausible`, or `gtag`.
    pub analytics_provider: String,

    /// Provider-specific identifier (Plausible domain or Google tag id).
    pub analytics_id: String,

    /// Directory holding the markdown posts.
    pub posts_dir: PathBuf,

    /// Directory holding `post.html` and `index.html`.
    pub template_dir: PathBuf,

    /// SCSS entry point compiled into `blog.css`.
    pub style_entry: PathBuf,

    /// Source directory of the static assets.
    pub assets_dir: PathBuf,

    /// File names published from `assets_dir`.
    pub assets: Vec<String>,

    /// Root of the generated site.
    pub output_dir: PathBuf,

    /// Author shown when a post has none.
    pub default_author: String,

    /// RSS channel title.
    pub feed_title: String,

    /// RSS channel description.
    pub feed_description: String,

    /// RSS channel language.
    pub feed_language: String,

    /// Maximum number of items in the feed.
    pub rss_limit: usize,

    /// Syntax highlighting theme name.
    pub syntax_theme: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            site_url: "https://example.com".to_string(),
            analytics_provider: "none".to_string(),
            analytics_id: String::new(),
            posts_dir: PathBuf::from("src/blog/posts"),
            template_dir: PathBuf::from("src/blog/templates"),
            style_entry: PathBuf::from("src/sass/blog-bundle.scss"),
            assets_dir: PathBuf::from("src/assets"),
            assets: vec!["menu.svg".to_string(), "fav.png".to_string()],
            output_dir: PathBuf::from("dist"),
            default_author: String::new(),
            feed_title: "Blog".to_string(),
            feed_description: "Writing about software engineering and building things."
                .to_string(),
            feed_language: "en-us".to_string(),
            rss_limit: 20,
            syntax_theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Environment source; `ASSETS` is a comma separated list.
fn environment() -> config::Environment {
    config::Environment::default()
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("assets")
}

impl BuildConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(environment())
    }

    /// Load configuration from an explicit set of variables instead of the
    /// process environment. Keys use the same upper-case names.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(environment().source(Some(vars)))
    }

    fn load(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder().add_source(env).build()?;

        let mut config: BuildConfig = settings.try_deserialize().map_err(|e| {
            CoreError::config_with_source("Failed to read configuration from environment", e)
        })?;

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        let trimmed = self.site_url.trim().trim_end_matches('/');
        if trimmed.len() != self.site_url.len() {
            tracing::debug!(site_url = %self.site_url, "trimmed trailing slash from site_url");
        }
        self.site_url = trimmed.to_string();
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site_url.is_empty() {
            return Err(CoreError::config("site_url cannot be empty"));
        }

        if self.rss_limit == 0 {
            return Err(CoreError::config("rss_limit must be at least 1"));
        }

        if self.analytics().is_none() && !self.analytics_provider.eq_ignore_ascii_case("none") {
            tracing::warn!(
                provider = %self.analytics_provider,
                "analytics provider unknown or missing analytics_id; no analytics will be emitted"
            );
        }

        Ok(())
    }

    /// Override the site URL, normalizing the trailing slash.
    pub fn set_site_url(&mut self, url: impl Into<String>) {
        self.site_url = url.into();
        self.normalize();
    }

    /// Resolve every relative path against `root`.
    #[must_use]
    pub fn rooted_at(mut self, root: &Path) -> Self {
        for path in [
            &mut self.posts_dir,
            &mut self.template_dir,
            &mut self.style_entry,
            &mut self.assets_dir,
            &mut self.output_dir,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// Get the absolute URL for a site-relative path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.site_url.clone()
        } else {
            format!("{}/{path}", self.site_url)
        }
    }

    /// Resolve the analytics selection.
    pub fn analytics(&self) -> Option<Analytics> {
        Analytics::from_parts(&self.analytics_provider, &self.analytics_id)
    }

    /// Markup embedded at `{{analytics_snippet}}`; empty when none is configured.
    pub fn analytics_snippet(&self) -> String {
        self.analytics().map(|a| a.snippet()).unwrap_or_default()
    }
}

/// A configured analytics provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analytics {
    /// Plausible, scoped to a domain.
    Plausible { domain: String },
    /// Google tag with a measurement id.
    Gtag { id: String },
}

impl Analytics {
    /// Build from the provider selector and identifier.
    ///
    /// The provider is matched case-insensitively; an empty identifier or an
    /// unknown provider yields `None`.
    pub fn from_parts(provider: &str, id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        match provider.trim().to_lowercase().as_str() {
            "plausible" => Some(Self::Plausible {
                domain: id.to_string(),
            }),
            "gtag" => Some(Self::Gtag { id: id.to_string() }),
            _ => None,
        }
    }

    /// Script markup for this provider.
    pub fn snippet(&self) -> String {
        match self {
            Self::Plausible { domain } => format!(
                r#"<script defer data-domain="{}" src="https://plausible.io/js/script.js"></script>"#,
                escape_html(domain)
            ),
            Self::Gtag { id } => {
                let id = escape_html(id);
                format!(
                    "<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n\
                     <script>window.dataLayer=window.dataLayer||[];function gtag(){{dataLayer.push(arguments);}}\n\
                     gtag('js',new Date());gtag('config','{id}');</script>"
                )
            }
        }
    }
}
