//! Sitemap generation.

use blogsmith_core::{BuildConfig, Document, escape_html};
use chrono::{DateTime, Utc};
use tracing::debug;

/// A sitemap URL entry.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    /// Absolute URL.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: BuildConfig,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Entries for the site root, the blog index, and every document in order.
    pub fn urls(&self, docs: &[Document]) -> Vec<SitemapUrl> {
        let mut urls = vec![
            SitemapUrl {
                loc: self.config.site_url.clone(),
                lastmod: None,
                priority: 1.0,
            },
            SitemapUrl {
                loc: self.config.url_for("/blog"),
                lastmod: None,
                priority: 0.8,
            },
        ];

        urls.extend(docs.iter().map(|doc| SitemapUrl {
            loc: self.config.url_for(&doc.url_path()),
            lastmod: Some(doc.date),
            priority: 0.6,
        }));

        urls
    }

    /// Generate sitemap XML.
    pub fn generate(&self, docs: &[Document]) -> String {
        let urls = self.urls(docs);
        debug!(count = urls.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in &urls {
            xml.push_str(&url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");

    xml.push_str(&format!("    <loc>{}</loc>\n", escape_html(&url.loc)));

    if let Some(lastmod) = &url.lastmod {
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.format("%Y-%m-%d")
        ));
    }

    xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
    xml.push_str("  </url>\n");
    xml
}
