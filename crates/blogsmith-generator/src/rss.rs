//! RSS feed generation.
//!
//! Generates an RSS 2.0 feed of the newest posts with an Atom self link.
//! No build timestamp is written, so identical input gives identical bytes.

use std::collections::BTreeMap;

use blogsmith_core::{BuildConfig, Document};
use rss::{
    ChannelBuilder, GuidBuilder, Item, ItemBuilder,
    extension::atom::{self, AtomExtensionBuilder, Link},
};
use thiserror::Error;
use tracing::debug;

/// Site-relative location of the feed.
pub const FEED_PATH: &str = "/blog/rss.xml";

/// RSS generation errors.
#[derive(Debug, Error)]
pub enum RssError {
    /// Serializing the channel failed.
    #[error("RSS write error: {0}")]
    Write(#[from] rss::Error),

    /// The serialized feed was not UTF-8.
    #[error("RSS encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for RSS operations.
pub type Result<T> = std::result::Result<T, RssError>;

/// RSS feed generator.
#[derive(Debug)]
pub struct RssGenerator {
    config: BuildConfig,
}

impl RssGenerator {
    /// Create a new RSS generator.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Generate feed XML from documents sorted newest first.
    ///
    /// Only the first `rss_limit` documents are included.
    pub fn generate(&self, docs: &[Document]) -> Result<String> {
        let limit = self.config.rss_limit;
        let items: Vec<Item> = docs.iter().take(limit).map(|d| self.item(d)).collect();

        debug!(count = items.len(), limit, "generating RSS feed");

        let mut self_link = Link::default();
        self_link.set_href(self.config.url_for(FEED_PATH));
        self_link.set_rel("self");
        self_link.set_mime_type(Some("application/rss+xml".to_string()));

        let namespaces = BTreeMap::from([("atom".to_string(), atom::NAMESPACE.to_string())]);

        let channel = ChannelBuilder::default()
            .namespaces(namespaces)
            .title(&self.config.feed_title)
            .link(self.config.url_for("/blog"))
            .description(&self.config.feed_description)
            .language(Some(self.config.feed_language.clone()))
            .atom_ext(Some(
                AtomExtensionBuilder::default()
                    .links(vec![self_link])
                    .build(),
            ))
            .items(items)
            .build();

        let bytes = channel.write_to(Vec::new())?;
        Ok(String::from_utf8(bytes)?)
    }

    fn item(&self, doc: &Document) -> Item {
        let url = self.config.url_for(&doc.url_path());
        let guid = GuidBuilder::default().value(&url).permalink(true).build();

        ItemBuilder::default()
            .title(Some(doc.title.clone()))
            .link(Some(url))
            .guid(Some(guid))
            .pub_date(Some(doc.date_rfc1123()))
            .description(Some(doc.description.clone().unwrap_or_default()))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn test_config() -> BuildConfig {
        BuildConfig {
            site_url: "https://example.com".to_string(),
            feed_title: "Test Blog".to_string(),
            feed_description: "A test blog".to_string(),
            ..BuildConfig::default()
        }
    }

    fn test_doc(slug: &str, title: &str, date: &str, description: Option<&str>) -> Document {
        let description = description
            .map(|d| format!("description: {d}\n"))
            .unwrap_or_default();
        Document::parse(
            &format!("---\ntitle: {title}\ndate: {date}\n{description}---\nBody"),
            Path::new(&format!("{slug}.md")),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_rss() {
        let generator = RssGenerator::new(test_config());
        let docs = vec![
            test_doc("second", "Second Post", "2025-01-14", Some("Newer")),
            test_doc("first", "First Post", "2024-06-01", None),
        ];

        let xml = generator.generate(&docs).unwrap();

        assert!(xml.contains("<title>Test Blog</title>"));
        assert!(xml.contains("<link>https://example.com/blog</link>"));
        assert!(xml.contains("<description>A test blog</description>"));
        assert!(xml.contains("<language>en-us</language>"));
        assert!(xml.contains("xmlns:atom=\"http://www.w3.org/2005/Atom\""));
        assert!(xml.contains("href=\"https://example.com/blog/rss.xml\""));
        assert!(xml.contains("rel=\"self\""));
        assert!(xml.contains("<link>https://example.com/blog/second</link>"));
        assert!(xml.contains("<pubDate>Tue, 14 Jan 2025 00:00:00 GMT</pubDate>"));
        assert!(xml.contains("<description>Newer</description>"));
        assert!(!xml.contains("lastBuildDate"));
        assert!(xml.find("Second Post").unwrap() < xml.find("First Post").unwrap());
    }

    #[test]
    fn test_rss_limit() {
        let config = BuildConfig {
            rss_limit: 1,
            ..test_config()
        };
        let generator = RssGenerator::new(config);
        let docs = vec![
            test_doc("a", "First Post", "2025-01-02", None),
            test_doc("b", "Second Post", "2025-01-01", None),
        ];

        let xml = generator.generate(&docs).unwrap();

        assert!(xml.contains("First Post"));
        assert!(!xml.contains("Second Post"));
    }

    #[test]
    fn test_item_fields() {
        let generator = RssGenerator::new(test_config());
        let item = generator.item(&test_doc("test-post", "Test Post", "2024-01-05", None));

        assert_eq!(item.title(), Some("Test Post"));
        assert_eq!(item.link(), Some("https://example.com/blog/test-post"));
        assert_eq!(
            item.guid().map(|g| g.value()),
            Some("https://example.com/blog/test-post")
        );
        assert_eq!(item.description(), Some(""));
    }

    #[test]
    fn test_title_is_escaped() {
        let generator = RssGenerator::new(test_config());
        let xml = generator
            .generate(&[test_doc("x", "A & B <script>", "2024-01-05", None)])
            .unwrap();

        assert!(xml.contains("A &amp; B &lt;script&gt;"));
    }

    #[test]
    fn test_empty_feed() {
        let generator = RssGenerator::new(test_config());
        let xml = generator.generate(&[]).unwrap();

        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }
}
