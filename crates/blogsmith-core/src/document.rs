//! Blog post documents.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    error::{CoreError, Result},
    frontmatter::{Frontmatter, parse_frontmatter},
};

/// Type of post source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Markdown content (.md and .markdown files).
    Markdown,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Determine content type from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// A single blog post loaded from disk.
#[derive(Debug, Clone)]
pub struct Document {
    /// File stem, used in URLs and output directory names.
    pub slug: String,

    /// Post title.
    pub title: String,

    /// Optional summary.
    pub description: Option<String>,

    /// Optional author name.
    pub author: Option<String>,

    /// Publication date.
    pub date: DateTime<Utc>,

    /// Tags in front matter order.
    pub tags: Vec<String>,

    /// Optional site-relative image path.
    pub image: Option<String>,

    /// Whether this is a draft.
    pub draft: bool,

    /// Raw markdown body.
    pub body: String,

    /// File this document was read from.
    pub source: PathBuf,
}

impl Document {
    /// Parse a document from the contents of `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::malformed(path, "file name is not valid UTF-8"))?
            .to_string();

        let (fm, body) = parse_frontmatter(content, path)?;
        Self::from_frontmatter(slug, fm, body, path)
    }

    /// Validate front matter and assemble a document.
    pub fn from_frontmatter(
        slug: String,
        fm: Frontmatter,
        body: String,
        path: &Path,
    ) -> Result<Self> {
        let title = fm
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CoreError::missing_field(path, "title"))?;

        let raw_date = fm
            .date
            .ok_or_else(|| CoreError::missing_field(path, "date"))?;
        let date = parse_date(&raw_date).ok_or_else(|| CoreError::invalid_date(path, &raw_date))?;

        Ok(Self {
            slug,
            title,
            description: non_empty(fm.description),
            author: non_empty(fm.author),
            date,
            tags: fm.tags.unwrap_or_default(),
            image: non_empty(fm.image),
            draft: fm.draft,
            body,
            source: path.to_path_buf(),
        })
    }

    /// Site-relative URL of this post.
    pub fn url_path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Date as `YYYY-MM-DD`.
    pub fn date_iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Date as `January 5, 2024`.
    pub fn date_formatted(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Date in RFC 1123 form with a `GMT` zone, as used by RSS.
    pub fn date_rfc1123(&self) -> String {
        self.date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }
}

/// Parse a front matter date.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339 timestamps, and naive
/// timestamps which are taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn doc(content: &str) -> Result<Document> {
        Document::parse(content, Path::new("posts/hello-world.md"))
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            ContentType::from_extension("md"),
            Some(ContentType::Markdown)
        );
        assert_eq!(
            ContentType::from_extension("MARKDOWN"),
            Some(ContentType::Markdown)
        );
        assert_eq!(ContentType::from_extension("txt"), None);
        assert_eq!(
            ContentType::from_path(Path::new("a/b.md")),
            Some(ContentType::Markdown)
        );
        assert_eq!(ContentType::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_parse_document() {
        let d = doc("---\ntitle: Hello\ndate: 2024-01-05\ntags: [a, b]\n---\nBody text")
            .expect("parse");

        assert_eq!(d.slug, "hello-world");
        assert_eq!(d.title, "Hello");
        assert_eq!(d.tags, vec!["a", "b"]);
        assert_eq!(d.body, "Body text");
        assert_eq!(d.url_path(), "/blog/hello-world");
        assert_eq!(d.date_iso(), "2024-01-05");
        assert_eq!(d.date_formatted(), "January 5, 2024");
        assert_eq!(d.date_rfc1123(), "Fri, 05 Jan 2024 00:00:00 GMT");
        assert!(d.description.is_none());
        assert!(d.author.is_none());
        assert!(!d.draft);
    }

    #[test]
    fn test_empty_optional_fields_are_none() {
        let d = doc("---\ntitle: T\ndate: 2024-01-05\ndescription: ''\nimage:\n---\n").expect("parse");
        assert!(d.description.is_none());
        assert!(d.image.is_none());
    }

    #[test]
    fn test_missing_title() {
        let err = doc("---\ndate: 2024-01-05\n---\nBody").unwrap_err();
        assert!(matches!(err, CoreError::MissingField { field: "title", .. }));
    }

    #[test]
    fn test_missing_date() {
        let err = doc("---\ntitle: T\n---\nBody").unwrap_err();
        assert!(matches!(err, CoreError::MissingField { field: "date", .. }));
    }

    #[test]
    fn test_invalid_date() {
        let err = doc("---\ntitle: T\ndate: 2024-02-30\n---\nBody").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { .. }));
    }

    #[test]
    fn test_parse_date_forms() {
        let d = parse_date("2024-03-09").expect("date");
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2024, 3, 9, 0));

        let d = parse_date("2024-03-09T10:30:00Z").expect("rfc3339");
        assert_eq!(d.hour(), 10);

        let d = parse_date("2024-03-09T23:30:00-02:00").expect("offset");
        assert_eq!((d.day(), d.hour()), (10, 1));

        let d = parse_date("2024-03-09 08:15:00").expect("naive");
        assert_eq!(d.minute(), 15);

        assert!(parse_date("March 9").is_none());
        assert!(parse_date("").is_none());
    }
}
