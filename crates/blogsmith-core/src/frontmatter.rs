//! Front matter parsing for post files.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Delimiter that opens and closes a YAML header block.
pub const DELIMITER: &str = "---";

/// Front matter metadata for a post.
///
/// Every field is optional at this level; [`crate::Document`] decides which
/// ones are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Post title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication date, kept as written and parsed by the document layer.
    #[serde(default)]
    pub date: Option<String>,

    /// Summary used in meta tags, the index, and the feed.
    #[serde(default)]
    pub description: Option<String>,

    /// Author name; the site default applies when absent.
    #[serde(default)]
    pub author: Option<String>,

    /// Tags in the order they were written.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Site-relative path of the social preview image.
    #[serde(default)]
    pub image: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Unrecognized keys.
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Split content into the raw header and the body.
///
/// The header must open on the first non-blank line with `---` and close
/// with a line containing only `---`. Returns `None` when either delimiter is
/// missing.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let header = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(|c| c == '\r' || c == '\n');
            return Some((header, body));
        }
        offset += line.len();
    }

    None
}

/// Parse the front matter of a post, returning it with the remaining body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let (header, body) = split_frontmatter(content)
        .ok_or_else(|| CoreError::malformed(path, "missing `---` front matter block"))?;

    let frontmatter: Frontmatter =
        serde_yaml::from_str(header).map_err(|e| CoreError::malformed(path, e.to_string()))?;

    Ok((frontmatter, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let content = r#"---
title: "Hello World"
date: 2024-01-14
---

This is the body content."#;

        let (fm, body) = split_frontmatter(content).expect("split");
        assert!(fm.contains("title:"));
        assert!(fm.contains("date:"));
        assert_eq!(body, "This is the body content.");
    }

    #[test]
    fn test_split_ignores_dashes_inside_lines() {
        let content = "---\ntitle: a---b\n---\nbody --- text\n";
        let (fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(fm, "title: a---b\n");
        assert_eq!(body, "body --- text\n");
    }

    #[test]
    fn test_split_crlf() {
        let content = "---\r\ntitle: x\r\n---\r\nbody";
        let (fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(fm, "title: x\r\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(split_frontmatter("Just some content without frontmatter.").is_none());
        assert!(split_frontmatter("---\ntitle: never closed\n").is_none());
        assert!(split_frontmatter("----\ntitle: x\n---\n").is_none());
    }

    #[test]
    fn test_parse_frontmatter() {
        let content = r#"---
title: "Test Post"
date: 2024-01-14
description: A post
author: Jane
image: /img/cover.png
draft: false
tags:
  - rust
  - test
---

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");

        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-14"));
        assert_eq!(fm.description.as_deref(), Some("A post"));
        assert_eq!(fm.author.as_deref(), Some("Jane"));
        assert_eq!(fm.image.as_deref(), Some("/img/cover.png"));
        assert!(!fm.draft);
        assert_eq!(fm.tags, Some(vec!["rust".to_string(), "test".to_string()]));
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_frontmatter_defaults() {
        let content = "---\ntitle: Minimal\n---\n\nBody";
        let (fm, _body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");

        assert_eq!(fm.title.as_deref(), Some("Minimal"));
        assert!(!fm.draft);
        assert!(fm.tags.is_none());
        assert!(fm.date.is_none());
        assert!(fm.image.is_none());
    }

    #[test]
    fn test_frontmatter_with_extra_fields() {
        let content = "---\ntitle: Test\ncustom_field: custom value\n---\nBody";
        let (fm, _body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");
        assert!(fm.extra.contains_key("custom_field"));
    }

    #[test]
    fn test_missing_frontmatter_is_malformed() {
        let err = parse_frontmatter("# Just a heading", Path::new("bad.md")).unwrap_err();
        assert!(matches!(err, CoreError::MalformedDocument { .. }));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_unparseable_yaml_is_malformed() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let err = parse_frontmatter(content, Path::new("bad.md")).unwrap_err();
        assert!(matches!(err, CoreError::MalformedDocument { .. }));
    }
}
