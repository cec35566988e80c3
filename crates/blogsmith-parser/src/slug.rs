//! Heading anchor ids.

use std::collections::HashMap;

/// Convert heading text to an anchor id.
///
/// Lowercases, collapses every run of characters outside `[A-Za-z0-9_]` into
/// a single `-`, and trims leading and trailing `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Hands out anchor ids that are unique within one document.
///
/// The first occurrence of a slug is used as is; later ones get `-1`, `-2`, …
#[derive(Debug, Default)]
pub struct AnchorIds {
    seen: HashMap<String, usize>,
}

impl AnchorIds {
    /// Create an empty id set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id derived from `text`.
    pub fn next(&mut self, text: &str) -> String {
        self.claim(slugify(text))
    }

    fn claim(&mut self, base: String) -> String {
        if !self.seen.contains_key(&base) {
            self.seen.insert(base.clone(), 0);
            return base;
        }

        let mut n = self.seen.get(&base).copied().unwrap_or(0);
        loop {
            n += 1;
            let candidate = format!("{base}-{n}");
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(base, n);
                self.seen.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  multiple   spaces "), "multiple-spaces");
        assert_eq!(slugify("Test 123 Post"), "test-123-post");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Why Rust?"), slugify("Why Rust?"));
    }

    #[test]
    fn test_anchor_ids_deduplicate() {
        let mut ids = AnchorIds::new();
        assert_eq!(ids.next("Setup"), "setup");
        assert_eq!(ids.next("Setup"), "setup-1");
        assert_eq!(ids.next("Setup!"), "setup-2");
        assert_eq!(ids.next("Setup 1"), "setup-1-1");
        assert_eq!(ids.next("Other"), "other");
    }
}
