//! blogsmith parser library
//!
//! Markdown rendering with syntax-highlighted code blocks, heading anchors,
//! and reading-time estimation.

pub mod markdown;
pub mod slug;
pub mod syntax;

use blogsmith_core::Document;
pub use markdown::MarkdownRenderer;
pub use slug::{AnchorIds, slugify};
pub use syntax::{SyntaxError, SyntaxHighlighter};

/// Average reading speed used for estimates.
pub const WORDS_PER_MINUTE: f64 = 230.0;

/// Estimated reading time in whole minutes, never less than one.
pub fn reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    let minutes = (words as f64 / WORDS_PER_MINUTE).round() as u32;
    minutes.max(1)
}

/// A document body rendered to HTML.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Rendered HTML body.
    pub html: String,

    /// Reading time in minutes.
    pub reading_time: u32,
}

impl MarkdownRenderer {
    /// Render a document body and estimate its reading time.
    pub fn render_document(&self, doc: &Document) -> RenderedDocument {
        RenderedDocument {
            html: self.render(&doc.body),
            reading_time: reading_time(&doc.body),
        }
    }
}
