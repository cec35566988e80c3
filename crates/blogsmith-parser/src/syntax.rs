//! Syntax highlighting for fenced code blocks.

use blogsmith_core::escape_html;
use syntect::{
    highlighting::ThemeSet,
    html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};
use thiserror::Error;
use tracing::debug;

/// Class prefix for highlighted spans and the matching stylesheet.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Syntax highlighting errors.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// The configured theme is not bundled.
    #[error("unknown syntax theme: {0}")]
    UnknownTheme(String),

    /// Failed to produce highlighted output or the theme stylesheet.
    #[error("syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Syntax highlighter using syntect.
///
/// Output is class-annotated; [`SyntaxHighlighter::stylesheet`] returns the
/// CSS that colours it.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new("base16-ocean.dark")
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with the specified theme.
    pub fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme: theme.to_string(),
        }
    }

    /// Get available theme names.
    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Whether `lang` names a bundled syntax.
    pub fn is_supported(&self, lang: &str) -> bool {
        self.syntax_set.find_syntax_by_token(lang).is_some()
    }

    /// Highlight a code block.
    ///
    /// Always returns `<pre class="hljs"><code>…</code></pre>`. Unknown or
    /// absent languages, and highlighting failures, produce escaped plain
    /// text in the same wrapper.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let body = lang
            .and_then(|l| self.syntax_set.find_syntax_by_token(l))
            .and_then(|syntax| match self.classed_html(code, syntax) {
                Ok(html) => Some(html),
                Err(e) => {
                    debug!(lang = ?lang, error = %e, "highlighting failed, using plain text");
                    None
                }
            })
            .unwrap_or_else(|| escape_html(code));

        format!("<pre class=\"hljs\"><code>{body}</code></pre>\n")
    }

    fn classed_html(&self, code: &str, syntax: &SyntaxReference) -> Result<String, SyntaxError> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    /// CSS for the configured theme, matching the classes in highlighted output.
    pub fn stylesheet(&self) -> Result<String, SyntaxError> {
        let theme = self
            .theme_set
            .themes
            .get(&self.theme)
            .ok_or_else(|| SyntaxError::UnknownTheme(self.theme.clone()))?;
        Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
    }

    /// Set the theme, ignoring names that are not bundled.
    pub fn set_theme(&mut self, theme: &str) {
        if self.theme_set.themes.contains_key(theme) {
            self.theme = theme.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust() {
        let highlighter = SyntaxHighlighter::default();
        let code = "fn main() {\n    println!(\"Hello\");\n}\n";
        let html = highlighter.highlight(code, Some("rust"));

        assert!(html.starts_with("<pre class=\"hljs\"><code>"));
        assert!(html.contains("<span class=\"hl-"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_unknown_language() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("a < b && c", Some("unknown_lang_xyz"));

        assert_eq!(
            html,
            "<pre class=\"hljs\"><code>a &lt; b &amp;&amp; c</code></pre>\n"
        );
    }

    #[test]
    fn test_highlight_no_language() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("plain <text>", None);

        assert_eq!(
            html,
            "<pre class=\"hljs\"><code>plain &lt;text&gt;</code></pre>\n"
        );
    }

    #[test]
    fn test_highlight_escapes_recognized_code() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("<div>&</div>\n", Some("html"));

        assert!(!html.contains("<div>"));
        assert!(html.contains("&lt;"));
    }

    #[test]
    fn test_is_supported() {
        let highlighter = SyntaxHighlighter::default();
        assert!(highlighter.is_supported("rust"));
        assert!(highlighter.is_supported("py"));
        assert!(!highlighter.is_supported("unknown_lang_xyz"));
    }

    #[test]
    fn test_stylesheet() {
        let highlighter = SyntaxHighlighter::default();
        let css = highlighter.stylesheet().expect("css");
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_stylesheet_unknown_theme() {
        let highlighter = SyntaxHighlighter::new("no-such-theme");
        assert!(matches!(
            highlighter.stylesheet(),
            Err(SyntaxError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_available_themes() {
        let highlighter = SyntaxHighlighter::default();
        let themes = highlighter.available_themes();

        assert!(!themes.is_empty());
        assert!(themes.contains(&"base16-ocean.dark"));
    }
}
