//! Markdown renderer using pulldown-cmark.

use std::sync::LazyLock;

use blogsmith_core::escape_html;
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream,
    html,
};
use regex::Regex;

use crate::{slug::AnchorIds, syntax::SyntaxHighlighter};

/// Bare URLs and email addresses turned into links.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?:https?://|www\.)[^\s<>"]+|\b[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}\b"#,
    )
    .expect("Invalid regex pattern for bare links")
});

/// Characters dropped from the end of a detected URL. Closing brackets are
/// handled by [`trim_url`].
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '"'];

/// Markdown to HTML renderer.
///
/// Adds highlighted code blocks, heading anchors with a permalink, linkified
/// bare URLs, and typographic quotes on top of CommonMark.
#[derive(Debug)]
pub struct MarkdownRenderer {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with the default theme.
    pub fn new() -> Self {
        Self::with_highlighter(SyntaxHighlighter::default())
    }

    /// Create a renderer with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        let mut highlighter = SyntaxHighlighter::default();
        highlighter.set_theme(theme);
        Self::with_highlighter(highlighter)
    }

    fn with_highlighter(highlighter: SyntaxHighlighter) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self {
            highlighter,
            options,
        }
    }

    /// The highlighter used for code blocks.
    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    /// Render a markdown body to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let parser = TextMergeStream::new(Parser::new_ext(markdown, self.options));

        let mut events: Vec<Event<'_>> = Vec::new();
        let mut anchors = AnchorIds::new();
        let mut heading: Option<HeadingBuffer<'_>> = None;
        let mut code: Option<CodeBuffer> = None;
        let mut link_depth = 0usize;

        for event in parser {
            if let Some(block) = code.as_mut() {
                match event {
                    Event::Text(text) => block.content.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some(block) = code.take() {
                            let highlighted = self
                                .highlighter
                                .highlight(&block.content, block.lang.as_deref());
                            events.push(Event::Html(highlighted.into()));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code = Some(CodeBuffer {
                        lang: fence_language(&kind),
                        content: String::new(),
                    });
                }

                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some(HeadingBuffer::new(level));
                }

                Event::End(TagEnd::Heading(_)) => {
                    if let Some(buffer) = heading.take() {
                        let id = anchors.next(&buffer.text);
                        events.push(Event::Html(buffer.into_html(&id).into()));
                    }
                }

                Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                    link_depth += 1;
                    emit(&mut events, &mut heading, Event::Start(tag));
                }

                Event::End(tag @ (TagEnd::Link | TagEnd::Image)) => {
                    link_depth = link_depth.saturating_sub(1);
                    emit(&mut events, &mut heading, Event::End(tag));
                }

                Event::InlineHtml(raw) => {
                    match html_anchor(&raw) {
                        Some(true) => link_depth += 1,
                        Some(false) => link_depth = link_depth.saturating_sub(1),
                        None => {}
                    }
                    emit(&mut events, &mut heading, Event::InlineHtml(raw));
                }

                Event::Text(text) => {
                    if let Some(buffer) = heading.as_mut() {
                        buffer.text.push_str(&text);
                    }
                    if link_depth == 0 {
                        for linked in self.linkify(text) {
                            emit(&mut events, &mut heading, linked);
                        }
                    } else {
                        emit(&mut events, &mut heading, Event::Text(text));
                    }
                }

                Event::Code(inline) => {
                    if let Some(buffer) = heading.as_mut() {
                        buffer.text.push_str(&inline);
                    }
                    emit(&mut events, &mut heading, Event::Code(inline));
                }

                other => emit(&mut events, &mut heading, other),
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }

    /// Split text around bare URLs and emails, turning each into a link.
    fn linkify<'a>(&self, text: CowStr<'a>) -> Vec<Event<'a>> {
        if !LINK_PATTERN.is_match(&text) {
            return vec![Event::Text(text)];
        }

        let mut out = Vec::new();
        let mut last = 0;

        for m in LINK_PATTERN.find_iter(&text) {
            let url = trim_url(m.as_str());
            if url.len() <= "www.".len() {
                continue;
            }

            let start = m.start();
            if start > last {
                out.push(Event::Text(text[last..start].to_string().into()));
            }

            let href = if url.starts_with("www.") {
                format!("http://{url}")
            } else if !url.contains("://") {
                format!("mailto:{url}")
            } else {
                url.to_string()
            };
            out.push(Event::InlineHtml(
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape_html(&href),
                    escape_html(url)
                )
                .into(),
            ));

            last = start + url.len();
        }

        if last < text.len() {
            out.push(Event::Text(text[last..].to_string().into()));
        }

        out
    }
}

/// Strip trailing punctuation from a detected URL. A closing `)` or `]` is
/// kept while it balances an opening one inside the URL.
fn trim_url(mut url: &str) -> &str {
    while let Some(last) = url.chars().next_back() {
        let strip = match last {
            ')' => url.matches(')').count() > url.matches('(').count(),
            ']' => url.matches(']').count() > url.matches('[').count(),
            c => TRAILING_PUNCTUATION.contains(&c),
        };
        if !strip {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

/// `Some(true)` for a raw `<a …>` open tag, `Some(false)` for `</a>`.
fn html_anchor(raw: &str) -> Option<bool> {
    let tag = raw.trim_start().to_ascii_lowercase();
    let (open, name) = match tag.strip_prefix("</") {
        Some(rest) => (false, rest),
        None => (true, tag.strip_prefix('<')?),
    };
    let rest = name.strip_prefix('a')?;
    match rest.chars().next() {
        Some(c) if c == '>' || c.is_ascii_whitespace() => Some(open),
        _ => None,
    }
}

/// Language token of a fenced block: the first word of its info string.
fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

fn emit<'a>(
    events: &mut Vec<Event<'a>>,
    heading: &mut Option<HeadingBuffer<'a>>,
    event: Event<'a>,
) {
    match heading {
        Some(buffer) => buffer.events.push(event),
        None => events.push(event),
    }
}

struct CodeBuffer {
    lang: Option<String>,
    content: String,
}

/// Inline events of a heading, held until its text is known.
struct HeadingBuffer<'a> {
    level: HeadingLevel,
    text: String,
    events: Vec<Event<'a>>,
}

impl<'a> HeadingBuffer<'a> {
    fn new(level: HeadingLevel) -> Self {
        Self {
            level,
            text: String::new(),
            events: Vec::new(),
        }
    }

    fn into_html(self, id: &str) -> String {
        let lvl = self.level as u8;
        let mut inner = String::new();
        html::push_html(&mut inner, self.events.into_iter());

        format!(
            "<h{lvl} id=\"{id}\" tabindex=\"-1\">{inner} \
             <a class=\"header-anchor\" href=\"#{id}\" aria-hidden=\"true\">#</a></h{lvl}>\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(md: &str) -> String {
        MarkdownRenderer::new().render(md)
    }

    #[test]
    fn test_render_paragraph() {
        assert_eq!(render("Hello *world*"), "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn test_heading_anchor() {
        let html = render("## Hello, World!");
        assert_eq!(
            html,
            "<h2 id=\"hello-world\" tabindex=\"-1\">Hello, World! \
             <a class=\"header-anchor\" href=\"#hello-world\" aria-hidden=\"true\">#</a></h2>\n"
        );
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let html = render("# Using `cargo` *well*");
        assert!(html.contains("id=\"using-cargo-well\""));
        assert!(html.contains("<code>cargo</code>"));
        assert!(html.contains("<em>well</em>"));
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let html = render("# Setup\n\n# Setup\n");
        assert!(html.contains("id=\"setup\""));
        assert!(html.contains("id=\"setup-1\""));
    }

    #[test]
    fn test_code_block_highlighted() {
        let html = render("```rust\nfn main() {}\n```\n");
        assert!(html.starts_with("<pre class=\"hljs\"><code>"));
        assert!(html.contains("<span class=\"hl-"));
    }

    #[test]
    fn test_code_block_unknown_language() {
        let html = render("```nosuchlang\n<b>x</b>\n```\n");
        assert_eq!(
            html,
            "<pre class=\"hljs\"><code>&lt;b&gt;x&lt;/b&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let html = render("```\na & b\n```\n");
        assert_eq!(html, "<pre class=\"hljs\"><code>a &amp; b\n</code></pre>\n");
    }

    #[test]
    fn test_raw_html_passthrough() {
        let html = render("<div class=\"note\">raw</div>\n\ntext <kbd>Ctrl</kbd>");
        assert!(html.contains("<div class=\"note\">raw</div>"));
        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn test_linkify() {
        let html = render("See https://example.com/docs. Or www.rust-lang.org!");
        assert!(html.contains("<a href=\"https://example.com/docs\">https://example.com/docs</a>."));
        assert!(html.contains("<a href=\"http://www.rust-lang.org\">www.rust-lang.org</a>!"));
    }

    #[test]
    fn test_linkify_skips_existing_links_and_code() {
        let html = render("[site](https://example.com) and `https://inline.code`");
        assert_eq!(html.matches("<a href").count(), 1);
        assert!(html.contains("<code>https://inline.code</code>"));
    }

    #[test]
    fn test_linkify_url_with_underscore() {
        let html = render("https://example.com/a_b_c");
        assert!(html.contains("<a href=\"https://example.com/a_b_c\">"));
    }

    #[test]
    fn test_linkify_skips_raw_html_anchor() {
        let html = render("Go <a href=\"https://x.com\">https://x.com</a> now https://y.com");
        assert_eq!(html.matches("<a href").count(), 2);
        assert!(html.contains("<a href=\"https://x.com\">https://x.com</a> now"));
        assert!(html.contains("<a href=\"https://y.com\">https://y.com</a>"));
    }

    #[test]
    fn test_linkify_keeps_balanced_parentheses() {
        let html = render("See https://en.wikipedia.org/wiki/Rust_(programming_language).");
        assert!(html.contains(
            "<a href=\"https://en.wikipedia.org/wiki/Rust_(programming_language)\">\
             https://en.wikipedia.org/wiki/Rust_(programming_language)</a>."
        ));
    }

    #[test]
    fn test_linkify_drops_unbalanced_parenthesis() {
        let html = render("(see https://example.com/docs)");
        assert!(html.contains("<a href=\"https://example.com/docs\">https://example.com/docs</a>)"));
    }

    #[test]
    fn test_linkify_email() {
        let html = render("Mail ada@example.org.");
        assert!(html.contains("<a href=\"mailto:ada@example.org\">ada@example.org</a>."));
    }

    #[test]
    fn test_html_anchor_detection() {
        assert_eq!(html_anchor("<a href=\"x\">"), Some(true));
        assert_eq!(html_anchor("<A>"), Some(true));
        assert_eq!(html_anchor("</a>"), Some(false));
        assert_eq!(html_anchor("<abbr>"), None);
        assert_eq!(html_anchor("<b>"), None);
    }

    #[test]
    fn test_smart_punctuation() {
        let html = render("\"quoted\" and it's");
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{201d}'));
        assert!(html.contains('\u{2019}'));
    }

    #[test]
    fn test_table_rendering() {
        let html = render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_task_list() {
        let html = render("- [x] Done\n- [ ] Not done");
        assert!(html.contains("checkbox"));
        assert!(html.contains("checked"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
