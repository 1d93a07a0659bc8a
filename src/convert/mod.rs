//! HTML to Markdown conversion
//!
//! Converts the content region of a page into Markdown. Element rendering is
//! rule driven: site rules (heading promotion, code-span delinking, link
//! rewriting) come first, then the standard CommonMark and table rules, then a
//! fallback that keeps the content of unknown elements.
//!
//! # Example
//!
//! ```
//! use doc_mirror::convert::{MarkdownConverter, MarkdownOptions};
//! use doc_mirror::url::Pathname;
//! use url::Url;
//!
//! let converter = MarkdownConverter::new(
//!     Url::parse("https://valibot.dev").unwrap(),
//!     MarkdownOptions::default(),
//! );
//! let page = Pathname::parse("/guides/bar/").unwrap();
//!
//! let markdown = converter.convert(r#"<p>See <a href="/api/foo/">foo</a>.</p>"#, &page);
//! assert_eq!(markdown, "See [foo](../api/foo.md).");
//! ```

mod rules;
mod standard;
mod text;

pub use rules::Rule;

use crate::url::{page_url, Pathname};
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Heading syntax for levels 1 and 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// Underlined with `=` or `-`
    Setext,
    /// Prefixed with `#`
    Atx,
}

/// Code block syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeBlockStyle {
    Indented,
    Fenced,
}

/// Markdown output options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    #[serde(rename = "heading-style")]
    pub heading_style: HeadingStyle,

    #[serde(rename = "code-block-style")]
    pub code_block_style: CodeBlockStyle,

    /// One of `*`, `-`, `+`
    #[serde(rename = "bullet-marker")]
    pub bullet_marker: String,

    #[serde(rename = "em-delimiter")]
    pub em_delimiter: String,

    #[serde(rename = "strong-delimiter")]
    pub strong_delimiter: String,

    #[serde(rename = "horizontal-rule")]
    pub horizontal_rule: String,

    /// Emitted before the newline of a `br`
    #[serde(rename = "line-break")]
    pub line_break: String,

    /// Opening and closing fence of fenced code blocks
    pub fence: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            code_block_style: CodeBlockStyle::Indented,
            bullet_marker: "*".to_string(),
            em_delimiter: "_".to_string(),
            strong_delimiter: "**".to_string(),
            horizontal_rule: "* * *".to_string(),
            line_break: "  ".to_string(),
            fence: "```".to_string(),
        }
    }
}

/// Per-page state visible to every rule
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Pathname of the page being converted
    pub pathname: &'a Pathname,
    /// Absolute URL of the page, the base for relative hrefs
    pub page_url: &'a Url,
    pub site_root: &'a Url,
    pub options: &'a MarkdownOptions,
    /// True below a `code` element, where text is not escaped
    pub in_code: bool,
}

/// Rule-driven HTML to Markdown converter for one site
pub struct MarkdownConverter {
    site_root: Url,
    options: MarkdownOptions,
    rules: Vec<Box<dyn Rule>>,
}

impl MarkdownConverter {
    pub fn new(site_root: Url, options: MarkdownOptions) -> Self {
        let mut rules = rules::site_rules();
        rules.extend(standard::standard_rules());

        Self {
            site_root,
            options,
            rules,
        }
    }

    /// Names of the active rules, highest priority first
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Converts an HTML fragment from the page at `pathname` into Markdown
    ///
    /// Never fails: unknown elements fall back to their content and
    /// unresolvable hrefs are kept as written.
    pub fn convert(&self, html: &str, pathname: &Pathname) -> String {
        let page_url = page_url(&self.site_root, pathname).unwrap_or_else(|e| {
            tracing::debug!("Cannot build URL for {}: {}", pathname, e);
            self.site_root.clone()
        });

        let fragment = Html::parse_fragment(html);
        let root = fragment.root_element();

        let renderer = Renderer {
            rules: &self.rules,
            texts: text::collapse_whitespace(*root),
        };
        let ctx = RenderContext {
            pathname,
            page_url: &page_url,
            site_root: &self.site_root,
            options: &self.options,
            in_code: false,
        };

        let markdown = renderer.render_children(*root, &ctx);
        markdown
            .trim_start_matches(['\t', '\r', '\n'])
            .trim_end()
            .to_string()
    }
}

/// Converts with default options
pub fn convert(html: &str, pathname: &Pathname, site_root: &Url) -> String {
    MarkdownConverter::new(site_root.clone(), MarkdownOptions::default()).convert(html, pathname)
}

struct Renderer<'r> {
    rules: &'r [Box<dyn Rule>],
    texts: HashMap<NodeId, String>,
}

impl Renderer<'_> {
    fn render_children(&self, parent: NodeRef<'_, Node>, ctx: &RenderContext<'_>) -> String {
        let mut output = String::new();

        for child in parent.children() {
            let replacement = match child.value() {
                Node::Text(raw) => match self.texts.get(&child.id()) {
                    Some(collapsed) if ctx.in_code => collapsed.clone(),
                    Some(collapsed) => text::escape_markdown(collapsed),
                    None => raw.to_string(),
                },
                Node::Element(_) => ElementRef::wrap(child)
                    .map(|element| self.render_element(element, ctx))
                    .unwrap_or_default(),
                _ => String::new(),
            };

            output = text::join(&output, &replacement);
        }

        output
    }

    fn render_element(&self, element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        let name = element.value().name();
        if text::is_silent(name) {
            return String::new();
        }

        let block = text::is_block(name);
        if text::is_blank(element) {
            return if block { "\n\n".to_string() } else { String::new() };
        }

        let inner_ctx = RenderContext {
            in_code: ctx.in_code || name == "code",
            ..*ctx
        };
        let mut content = self.render_children(*element, &inner_ctx);

        // Inline elements move their edge spaces outside the markup
        let (mut leading, mut trailing) = ("", "");
        if !block {
            if content.starts_with(' ') {
                leading = " ";
            }
            if content.ends_with(' ') {
                trailing = " ";
            }
            if !leading.is_empty() || !trailing.is_empty() {
                content = content.trim().to_string();
            }
        }

        let replacement = match self.rules.iter().find(|rule| rule.applies(element, ctx)) {
            Some(rule) => rule.replace(&content, element, ctx),
            None if block => format!("\n\n{}\n\n", content),
            None => content,
        };

        format!("{}{}{}", leading, replacement, trailing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("https://valibot.dev").unwrap()
    }

    fn p(s: &str) -> Pathname {
        Pathname::parse(s).unwrap()
    }

    fn md(html: &str) -> String {
        convert(html, &p("/guides/bar/"), &root())
    }

    fn md_with(html: &str, options: MarkdownOptions) -> String {
        MarkdownConverter::new(root(), options).convert(html, &p("/guides/bar/"))
    }

    #[test]
    fn test_h1_becomes_setext_level_two() {
        assert_eq!(md("<h1>Title</h1>"), "Title\n-----");
    }

    #[test]
    fn test_h1_atx_style() {
        let options = MarkdownOptions {
            heading_style: HeadingStyle::Atx,
            ..MarkdownOptions::default()
        };
        assert_eq!(md_with("<h1>Title</h1>", options), "## Title");
    }

    #[test]
    fn test_deeper_headings_promoted() {
        assert_eq!(md("<h2>Usage</h2>"), "### Usage");
        assert_eq!(md("<h3>Options</h3>"), "#### Options");
        assert_eq!(md("<h6>Deep</h6>"), "###### Deep");
    }

    #[test]
    fn test_same_origin_link_rewritten() {
        assert_eq!(
            md(r#"<p><a href="/api/foo/">foo</a></p>"#),
            "[foo](../api/foo.md)"
        );
    }

    #[test]
    fn test_relative_href_resolved_against_page() {
        assert_eq!(
            md(r#"<a href="../installation/">Install</a>"#),
            "[Install](installation.md)"
        );
    }

    #[test]
    fn test_link_to_capitalized_page_uses_marker() {
        assert_eq!(
            md(r#"<a href="/api/ValiError/">ValiError</a>"#),
            "[ValiError](../api/_ValiError.md)"
        );
    }

    #[test]
    fn test_link_keeps_fragment() {
        assert_eq!(
            md(r#"<a href="/api/pipe/#usage">usage</a>"#),
            "[usage](../api/pipe.md#usage)"
        );
    }

    #[test]
    fn test_external_link_kept() {
        assert_eq!(
            md(r#"<a href="https://github.com/fabian-hiller/valibot">GitHub</a>"#),
            "[GitHub](https://github.com/fabian-hiller/valibot)"
        );
    }

    #[test]
    fn test_link_parentheses_escaped() {
        assert_eq!(
            md(r#"<a href="https://en.wikipedia.org/wiki/Rust_(language)">Rust</a>"#),
            r"[Rust](https://en.wikipedia.org/wiki/Rust_\(language\))"
        );
    }

    #[test]
    fn test_link_title() {
        assert_eq!(
            md("<a href=\"https://example.com/\" title=\"Say &quot;hi&quot;\n   there\">x</a>"),
            "[x](https://example.com/ \"Say \\\"hi\\\"\nthere\")"
        );
    }

    #[test]
    fn test_link_inside_code_is_plain() {
        assert_eq!(
            md(r#"<p>Use <code><a href="/api/pipe/">pipe</a>(schema)</code>.</p>"#),
            "Use `pipe(schema)`."
        );
    }

    #[test]
    fn test_anchor_without_href_keeps_text() {
        assert_eq!(md("<p><a>plain</a></p>"), "plain");
    }

    #[test]
    fn test_paragraphs_and_emphasis() {
        assert_eq!(
            md("<p>One <strong>two</strong></p>\n<p><em>three</em> four</p>"),
            "One **two**\n\n_three_ four"
        );
    }

    #[test]
    fn test_flanking_whitespace_moves_outside() {
        assert_eq!(md("<p>a<em> b </em>c</p>"), "a _b_ c");
    }

    #[test]
    fn test_text_escaped() {
        assert_eq!(md("<p>snake_case *star*</p>"), r"snake\_case \*star\*");
    }

    #[test]
    fn test_inline_code_not_escaped() {
        assert_eq!(md("<p><code>a_b</code></p>"), "`a_b`");
        assert_eq!(md("<p><code>a`b</code></p>"), "``a`b``");
    }

    #[test]
    fn test_indented_code_block() {
        assert_eq!(
            md("<pre><code>const a = 1;\nconst b = 2;\n</code></pre>"),
            "    const a = 1;\n    const b = 2;"
        );
    }

    #[test]
    fn test_fenced_code_block_language() {
        let options = MarkdownOptions {
            code_block_style: CodeBlockStyle::Fenced,
            ..MarkdownOptions::default()
        };
        assert_eq!(
            md_with(
                r#"<pre><code class="language-ts">const a = v.string();</code></pre>"#,
                options
            ),
            "```ts\nconst a = v.string();\n```"
        );
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            md("<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>"),
            "*   one\n*   two"
        );
    }

    #[test]
    fn test_ordered_list_start() {
        assert_eq!(
            md(r#"<ol start="3"><li>c</li><li>d</li></ol>"#),
            "3.  c\n4.  d"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            md("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"),
            "*   a\n    *   b\n*   c"
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            md("<blockquote><p>one</p><p>two</p></blockquote>"),
            "> one\n> \n> two"
        );
    }

    #[test]
    fn test_table() {
        let html = "<table><thead><tr><th>Name</th><th>Type</th></tr></thead>\
                    <tbody><tr><td>a</td><td>string | number</td></tr></tbody></table>";
        assert_eq!(
            md(html),
            "| Name | Type |\n| --- | --- |\n| a | string \\| number |"
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            md(r#"<img src="/logo.svg" alt="Logo" title="Valibot">"#),
            r#"![Logo](/logo.svg "Valibot")"#
        );
    }

    #[test]
    fn test_line_break_and_rule() {
        assert_eq!(md("<p>a<br>b</p><hr>"), "a  \nb\n\n* * *");
    }

    #[test]
    fn test_scripts_dropped() {
        assert_eq!(md("<p>keep</p><script>var x = 1;</script><style>p{}</style>"), "keep");
    }

    #[test]
    fn test_unknown_elements_keep_content() {
        assert_eq!(md("<div><span>inline</span> text</div>"), "inline text");
    }

    #[test]
    fn test_blank_elements_dropped() {
        assert_eq!(md("<p>a</p><div>   </div><p>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_output_trimmed() {
        assert_eq!(md("\n\n  <p>  body  </p>\n\n"), "body");
    }

    #[test]
    fn test_rule_priority() {
        let converter = MarkdownConverter::new(root(), MarkdownOptions::default());
        let names = converter.rule_names();
        assert_eq!(&names[..3], &["heading", "code-link", "link"]);
    }
}
