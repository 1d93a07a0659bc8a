//! Element classification, whitespace collapsing and Markdown escaping

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Node};
use std::collections::HashMap;

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas", "center", "dd", "dir",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "frameset", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu", "nav",
    "noframes", "noscript", "ol", "output", "p", "pre", "section", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

const MEANINGFUL_WHEN_BLANK: &[&str] = &[
    "a", "table", "thead", "tbody", "tfoot", "th", "td", "iframe", "script", "audio", "video",
];

/// Elements whose content never reaches the Markdown output
const SILENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

pub fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

pub fn is_silent(name: &str) -> bool {
    SILENT_ELEMENTS.contains(&name)
}

/// An element with nothing to render: whitespace-only text and no void or
/// meaningful-when-blank descendants
pub fn is_blank(element: ElementRef<'_>) -> bool {
    let name = element.value().name();
    if is_void(name) || MEANINGFUL_WHEN_BLANK.contains(&name) {
        return false;
    }

    if !element.text().all(|t| t.trim().is_empty()) {
        return false;
    }

    !element.descendants().skip(1).any(|node| {
        node.value().as_element().is_some_and(|e| {
            let name = e.name();
            is_void(name) || MEANINGFUL_WHEN_BLANK.contains(&name)
        })
    })
}

/// Collapses HTML whitespace the way a browser lays out inline text
///
/// Runs of whitespace become one space, whitespace at block boundaries is
/// dropped, and `pre` content is left untouched (its text nodes get no entry).
/// Returns the collapsed text for every visited text node.
pub fn collapse_whitespace(root: NodeRef<'_, Node>) -> HashMap<NodeId, String> {
    let mut collapser = Collapser {
        texts: HashMap::new(),
        prev_space: true,
        last_text: None,
    };
    collapser.walk(root);
    collapser.boundary();
    collapser.texts
}

struct Collapser {
    texts: HashMap<NodeId, String>,
    prev_space: bool,
    last_text: Option<NodeId>,
}

impl Collapser {
    fn walk(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => self.push_text(child.id(), text),
                Node::Element(element) => {
                    let name = element.name();
                    if is_silent(name) {
                        continue;
                    }

                    if name == "pre" {
                        self.boundary();
                    } else if is_block(name) || name == "br" {
                        self.boundary();
                        self.walk(child);
                        self.boundary();
                    } else if is_void(name) {
                        self.prev_space = false;
                        self.last_text = None;
                    } else {
                        self.walk(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn push_text(&mut self, id: NodeId, text: &str) {
        let mut collapsed = String::with_capacity(text.len());
        let mut in_space = false;

        for c in text.chars() {
            if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c') {
                if !in_space {
                    collapsed.push(' ');
                    in_space = true;
                }
            } else {
                collapsed.push(c);
                in_space = false;
            }
        }

        if self.prev_space && collapsed.starts_with(' ') {
            collapsed.remove(0);
        }

        if collapsed.is_empty() {
            self.texts.insert(id, collapsed);
            return;
        }

        self.prev_space = collapsed.ends_with(' ');
        self.texts.insert(id, collapsed);
        self.last_text = Some(id);
    }

    fn boundary(&mut self) {
        if let Some(id) = self.last_text.take() {
            if let Some(text) = self.texts.get_mut(&id) {
                if text.ends_with(' ') {
                    text.pop();
                }
            }
        }
        self.prev_space = true;
    }
}

/// Escapes characters that would otherwise be read as Markdown syntax
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '`' | '[' | ']' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    // Markers that only matter at the start of the text
    if escaped.starts_with('-')
        || escaped.starts_with("+ ")
        || escaped.starts_with('=')
        || escaped.starts_with("~~~")
        || escaped.starts_with('>')
        || is_atx_marker(&escaped)
    {
        escaped.insert(0, '\\');
    } else if let Some(digits) = ordered_marker_len(&escaped) {
        escaped.insert(digits, '\\');
    }

    escaped
}

fn is_atx_marker(text: &str) -> bool {
    let hashes = text.chars().take_while(|c| *c == '#').count();
    (1..=6).contains(&hashes) && text[hashes..].starts_with(' ')
}

/// Length of a leading `123. ` marker's digits, if present
fn ordered_marker_len(text: &str) -> Option<usize> {
    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    (digits > 0 && text[digits..].starts_with(". ")).then_some(digits)
}

/// Joins two rendered fragments, keeping at most one blank line between them
///
/// The separator is the larger of the trailing newlines of `output` and the
/// leading newlines of `replacement`, capped at two.
pub fn join(output: &str, replacement: &str) -> String {
    let left = output.trim_end_matches('\n');
    let right = replacement.trim_start_matches('\n');

    let trailing = output.len() - left.len();
    let leading = replacement.len() - right.len();
    let newlines = trailing.max(leading).min(2);

    let mut joined = String::with_capacity(left.len() + newlines + right.len());
    joined.push_str(left);
    joined.push_str(&"\n".repeat(newlines));
    joined.push_str(right);
    joined
}
