//! CommonMark rules plus GitHub-style tables and strikethrough

use crate::convert::rules::Rule;
use crate::convert::{CodeBlockStyle, RenderContext};
use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

fn element_name<'a>(node: &NodeRef<'a, Node>) -> Option<&'a str> {
    node.value().as_element().map(|e| e.name())
}

fn parent_name<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element.parent().as_ref().and_then(element_name)
}

/// Position of an element among its parent's element children
fn element_index(element: ElementRef<'_>) -> usize {
    element
        .prev_siblings()
        .filter(|node| node.value().is_element())
        .count()
}

fn has_next_element(element: ElementRef<'_>) -> bool {
    element.next_siblings().any(|node| node.value().is_element())
}

pub struct Paragraph;

impl Rule for Paragraph {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "p"
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        format!("\n\n{}\n\n", content)
    }
}

pub struct LineBreak;

impl Rule for LineBreak {
    fn name(&self) -> &'static str {
        "line-break"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "br"
    }

    fn replace(&self, _content: &str, _element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        format!("{}\n", ctx.options.line_break)
    }
}

pub struct Blockquote;

impl Rule for Blockquote {
    fn name(&self) -> &'static str {
        "blockquote"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "blockquote"
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        let quoted = content
            .trim_matches('\n')
            .lines()
            .map(|line| format!("> {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\n\n{}\n\n", quoted)
    }
}

pub struct List;

impl Rule for List {
    fn name(&self) -> &'static str {
        "list"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        matches!(element.value().name(), "ul" | "ol")
    }

    fn replace(&self, content: &str, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        if parent_name(element) == Some("li") && !has_next_element(element) {
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    }
}

pub struct ListItem;

impl ListItem {
    fn prefix(element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        let parent = element.parent().and_then(ElementRef::wrap);
        match parent {
            Some(list) if list.value().name() == "ol" => {
                let start: usize = list
                    .value()
                    .attr("start")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(1);
                format!("{}.  ", start + element_index(element))
            }
            _ => format!("{}   ", ctx.options.bullet_marker),
        }
    }
}

impl Rule for ListItem {
    fn name(&self) -> &'static str {
        "list-item"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "li"
    }

    fn replace(&self, content: &str, element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        let body = content.trim_matches('\n').replace('\n', "\n    ");
        let suffix = if has_next_element(element) { "\n" } else { "" };
        format!("{}{}{}", Self::prefix(element, ctx), body, suffix)
    }
}

pub struct CodeBlock;

impl CodeBlock {
    fn language(code: Option<ElementRef<'_>>) -> &str {
        code.and_then(|c| {
            c.value()
                .classes()
                .find_map(|class| class.strip_prefix("language-"))
        })
        .unwrap_or_default()
    }

    fn fence(code: &str, fence: &str) -> String {
        let fence_char = fence.chars().next().unwrap_or('`');
        let longest = code
            .lines()
            .map(|line| line.chars().take_while(|c| *c == fence_char).count())
            .max()
            .unwrap_or(0);
        let length = fence.chars().count().max(longest + 1).max(3);
        fence_char.to_string().repeat(length)
    }
}

impl Rule for CodeBlock {
    fn name(&self) -> &'static str {
        "code-block"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "pre"
    }

    fn replace(&self, _content: &str, element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        let code = element
            .children()
            .filter_map(ElementRef::wrap)
            .find(|child| child.value().name() == "code");
        let text: String = code.unwrap_or(element).text().collect();
        let text = text.strip_suffix('\n').unwrap_or(&text);

        match ctx.options.code_block_style {
            CodeBlockStyle::Indented => {
                format!("\n\n    {}\n\n", text.replace('\n', "\n    "))
            }
            CodeBlockStyle::Fenced => {
                let fence = Self::fence(text, &ctx.options.fence);
                format!("\n\n{}{}\n{}\n{}\n\n", fence, Self::language(code), text, fence)
            }
        }
    }
}

pub struct HorizontalRule;

impl Rule for HorizontalRule {
    fn name(&self) -> &'static str {
        "horizontal-rule"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "hr"
    }

    fn replace(&self, _content: &str, _element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        format!("\n\n{}\n\n", ctx.options.horizontal_rule)
    }
}

pub struct Emphasis;

impl Rule for Emphasis {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        matches!(element.value().name(), "em" | "i")
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &ctx.options.em_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    }
}

pub struct Strong;

impl Rule for Strong {
    fn name(&self) -> &'static str {
        "strong"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        matches!(element.value().name(), "strong" | "b")
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &ctx.options.strong_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    }
}

pub struct Strikethrough;

impl Rule for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        matches!(element.value().name(), "del" | "s" | "strike")
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        format!("~~{}~~", content)
    }
}

/// Inline code span; `code` as the only child of `pre` belongs to the code block
pub struct InlineCode;

impl InlineCode {
    fn delimiter(code: &str) -> String {
        let mut runs = Vec::new();
        let mut current = 0;
        for c in code.chars() {
            if c == '`' {
                current += 1;
            } else if current > 0 {
                runs.push(current);
                current = 0;
            }
        }
        if current > 0 {
            runs.push(current);
        }

        let mut length = 1;
        while runs.contains(&length) {
            length += 1;
        }
        "`".repeat(length)
    }
}

impl Rule for InlineCode {
    fn name(&self) -> &'static str {
        "inline-code"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        if element.value().name() != "code" {
            return false;
        }
        let has_siblings = element.prev_sibling().is_some() || element.next_sibling().is_some();
        parent_name(element) != Some("pre") || has_siblings
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        if content.is_empty() {
            return String::new();
        }

        let code = content.replace("\r\n", " ").replace(['\n', '\r'], " ");
        let padded = code.starts_with('`')
            || code.ends_with('`')
            || (code.starts_with(' ') && code.ends_with(' ') && code.trim() != "");
        let space = if padded { " " } else { "" };
        let delimiter = Self::delimiter(&code);

        format!("{}{}{}{}{}", delimiter, space, code, space, delimiter)
    }
}

pub struct Image;

impl Rule for Image {
    fn name(&self) -> &'static str {
        "image"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "img"
    }

    fn replace(&self, _content: &str, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        let attr = |name: &str| {
            element
                .value()
                .attr(name)
                .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
                .unwrap_or_default()
        };

        let src = attr("src");
        if src.is_empty() {
            return String::new();
        }

        let title = attr("title");
        let title = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title)
        };

        format!("![{}]({}{})", attr("alt"), src, title)
    }
}

pub struct Table;

impl Rule for Table {
    fn name(&self) -> &'static str {
        "table"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "table"
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        format!("\n\n{}\n\n", content.trim_matches('\n'))
    }
}

/// `thead`, `tbody` and `tfoot` pass their rows through untouched
pub struct TableSection;

impl Rule for TableSection {
    fn name(&self) -> &'static str {
        "table-section"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        matches!(element.value().name(), "thead" | "tbody" | "tfoot")
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        content.to_string()
    }
}

/// Table row; the first row of a table is treated as its header
pub struct TableRow;

impl TableRow {
    fn is_header(row: ElementRef<'_>) -> bool {
        let Some(table) = row
            .ancestors()
            .find(|node| element_name(node) == Some("table"))
        else {
            return false;
        };

        table
            .descendants()
            .find(|node| element_name(node) == Some("tr"))
            .is_some_and(|first| first.id() == row.id())
    }
}

impl Rule for TableRow {
    fn name(&self) -> &'static str {
        "table-row"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "tr"
    }

    fn replace(&self, content: &str, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        if !Self::is_header(element) {
            return format!("\n{}", content);
        }

        let border: String = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(cell.value().name(), "th" | "td"))
            .map(|cell| TableCell::cell("---", cell))
            .collect();

        format!("\n{}\n{}", content, border)
    }
}

pub struct TableCell;

impl TableCell {
    fn cell(content: &str, element: ElementRef<'_>) -> String {
        let prefix = if element_index(element) == 0 { "| " } else { " " };
        format!("{}{} |", prefix, content)
    }
}

impl Rule for TableCell {
    fn name(&self) -> &'static str {
        "table-cell"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        matches!(element.value().name(), "th" | "td")
    }

    fn replace(&self, content: &str, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        let flattened = content
            .trim()
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .replace('|', "\\|");
        Self::cell(&flattened, element)
    }
}

/// Standard rules in priority order
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(Paragraph),
        Box::new(LineBreak),
        Box::new(Blockquote),
        Box::new(List),
        Box::new(ListItem),
        Box::new(CodeBlock),
        Box::new(HorizontalRule),
        Box::new(Emphasis),
        Box::new(Strong),
        Box::new(Strikethrough),
        Box::new(InlineCode),
        Box::new(Image),
        Box::new(Table),
        Box::new(TableSection),
        Box::new(TableRow),
        Box::new(TableCell),
    ]
}
