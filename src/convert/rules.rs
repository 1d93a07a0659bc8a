//! Site-specific conversion rules
//!
//! These take priority over the standard rules: headings are promoted one
//! level, anchors inside code spans lose their link, and same-origin links are
//! rewritten to point at the mirrored Markdown files.

use crate::convert::{HeadingStyle, RenderContext};
use crate::storage::markdown_file;
use crate::url::{is_same_origin, parent_dir, relative_path, Pathname};
use scraper::ElementRef;

/// A single element-to-Markdown conversion rule
///
/// Rules are consulted in order; the first one that `applies` renders the
/// element. `content` is the already converted content of the element's
/// children.
pub trait Rule: Send + Sync {
    /// Short name used in logs and diagnostics
    fn name(&self) -> &'static str;

    fn applies(&self, element: ElementRef<'_>, ctx: &RenderContext<'_>) -> bool;

    fn replace(&self, content: &str, element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String;
}

/// Renders `h1`..`h6` one level deeper, clamped at level 6
pub struct HeadingRule;

impl HeadingRule {
    fn promoted_level(name: &str) -> Option<usize> {
        let level: usize = name.strip_prefix('h')?.parse().ok()?;
        (1..=6).contains(&level).then(|| (level + 1).min(6))
    }
}

impl Rule for HeadingRule {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        Self::promoted_level(element.value().name()).is_some()
    }

    fn replace(&self, content: &str, element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        let level = Self::promoted_level(element.value().name()).unwrap_or(6);

        if ctx.options.heading_style == HeadingStyle::Setext && level < 3 {
            let marker = if level == 1 { "=" } else { "-" };
            let underline = marker.repeat(content.chars().count());
            format!("\n\n{}\n{}\n\n", content, underline)
        } else {
            format!("\n\n{} {}\n\n", "#".repeat(level), content)
        }
    }
}

/// Renders an anchor nested in a code span as its plain content
pub struct CodeLinkRule;

impl Rule for CodeLinkRule {
    fn name(&self) -> &'static str {
        "code-link"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "a"
            && element
                .ancestors()
                .any(|node| node.value().as_element().is_some_and(|e| e.name() == "code"))
    }

    fn replace(&self, content: &str, _element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> String {
        content.to_string()
    }
}

/// Renders anchors as inline links, pointing same-origin targets at the
/// mirrored Markdown file relative to the current page
pub struct LinkRule;

impl LinkRule {
    fn destination(href: &str, ctx: &RenderContext<'_>) -> String {
        let target = match ctx.page_url.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Keeping unresolvable href {:?} on {}: {}", href, ctx.pathname, e);
                return href.to_string();
            }
        };

        if !is_same_origin(&target, ctx.site_root) {
            return target.to_string();
        }

        let Some(pathname) = Pathname::from_url(&target) else {
            return target.to_string();
        };

        let current = markdown_file(ctx.pathname);
        let mut destination = relative_path(parent_dir(&current), &markdown_file(&pathname));
        if let Some(fragment) = target.fragment() {
            destination.push('#');
            destination.push_str(fragment);
        }
        destination
    }

    fn title(element: ElementRef<'_>) -> String {
        let Some(raw) = element.value().attr("title") else {
            return String::new();
        };

        let mut title = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\n' => {
                    title.push('\n');
                    while chars.peek().is_some_and(|c| c.is_whitespace()) {
                        chars.next();
                    }
                }
                '"' => title.push_str("\\\""),
                c => title.push(c),
            }
        }

        if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title)
        }
    }
}

impl Rule for LinkRule {
    fn name(&self) -> &'static str {
        "link"
    }

    fn applies(&self, element: ElementRef<'_>, _ctx: &RenderContext<'_>) -> bool {
        element.value().name() == "a" && element.value().attr("href").is_some()
    }

    fn replace(&self, content: &str, element: ElementRef<'_>, ctx: &RenderContext<'_>) -> String {
        let href = element.value().attr("href").unwrap_or_default();
        let destination = Self::destination(href, ctx)
            .replace('(', "\\(")
            .replace(')', "\\)");

        format!("[{}]({}{})", content, destination, Self::title(element))
    }
}

/// Site rules in priority order
pub fn site_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(HeadingRule), Box::new(CodeLinkRule), Box::new(LinkRule)]
}
