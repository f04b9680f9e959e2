//! Body markup to HTML.
//!
//! Lines are rewritten independently by the [`rules`](crate::rules) table,
//! joined, and then cleaned up by three passes that look across lines.

use crate::frontmatter::split_lines;
use crate::rules::{self, ORDERED_ITEM, UNORDERED_ITEM};

/// Convert a content body to an HTML fragment.
///
/// Meant for raw markup only; running it over its own output is not stable.
pub fn transform(body: &str) -> String {
    let html = split_lines(body)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(rules::apply_all)
        .collect::<Vec<_>>()
        .join("\n");

    let html = merge_blockquotes(&html);
    let html = wrap_lists(&html);
    merge_paragraphs(&html)
}

/// Join adjacent quotes into one `<blockquote>`.
pub fn merge_blockquotes(html: &str) -> String {
    html.replace("</blockquote>\n<blockquote>", "\n")
}

/// Wrap runs of tagged list items in `<ul>`/`<ol>` and turn the tags into
/// plain `<li>`.
pub fn wrap_lists(html: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<ListKind> = None;

    for line in html.split('\n') {
        let kind = ListKind::of(line);
        if kind != open {
            if let Some(prev) = open {
                out.push(prev.close().to_string());
            }
            if let Some(next) = kind {
                out.push(next.open().to_string());
            }
            open = kind;
        }
        match kind {
            Some(kind) => out.push(kind.strip_marker(line)),
            None => out.push(line.to_string()),
        }
    }

    if let Some(prev) = open {
        out.push(prev.close().to_string());
    }

    out.join("\n")
}

/// Adjacent one-line paragraphs become one paragraph with line breaks.
pub fn merge_paragraphs(html: &str) -> String {
    html.replace("</p>\n<p>", "<br>\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn of(line: &str) -> Option<Self> {
        if line.starts_with(UNORDERED_ITEM) {
            Some(Self::Unordered)
        } else if line.starts_with(ORDERED_ITEM) {
            Some(Self::Ordered)
        } else {
            None
        }
    }

    fn open(self) -> &'static str {
        match self {
            Self::Unordered => "<ul>",
            Self::Ordered => "<ol>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Unordered => "</ul>",
            Self::Ordered => "</ol>",
        }
    }

    fn strip_marker(self, line: &str) -> String {
        let (open, close) = match self {
            Self::Unordered => (UNORDERED_ITEM, "</uli>"),
            Self::Ordered => (ORDERED_ITEM, "</oli>"),
        };
        line.replacen(open, "<li", 1).replace(close, "</li>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_heading_without_nesting() {
        assert_eq!(transform("##### Title"), "<h5>Title</h5>");
        assert_eq!(transform("# Hello"), "<h1>Hello</h1>");
    }

    #[test]
    fn collapses_unordered_list() {
        let html = transform("* a\n* b\n* c");

        assert_eq!(html, "<ul>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ul>");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 3);
        assert!(!html.contains("uli"));
    }

    #[test]
    fn separate_runs_get_separate_lists() {
        let html = transform("1. ett\n2. två\n* punkt");

        assert_eq!(
            html,
            "<ol>\n<li>ett</li>\n<li>två</li>\n</ol>\n<ul>\n<li>punkt</li>\n</ul>"
        );
    }

    #[test]
    fn blank_lines_do_not_split_lists() {
        assert_eq!(transform("* a\n\n* b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
    }

    #[test]
    fn footnotes_link_to_definitions() {
        let html = transform("Text[^1]\n\n[^1]: En not");

        assert!(html.contains(r##"<sup><a href="#footnote1">1</a></sup>"##));
        assert!(html.contains(r#"<ol>
<li id="footnote1">En not</li>
</ol>"#));
        assert!(!html.contains("oli"));
    }

    #[test]
    fn merges_adjacent_paragraphs_with_breaks() {
        assert_eq!(transform("rad ett\nrad två"), "<p>rad ett<br>\nrad två</p>");
    }

    #[test]
    fn blank_lines_are_dropped() {
        assert_eq!(transform("a\n\nb"), "<p>a<br>\nb</p>");
        assert_eq!(transform("\n  \n# Rubrik\n\n"), "<h1>Rubrik</h1>");
    }

    #[test]
    fn merges_adjacent_blockquotes() {
        assert_eq!(
            transform("> första\n> andra"),
            "<blockquote><p>första<br>\nandra</p></blockquote>"
        );
    }

    #[test]
    fn horizontal_rule_line_is_not_a_paragraph() {
        assert_eq!(transform("ovan\n---\nnedan"), "<p>ovan</p>\n<hr>\n<p>nedan</p>");
    }

    #[test]
    fn handles_crlf_and_indentation() {
        assert_eq!(
            transform("  ## Rubrik  \r\n  **fet**"),
            "<h2>Rubrik</h2>\n<p><strong>fet</strong></p>"
        );
    }

    #[test]
    fn attribution_and_image_lines_stay_unwrapped() {
        let html = transform("![Sjö](/sjo.jpg \"Sommar\")\nATTR: Foto: Per");

        assert_eq!(
            html,
            "<img alt=\"Sjö\" src=\"/sjo.jpg\" title=\"Sommar\">\n<section class=\"attribution\">Foto: Per</section>"
        );
    }

    #[test]
    fn pass_functions_are_independent() {
        assert_eq!(
            merge_blockquotes("<blockquote><p>a</p></blockquote>\n<blockquote><p>b</p></blockquote>"),
            "<blockquote><p>a</p>\n<p>b</p></blockquote>"
        );
        assert_eq!(wrap_lists("<p>x</p>"), "<p>x</p>");
        assert_eq!(merge_paragraphs("<p>a</p>\n<h1>b</h1>"), "<p>a</p>\n<h1>b</h1>");
    }
}
