//! Per-line markup rules.
//!
//! Each rule looks at one trimmed line and either rewrites it or reports no
//! match. [`RULES`] lists them in the order they run; every rule sees the
//! output of the rules before it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Opening marker for an item that belongs in a `<ul>`.
pub const UNORDERED_ITEM: &str = "<uli";
/// Opening marker for an item that belongs in an `<ol>`.
pub const ORDERED_ITEM: &str = "<oli";

/// A single line rewrite.
#[derive(Clone, Copy)]
pub struct LineRule {
    name: &'static str,
    rewrite: fn(&str) -> Option<String>,
}

impl LineRule {
    const fn new(name: &'static str, rewrite: fn(&str) -> Option<String>) -> Self {
        Self { name, rewrite }
    }

    /// Rule name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rewrite `line`, or `None` if the rule does not apply.
    pub fn apply(&self, line: &str) -> Option<String> {
        (self.rewrite)(line)
    }
}

impl std::fmt::Debug for LineRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LineRule").field(&self.name).finish()
    }
}

/// All line rules in application order.
pub const RULES: &[LineRule] = &[
    LineRule::new("footnote-definition", footnote_definition),
    LineRule::new("footnote-reference", footnote_reference),
    LineRule::new("image", image),
    LineRule::new("link", link),
    LineRule::new("attribution", attribution),
    LineRule::new("heading", heading),
    LineRule::new("unordered-item", unordered_item),
    LineRule::new("ordered-item", ordered_item),
    LineRule::new("blockquote", blockquote),
    LineRule::new("paragraph", paragraph),
    LineRule::new("emphasis", emphasis),
    LineRule::new("horizontal-rule", horizontal_rule),
];

/// Run every rule over a single line.
pub fn apply_all(line: &str) -> String {
    RULES
        .iter()
        .fold(line.to_string(), |acc, rule| rule.apply(&acc).unwrap_or(acc))
}

/// `[^N]: text` becomes an ordered item anchored as `footnoteN`.
fn footnote_definition(line: &str) -> Option<String> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\[\^(\w+)\]:\s*(.*)$").expect("Invalid footnote definition regex")
    });

    let caps = RE.captures(line)?;
    Some(format!(
        r#"{ORDERED_ITEM} id="footnote{}">{}</oli>"#,
        &caps[1], &caps[2]
    ))
}

fn footnote_reference(line: &str) -> Option<String> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[\^(\w+)\]").expect("Invalid footnote reference regex"));

    RE.is_match(line).then(|| {
        RE.replace_all(line, r##"<sup><a href="#footnote${1}">${1}</a></sup>"##)
            .into_owned()
    })
}

/// `![alt](src "title")`, first occurrence only.
fn image(line: &str) -> Option<String> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"!\[([^\]]*)\]\(([^\s)]+)(?:\s+"([^"]*)")?\)"#).expect("Invalid image regex")
    });

    RE.is_match(line).then(|| {
        RE.replace(line, |caps: &Captures| match caps.get(3) {
            Some(title) => format!(
                r#"<img alt="{}" src="{}" title="{}">"#,
                &caps[1],
                &caps[2],
                title.as_str()
            ),
            None => format!(r#"<img alt="{}" src="{}">"#, &caps[1], &caps[2]),
        })
        .into_owned()
    })
}

/// `[text](href)`, all occurrences. Image markers are left alone.
fn link(line: &str) -> Option<String> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(!?)\[([^\]]*)\]\(([^\s)]+)\)").expect("Invalid link regex")
    });

    let replaced = RE.replace_all(line, |caps: &Captures| {
        if &caps[1] == "!" {
            caps[0].to_string()
        } else {
            format!(r#"<a href="{}">{}</a>"#, &caps[3], &caps[2])
        }
    });
    (replaced != line).then(|| replaced.into_owned())
}

fn attribution(line: &str) -> Option<String> {
    let text = line.strip_prefix("ATTR:")?;
    Some(format!(
        r#"<section class="attribution">{}</section>"#,
        text.trim()
    ))
}

/// `#####` down to `#`; the longest matching prefix wins.
fn heading(line: &str) -> Option<String> {
    (1..=5).rev().find_map(|level| {
        let marker = format!("{} ", "#".repeat(level));
        line.strip_prefix(marker.as_str())
            .map(|text| format!("<h{level}>{}</h{level}>", text.trim()))
    })
}

fn unordered_item(line: &str) -> Option<String> {
    let text = line.strip_prefix("* ")?;
    Some(format!("{UNORDERED_ITEM}>{}</uli>", text.trim()))
}

fn ordered_item(line: &str) -> Option<String> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d+\. (.*)$").expect("Invalid ordered item regex"));

    let caps = RE.captures(line)?;
    Some(format!("{ORDERED_ITEM}>{}</oli>", caps[1].trim()))
}

fn blockquote(line: &str) -> Option<String> {
    let text = line.strip_prefix('>')?;
    Some(format!("<blockquote><p>{}</p></blockquote>", text.trim()))
}

/// Wraps anything that is not already markup. A bare `---` is a rule, not a
/// paragraph.
fn paragraph(line: &str) -> Option<String> {
    if line.is_empty() || line.starts_with('<') || line == "---" {
        return None;
    }
    Some(format!("<p>{line}</p>"))
}

fn emphasis(line: &str) -> Option<String> {
    static STRONG_EM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("Invalid emphasis regex"));
    static STRONG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid emphasis regex"));
    static EM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("Invalid emphasis regex"));

    if !line.contains('*') {
        return None;
    }

    let out = STRONG_EM.replace_all(line, "<strong><em>${1}</em></strong>");
    let out = STRONG.replace_all(&out, "<strong>${1}</strong>");
    let out = EM.replace_all(&out, "<em>${1}</em>").into_owned();
    (out != line).then_some(out)
}

fn horizontal_rule(line: &str) -> Option<String> {
    line.contains("---").then(|| line.replace("---", "<hr>"))
}
