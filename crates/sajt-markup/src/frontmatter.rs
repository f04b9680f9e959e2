//! Front matter extraction and parsing.
//!
//! A content file consists of two sections separated by `+++`: a settings
//! block of `key = value` rows followed by the markup body.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Delimiter between the settings block and the body.
const DELIMITER: &str = "+++";

/// A single setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Bool(bool),
}

impl SettingValue {
    /// Coerce a raw value: `true`/`false` in any case become booleans.
    pub fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            Self::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Self::Bool(false)
        } else {
            Self::Text(raw.to_string())
        }
    }
}

/// Parsed settings block, keyed by setting name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings(BTreeMap<String, SettingValue>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SettingValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Text value of a setting. Boolean values are not text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(SettingValue::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Whether a setting is the boolean `true`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(SettingValue::Bool(true)))
    }

    /// Page title (`title`)
    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    /// Whether the item is a draft (`draft = true`)
    pub fn is_draft(&self) -> bool {
        self.flag("draft")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Writes the settings back in the `key = value` row format.
impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.0 {
            match value {
                SettingValue::Text(s) => writeln!(f, "{} = \"{}\"", key, s)?,
                SettingValue::Bool(b) => writeln!(f, "{} = {}", key, b)?,
            }
        }
        Ok(())
    }
}

/// A content file split into settings and the untransformed body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub settings: Settings,
    pub body: String,
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("Malformed settings row {row:?} in {content}: expected `key = value`")]
    MalformedRow { row: String, content: String },
}

/// Parse a content file.
///
/// `content` names the item in error messages.
pub fn parse_front_matter(source: &str, content: &str) -> Result<FrontMatter, FrontMatterError> {
    static ROW: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(.*?)=(.*)$").expect("Invalid settings row regex"));

    let mut sections = source
        .split(DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let settings_block = sections.next().unwrap_or("");
    let body = sections.next().unwrap_or("").to_string();

    let mut settings = Settings::new();
    for row in split_lines(settings_block).filter(|r| !r.trim().is_empty()) {
        let Some(caps) = ROW.captures(row) else {
            return Err(FrontMatterError::MalformedRow {
                row: row.to_string(),
                content: content.to_string(),
            });
        };
        let key = caps[1].trim();
        let value = strip_quotes(caps[2].trim());
        settings.insert(key, SettingValue::coerce(value));
    }

    Ok(FrontMatter { settings, body })
}

/// Split on CRLF, LF or CR.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n").flat_map(|s| s.split(['\n', '\r']))
}

/// Remove one leading and one trailing quote character.
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_settings_and_body() {
        let source = r#"+++
title = "Intro"
featured_image = 'bild.jpg'
draft = TRUE
+++
# Hello
"#;

        let fm = parse_front_matter(source, "intro").unwrap();

        assert_eq!(fm.settings.title(), Some("Intro"));
        assert_eq!(fm.settings.text("featured_image"), Some("bild.jpg"));
        assert!(fm.settings.is_draft());
        assert_eq!(fm.body, "# Hello");
    }

    #[test]
    fn key_ends_at_first_equals() {
        let fm = parse_front_matter("+++\nlink = a=b\n+++\n", "x").unwrap();

        assert_eq!(fm.settings.text("link"), Some("a=b"));
    }

    #[test]
    fn strips_only_one_layer_of_quotes() {
        let fm = parse_front_matter("+++\nquote = \"\"citat\"\"\n+++\nbody", "x").unwrap();

        assert_eq!(fm.settings.text("quote"), Some("\"citat\""));
    }

    #[test]
    fn false_is_boolean_but_falsy_words_are_text() {
        let fm = parse_front_matter("+++\ndraft = False\nmode = no\n+++\n", "x").unwrap();

        assert_eq!(fm.settings.get("draft"), Some(&SettingValue::Bool(false)));
        assert_eq!(fm.settings.get("mode"), Some(&SettingValue::Text("no".into())));
        assert!(!fm.settings.is_draft());
    }

    #[test]
    fn accepts_windows_and_mac_line_endings() {
        let fm = parse_front_matter("+++\r\ntitle = A\r\nalt = B\rdraft = true\r\n+++\r\nbody", "x")
            .unwrap();

        assert_eq!(fm.settings.len(), 3);
        assert_eq!(fm.settings.text("alt"), Some("B"));
    }

    #[test]
    fn missing_body_is_empty() {
        let fm = parse_front_matter("+++\ntitle = Tom\n+++\n", "tom").unwrap();

        assert_eq!(fm.body, "");
    }

    #[test]
    fn errors_on_malformed_row() {
        let result = parse_front_matter("+++\ntitle = Ok\nnot a setting\n+++\nbody", "guider/intro");

        match result {
            Err(FrontMatterError::MalformedRow { row, content }) => {
                assert_eq!(row, "not a setting");
                assert_eq!(content, "guider/intro");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn error_message_names_row_and_content() {
        let err = parse_front_matter("+++\noops\n+++\n", "recept/bröd").unwrap_err();
        let message = err.to_string();

        assert!(message.contains("oops"));
        assert!(message.contains("recept/bröd"));
    }

    #[test]
    fn round_trips_through_display() {
        let mut settings = Settings::new();
        settings.insert("title", SettingValue::Text("Mitt inlägg".into()));
        settings.insert("featured_image", SettingValue::Text("/bilder/a.jpg".into()));
        settings.insert("draft", SettingValue::Bool(true));
        settings.insert("listed", SettingValue::Bool(false));

        let source = format!("+++\n{}+++\nbody", settings);
        let fm = parse_front_matter(&source, "x").unwrap();

        assert_eq!(fm.settings, settings);
    }
}
