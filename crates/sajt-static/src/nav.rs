//! Site navigation.
//!
//! A two-level tree of content types and their pages, rendered as nested
//! `<details>` sections.

use std::cmp::Ordering;
use std::fmt::Write;

use serde::Serialize;

use crate::content::ContentItem;

/// Summary label of the outer navigation section.
pub const NAV_SUMMARY: &str = "Innehåll";

/// A page entry under a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub name: String,
    pub slug: String,
}

/// A content type and its pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSubject {
    pub subject: String,
    pub slug: String,
    pub items: Vec<NavEntry>,
}

/// Navigation tree for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavTree {
    pub subjects: Vec<NavSubject>,
}

impl NavTree {
    /// Build the tree from every discovered item.
    ///
    /// Leaves out the site root, the dictionary type and, when publishing,
    /// drafts. Type index pages make their subject appear but are reached
    /// through the subject link rather than listed.
    pub fn build(items: &[ContentItem], publish: bool, dictionary_slug: &str) -> Self {
        let mut subjects: Vec<NavSubject> = Vec::new();

        for item in items {
            if item.is_site_root()
                || item.content_type_slug == dictionary_slug
                || !item.is_visible(publish)
            {
                continue;
            }

            let pos = match subjects.iter().position(|s| s.subject == item.content_type) {
                Some(pos) => pos,
                None => {
                    subjects.push(NavSubject {
                        subject: item.content_type.clone(),
                        slug: item.content_type_slug.clone(),
                        items: Vec::new(),
                    });
                    subjects.len() - 1
                }
            };

            if !item.is_index() {
                subjects[pos].items.push(NavEntry {
                    name: item.name.clone(),
                    slug: item.name_slug.clone(),
                });
            }
        }

        for subject in &mut subjects {
            subject.items.sort_by(|a, b| a.name.cmp(&b.name));
        }
        subjects.sort_by(|a, b| collate(&a.subject, &b.subject));

        Self { subjects }
    }

    /// Render the tree to HTML.
    pub fn render(&self) -> String {
        let mut html = format!("<section><details><summary>{NAV_SUMMARY}</summary>");

        for subject in &self.subjects {
            let _ = write!(
                html,
                r#"<section><details><summary><a href="/{}">{}</a></summary>"#,
                subject.slug, subject.subject
            );
            for item in &subject.items {
                let _ = write!(
                    html,
                    r#"<section><a href="/{}/{}">{}</a></section>"#,
                    subject.slug, item.slug, item.name
                );
            }
            html.push_str("</details></section>");
        }

        html.push_str("</details></section>");
        html
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// Compare names the way a Swedish reader expects: case-insensitive, with
/// `å`, `ä` and `ö` after `z`. Ties fall back to plain string order.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> Vec<u32> {
    const AFTER_Z: u32 = 'z' as u32;

    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'å' => AFTER_Z + 1,
            'ä' | 'æ' => AFTER_Z + 2,
            'ö' | 'ø' => AFTER_Z + 3,
            other => other as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sajt_markup::{SettingValue, Settings};

    fn item(content_type: &str, name: &str) -> ContentItem {
        ContentItem::new(content_type, name, Settings::new(), "")
    }

    fn draft(content_type: &str, name: &str) -> ContentItem {
        let mut settings = Settings::new();
        settings.insert("draft", SettingValue::Bool(true));
        ContentItem::new(content_type, name, settings, "")
    }

    #[test]
    fn groups_and_sorts() {
        let items = vec![
            item("Övrigt", "b"),
            item("Guider", "zebra"),
            item("Guider", "apa"),
            item("Ärenden", "x"),
            item("arkiv", "y"),
        ];

        let nav = NavTree::build(&items, false, "dictionary");

        let subjects: Vec<_> = nav.subjects.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, ["arkiv", "Guider", "Ärenden", "Övrigt"]);

        let guides: Vec<_> = nav.subjects[1].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(guides, ["apa", "zebra"]);
    }

    #[test]
    fn excludes_dictionary_root_and_index_entries() {
        let items = vec![
            item("", "_index"),
            item("Dictionary", "ord"),
            item("Guider", "_index"),
            item("Guider", "intro"),
        ];

        let nav = NavTree::build(&items, false, "dictionary");

        assert_eq!(nav.subjects.len(), 1);
        assert_eq!(nav.subjects[0].items.len(), 1);
        assert_eq!(nav.subjects[0].items[0].name, "intro");
    }

    #[test]
    fn drafts_hidden_only_when_publishing() {
        let items = vec![item("Guider", "klar"), draft("Guider", "utkast")];

        let published = NavTree::build(&items, true, "dictionary");
        let preview = NavTree::build(&items, false, "dictionary");

        assert_eq!(published.subjects[0].items.len(), 1);
        assert_eq!(preview.subjects[0].items.len(), 2);
    }

    #[test]
    fn type_with_only_index_still_gets_a_subject() {
        let nav = NavTree::build(&[item("Om oss", "_index")], false, "dictionary");

        assert_eq!(nav.subjects.len(), 1);
        assert!(nav.subjects[0].items.is_empty());
    }

    #[test]
    fn renders_links() {
        let nav = NavTree::build(&[item("Guider", "intro")], false, "dictionary");

        let html = nav.render();

        assert!(html.starts_with("<section><details><summary>Innehåll</summary>"));
        assert!(html.contains(r#"<summary><a href="/guider">Guider</a></summary>"#));
        assert!(html.contains(r#"<section><a href="/guider/intro">intro</a></section>"#));
        assert!(html.ends_with("</details></section></details></section>"));
    }

    #[test]
    fn empty_tree_renders_outer_section() {
        let nav = NavTree::default();

        assert!(nav.is_empty());
        assert_eq!(
            nav.render(),
            "<section><details><summary>Innehåll</summary></details></section>"
        );
    }

    #[test]
    fn collation_places_swedish_letters_last() {
        assert_eq!(collate("Zoo", "Åka"), Ordering::Less);
        assert_eq!(collate("åka", "äta"), Ordering::Less);
        assert_eq!(collate("äta", "öga"), Ordering::Less);
        assert_eq!(collate("apa", "Bil"), Ordering::Less);
    }
}
