//! Template choice and output location per content item.

use std::path::PathBuf;

use crate::content::ContentItem;

pub const MAIN_INDEX_TEMPLATE: &str = "_main-index.html";
pub const TYPE_INDEX_TEMPLATE: &str = "_content-type-index.html";
pub const DICTIONARY_TEMPLATE: &str = "_dictionary-content.html";
pub const DEFAULT_TEMPLATE: &str = "_default-content.html";

/// File holding just the rendered body of a dictionary entry.
pub const FRAGMENT_FILE: &str = "min.html";

/// What kind of page an item becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `_index` at the content root
    SiteIndex,
    /// `_index` inside a content type
    TypeIndex,
    /// Entry of the dictionary content type
    Dictionary,
    /// Any other page
    Content,
}

impl PageKind {
    /// Classify an item. Index pages win over the dictionary type.
    pub fn classify(item: &ContentItem, dictionary_slug: &str) -> Self {
        if item.is_site_root() {
            Self::SiteIndex
        } else if item.is_index() {
            Self::TypeIndex
        } else if item.content_type_slug == dictionary_slug {
            Self::Dictionary
        } else {
            Self::Content
        }
    }

    /// Template file this kind of page is rendered with.
    pub fn template(self) -> &'static str {
        match self {
            Self::SiteIndex => MAIN_INDEX_TEMPLATE,
            Self::TypeIndex => TYPE_INDEX_TEMPLATE,
            Self::Dictionary => DICTIONARY_TEMPLATE,
            Self::Content => DEFAULT_TEMPLATE,
        }
    }

    /// Whether the page lists its siblings.
    pub fn has_content_index(self) -> bool {
        matches!(self, Self::SiteIndex | Self::TypeIndex)
    }

    /// Page location relative to the output root.
    pub fn output_path(self, item: &ContentItem) -> PathBuf {
        match self {
            Self::SiteIndex => PathBuf::from("index.html"),
            Self::TypeIndex => PathBuf::from(&item.content_type_slug).join("index.html"),
            Self::Dictionary | Self::Content => PathBuf::from(&item.content_type_slug)
                .join(&item.name_slug)
                .join("index.html"),
        }
    }

    /// Location of the bare content fragment, for dictionary entries only.
    pub fn fragment_path(self, item: &ContentItem) -> Option<PathBuf> {
        match self {
            Self::Dictionary => Some(
                PathBuf::from(&item.content_type_slug)
                    .join(&item.name_slug)
                    .join(FRAGMENT_FILE),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sajt_markup::Settings;
    use std::path::Path;

    fn item(content_type: &str, name: &str) -> ContentItem {
        ContentItem::new(content_type, name, Settings::new(), "")
    }

    #[test]
    fn classifies_by_priority() {
        let dict = "dictionary";
        assert_eq!(PageKind::classify(&item("", "_index"), dict), PageKind::SiteIndex);
        assert_eq!(PageKind::classify(&item("Guider", "_index"), dict), PageKind::TypeIndex);
        assert_eq!(PageKind::classify(&item("Dictionary", "_index"), dict), PageKind::TypeIndex);
        assert_eq!(PageKind::classify(&item("Dictionary", "ord"), dict), PageKind::Dictionary);
        assert_eq!(PageKind::classify(&item("Guider", "intro"), dict), PageKind::Content);
    }

    #[test]
    fn templates_per_kind() {
        assert_eq!(PageKind::SiteIndex.template(), "_main-index.html");
        assert_eq!(PageKind::TypeIndex.template(), "_content-type-index.html");
        assert_eq!(PageKind::Dictionary.template(), "_dictionary-content.html");
        assert_eq!(PageKind::Content.template(), "_default-content.html");
    }

    #[test]
    fn output_paths() {
        let root = item("", "_index");
        let index = item("Mina Guider", "_index");
        let page = item("Mina Guider", "Första");

        assert_eq!(PageKind::SiteIndex.output_path(&root), Path::new("index.html"));
        assert_eq!(
            PageKind::TypeIndex.output_path(&index),
            Path::new("mina-guider/index.html")
        );
        assert_eq!(
            PageKind::Content.output_path(&page),
            Path::new("mina-guider/forsta/index.html")
        );
    }

    #[test]
    fn only_dictionary_entries_get_a_fragment() {
        let word = item("Dictionary", "ord");

        assert_eq!(
            PageKind::Dictionary.fragment_path(&word),
            Some(PathBuf::from("dictionary/ord/min.html"))
        );
        assert_eq!(PageKind::Content.fragment_path(&word), None);
    }
}
