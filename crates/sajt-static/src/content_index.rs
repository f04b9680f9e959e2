//! Card listings for content type index pages.

use std::collections::HashMap;
use std::fmt::Write;

use crate::content::ContentItem;

/// Items grouped by content type slug, in discovery order.
#[derive(Debug, Default)]
pub struct ContentIndex<'a> {
    by_type: HashMap<&'a str, Vec<&'a ContentItem>>,
}

impl<'a> ContentIndex<'a> {
    pub fn new(items: &'a [ContentItem]) -> Self {
        let mut by_type: HashMap<&str, Vec<&ContentItem>> = HashMap::new();
        for item in items {
            by_type
                .entry(item.content_type_slug.as_str())
                .or_default()
                .push(item);
        }
        Self { by_type }
    }

    /// All items of a type, index page included.
    pub fn items(&self, type_slug: &str) -> &[&'a ContentItem] {
        self.by_type
            .get(type_slug)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Render the card grid for a type.
    ///
    /// One card per page of the type except its index page, skipping drafts
    /// when publishing. Empty when no card qualifies.
    pub fn render(&self, type_slug: &str, publish: bool) -> String {
        let cards: Vec<String> = self
            .items(type_slug)
            .iter()
            .filter(|item| !item.is_index() && item.is_visible(publish))
            .map(|item| card(item))
            .collect();

        if cards.is_empty() {
            return String::new();
        }

        format!(
            r#"<section class="content-index">{}</section>"#,
            cards.concat()
        )
    }
}

fn card(item: &ContentItem) -> String {
    let mut html = format!(r#"<a class="card" href="{}">"#, item.url());
    if let Some(src) = item.settings.text("featured_image") {
        let alt = item.settings.text("featured_image_alt").unwrap_or("");
        let _ = write!(html, r#"<img src="{src}" alt="{alt}">"#);
    }
    let _ = write!(html, r#"<span class="card-title">{}</span></a>"#, item.title());
    html
}
