//! Per-page HTML fragments: featured image and breadcrumbs.

use std::fmt::Write;

use sajt_markup::Settings;

use crate::content::ContentItem;

/// Label of the root breadcrumb.
pub const HOME_LABEL: &str = "Hem";

/// Breakpoint between the narrow and the wide featured image.
const NARROW_MEDIA: &str = "(max-width: 799px)";
const WIDE_MEDIA: &str = "(min-width: 800px)";

/// Featured image from `featured_image*` settings.
///
/// A plain `<img>`, or a `<picture>` switching at 800px when a narrow variant
/// is set. Followed by the attribution, if any. Empty without
/// `featured_image`.
pub fn featured_image(settings: &Settings) -> String {
    let Some(src) = settings.text("featured_image") else {
        return String::new();
    };
    let alt = settings.text("featured_image_alt").unwrap_or("");

    let mut html = match settings.text("featured_image_narrow") {
        Some(narrow) => format!(
            concat!(
                "<picture>",
                r#"<source media="{narrow_media}" srcset="{narrow}">"#,
                r#"<source media="{wide_media}" srcset="{src}">"#,
                r#"<img class="featured-image" src="{src}" alt="{alt}">"#,
                "</picture>"
            ),
            narrow_media = NARROW_MEDIA,
            narrow = narrow,
            wide_media = WIDE_MEDIA,
            src = src,
            alt = alt,
        ),
        None => format!(r#"<img class="featured-image" src="{src}" alt="{alt}">"#),
    };

    if let Some(attribution) = settings.text("featured_image_attribution") {
        let _ = write!(
            html,
            r#"<section class="attribution">{attribution}</section>"#
        );
    }

    html
}

/// Breadcrumb trail: home, the content type, then the page itself.
///
/// On a type's index page the type is the last crumb and is not a link.
/// The site root has no trail.
pub fn breadcrumbs(item: &ContentItem) -> String {
    if item.is_site_root() {
        return String::new();
    }

    let mut html = format!(r#"<nav class="breadcrumbs"><a href="/">{HOME_LABEL}</a>"#);

    if item.is_index() {
        let _ = write!(html, " / <span>{}</span>", item.content_type);
    } else {
        let _ = write!(
            html,
            r#" / <a href="/{}">{}</a> / <span>{}</span>"#,
            item.content_type_slug, item.content_type, item.name
        );
    }

    html.push_str("</nav>");
    html
}
