//! Content items and their discovery.

use std::fs;
use std::path::Path;

use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use sajt_markup::{parse_front_matter, slugify, Settings};

use crate::builder::BuildError;

/// Name of the index page of a content type, or of the site root.
pub const INDEX_NAME: &str = "_index";

/// One parsed content file.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    /// Folder path relative to the content root, as written. Empty for the
    /// site root index.
    pub content_type: String,

    pub content_type_slug: String,

    /// File name without `.md`
    pub name: String,

    pub name_slug: String,

    /// Front matter settings
    pub settings: Settings,

    /// Untransformed body
    pub raw_body: String,
}

impl ContentItem {
    /// Create an item, deriving both slugs.
    pub fn new(
        content_type: impl Into<String>,
        name: impl Into<String>,
        settings: Settings,
        raw_body: impl Into<String>,
    ) -> Self {
        let content_type = content_type.into();
        let name = name.into();
        Self {
            content_type_slug: slugify(&content_type),
            name_slug: slugify(&name),
            content_type,
            name,
            settings,
            raw_body: raw_body.into(),
        }
    }

    /// Whether this is the index page of its type (or of the site).
    pub fn is_index(&self) -> bool {
        self.name == INDEX_NAME
    }

    /// Whether this is the index page of the whole site.
    pub fn is_site_root(&self) -> bool {
        self.is_index() && self.content_type.is_empty()
    }

    pub fn is_draft(&self) -> bool {
        self.settings.is_draft()
    }

    /// Whether the item is written and listed. Drafts only show up when not
    /// publishing.
    pub fn is_visible(&self, publish: bool) -> bool {
        !publish || !self.is_draft()
    }

    /// Title setting, or the file name when none is given.
    pub fn title(&self) -> &str {
        self.settings.title().unwrap_or(&self.name)
    }

    /// Site-absolute URL of the page.
    pub fn url(&self) -> String {
        if self.is_site_root() {
            "/".to_string()
        } else if self.is_index() {
            format!("/{}", self.content_type_slug)
        } else {
            format!("/{}/{}", self.content_type_slug, self.name_slug)
        }
    }

    /// Source-relative label used in logs and errors, e.g. `Guider/intro`.
    pub fn label(&self) -> String {
        if self.content_type.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.content_type, self.name)
        }
    }
}

/// Find and parse every content file under `content_dir`.
///
/// Items are returned in discovery order, which is sorted by file name at
/// every level. Files directly in the root other than `_index.md` are skipped.
pub fn discover_content(content_dir: &Path) -> Result<Vec<ContentItem>, BuildError> {
    if !content_dir.is_dir() {
        return Err(BuildError::ReadError(format!(
            "Content directory not found: {}",
            content_dir.display()
        )));
    }

    let mut items = Vec::new();

    let walker = WalkDir::new(content_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let relative = path.strip_prefix(content_dir).unwrap_or(path);
        let name = relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = relative
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();

        if content_type.is_empty() && name != INDEX_NAME {
            tracing::debug!("Skipping {}: not inside a content type", relative.display());
            continue;
        }

        let source = fs::read_to_string(path)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

        let label = relative.with_extension("").to_string_lossy().into_owned();
        let front_matter = parse_front_matter(&source, &label)?;

        items.push(ContentItem::new(
            content_type,
            name,
            front_matter.settings,
            front_matter.body,
        ));
    }

    Ok(items)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}
