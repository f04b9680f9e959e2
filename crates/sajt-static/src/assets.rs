//! Asset pipeline for the source tree.
//!
//! CSS and JavaScript are copied under content-hashed names, HTML files have
//! their asset references rewritten to those names, and everything else is
//! copied as is.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use sajt_markup::slugify;

use crate::builder::BuildError;
use crate::output::OutputFile;
use crate::templates::{substitute_nav, TemplateSet};

/// Number of hex characters of the content hash kept in file names.
const HASH_LEN: usize = 12;

/// Extensions that get content-hashed names.
const BUSTED_EXTENSIONS: &[&str] = &["css", "js"];

/// Hashed names per source directory slug: `style.css` → `style.0123abcd4567.css`.
#[derive(Debug, Clone, Default)]
pub struct CacheBusting {
    dirs: HashMap<String, HashMap<String, String>>,
}

impl CacheBusting {
    pub fn insert(&mut self, path_slug: &str, name: &str, busted: &str) {
        self.dirs
            .entry(path_slug.to_string())
            .or_default()
            .insert(name.to_string(), busted.to_string());
    }

    /// Hashed name of `name` in the directory `path_slug`.
    pub fn get(&self, path_slug: &str, name: &str) -> Option<&str> {
        self.dirs.get(path_slug)?.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Rewrite quoted asset references in an HTML file located in
    /// `path_slug`.
    ///
    /// `"name.css"` is rewritten for assets in the same directory and
    /// `"/dir/name.css"` for assets anywhere.
    pub fn rewrite(&self, path_slug: &str, html: &str) -> String {
        let mut html = html.to_string();

        for (dir, names) in &self.dirs {
            for (name, busted) in names {
                if dir == path_slug {
                    html = html.replace(&format!("\"{name}\""), &format!("\"{busted}\""));
                }
                html = html.replace(
                    &format!("\"{}\"", site_path(dir, name)),
                    &format!("\"{}\"", site_path(dir, busted)),
                );
            }
        }

        html
    }
}

/// Site-absolute path of a file in a directory slug.
fn site_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        format!("/{name}")
    } else {
        format!("/{dir}/{name}")
    }
}

/// An HTML file from the source tree, with asset references already
/// rewritten.
#[derive(Debug, Clone)]
pub struct HtmlSource {
    pub path_slug: String,
    pub file_name: String,
    pub html: String,
}

impl HtmlSource {
    /// Files starting with `_` are templates and never written on their own.
    pub fn is_template(&self) -> bool {
        self.file_name.starts_with('_')
    }

    fn output_path(&self) -> PathBuf {
        Path::new(&self.path_slug).join(&self.file_name)
    }
}

/// Result of loading the source tree.
#[derive(Debug, Default)]
pub struct SourceTree {
    /// Hashed CSS/JS and verbatim copies of other files
    pub assets: Vec<OutputFile>,
    pub busting: CacheBusting,
    pub html: Vec<HtmlSource>,
}

impl SourceTree {
    /// Split HTML sources into in-memory templates and standalone pages,
    /// substituting the navigation into both.
    pub fn templates(&self, main_nav: &str) -> (TemplateSet, Vec<OutputFile>) {
        let mut templates = TemplateSet::new();
        let mut pages = Vec::new();

        for source in &self.html {
            let html = substitute_nav(&source.html, main_nav);
            if source.is_template() {
                templates.insert(source.file_name.clone(), html);
            } else {
                pages.push(OutputFile::new(source.output_path(), html));
            }
        }

        (templates, pages)
    }
}

/// Asset pipeline utilities.
pub struct AssetPipeline {
    source_dir: PathBuf,
}

impl AssetPipeline {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Read the whole source tree.
    pub fn load(&self) -> Result<SourceTree, BuildError> {
        if !self.source_dir.is_dir() {
            return Err(BuildError::ReadError(format!(
                "Source directory not found: {}",
                self.source_dir.display()
            )));
        }

        let mut tree = SourceTree::default();
        let mut html_files = Vec::new();

        let walker = WalkDir::new(&self.source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
            });

        for entry in walker {
            let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.source_dir).unwrap_or(path);
            let path_slug = dir_slug(relative);
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();

            let bytes = fs::read(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            if extension == "html" {
                html_files.push((path_slug, file_name, bytes));
            } else if BUSTED_EXTENSIONS.contains(&extension.as_str()) {
                let busted = busted_name(&file_name, &extension, &bytes);
                tracing::debug!("{} -> {}/{}", relative.display(), path_slug, busted);
                tree.busting.insert(&path_slug, &file_name, &busted);
                tree.assets
                    .push(OutputFile::new(Path::new(&path_slug).join(busted), bytes));
            } else {
                tree.assets
                    .push(OutputFile::new(Path::new(&path_slug).join(&file_name), bytes));
            }
        }

        // Hashed names must be known before any HTML is rewritten
        for (path_slug, file_name, bytes) in html_files {
            let html = String::from_utf8(bytes).map_err(|e| {
                BuildError::ReadError(format!("{}/{}: {}", path_slug, file_name, e))
            })?;
            tree.html.push(HtmlSource {
                html: tree.busting.rewrite(&path_slug, &html),
                path_slug,
                file_name,
            });
        }

        Ok(tree)
    }
}

/// Slug of the directory part of a source-relative path.
fn dir_slug(relative: &Path) -> String {
    let dir = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();
    slugify(&dir)
}

/// First characters of the SHA-256 of `bytes`, as lowercase hex.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    digest[..HASH_LEN].to_string()
}

/// `style.css` → `style.<hash>.css`
fn busted_name(file_name: &str, extension: &str, bytes: &[u8]) -> String {
    let stem = file_name
        .strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(file_name);
    format!("{}.{}.{}", stem, content_hash(bytes), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn hash_is_first_twelve_hex_chars_of_sha256() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
        assert_eq!(content_hash(b"abc"), "ba7816bf8f01");
    }

    #[test]
    fn busted_name_inserts_hash_before_extension() {
        assert_eq!(busted_name("main.css", "css", b"abc"), "main.ba7816bf8f01.css");
        assert_eq!(busted_name("app.min.js", "js", b"abc"), "app.min.ba7816bf8f01.js");
    }

    #[test]
    fn loads_assets_with_hashed_names() {
        let temp = tempdir().unwrap();
        write(temp.path(), "Stil Mapp/main.css", "abc");
        write(temp.path(), "bild.png", "png");

        let tree = AssetPipeline::new(temp.path()).load().unwrap();

        let paths: Vec<_> = tree.assets.iter().map(|f| f.path.clone()).collect();
        assert!(paths.contains(&PathBuf::from("stil-mapp/main.ba7816bf8f01.css")));
        assert!(paths.contains(&PathBuf::from("bild.png")));
        assert_eq!(
            tree.busting.get("stil-mapp", "main.css"),
            Some("main.ba7816bf8f01.css")
        );
    }

    #[test]
    fn rewrites_references_in_html() {
        let temp = tempdir().unwrap();
        write(temp.path(), "css/main.css", "abc");
        write(temp.path(), "app.js", "abc");
        write(
            temp.path(),
            "_default-content.html",
            r#"<link href="/css/main.css"><script src="app.js"></script><script src="/app.js"></script>"#,
        );
        write(temp.path(), "css/preview.html", r#"<link href="main.css">"#);

        let tree = AssetPipeline::new(temp.path()).load().unwrap();

        let template = tree.html.iter().find(|h| h.is_template()).unwrap();
        assert_eq!(
            template.html,
            r#"<link href="/css/main.ba7816bf8f01.css"><script src="app.ba7816bf8f01.js"></script><script src="/app.ba7816bf8f01.js"></script>"#
        );
        let preview = tree.html.iter().find(|h| !h.is_template()).unwrap();
        assert_eq!(preview.html, r#"<link href="main.ba7816bf8f01.css">"#);
    }

    #[test]
    fn splits_templates_from_pages() {
        let temp = tempdir().unwrap();
        write(temp.path(), "_default-content.html", "<nav>{{main-nav}}</nav>{{content}}");
        write(temp.path(), "om/kontakt.html", "{{main-nav}}<p>Ring oss</p>");

        let tree = AssetPipeline::new(temp.path()).load().unwrap();
        let (templates, pages) = tree.templates("NAV");

        assert_eq!(
            templates.get("_default-content.html"),
            Some("<nav>NAV</nav>{{content}}")
        );
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, Path::new("om/kontakt.html"));
        assert_eq!(pages[0].text(), Some("NAV<p>Ring oss</p>"));
    }

    #[test]
    fn skips_hidden_files() {
        let temp = tempdir().unwrap();
        write(temp.path(), ".DS_Store", "x");
        write(temp.path(), "style.css", "x");

        let tree = AssetPipeline::new(temp.path()).load().unwrap();

        assert_eq!(tree.assets.len(), 1);
    }

    #[test]
    fn missing_source_dir_is_an_error() {
        let temp = tempdir().unwrap();

        let result = AssetPipeline::new(temp.path().join("saknas")).load();

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }
}
