//! Page templates and placeholder substitution.
//!
//! Templates are plain HTML with `{{name}}` placeholders. Substitution is
//! literal: values are inserted as they are and are never scanned for further
//! placeholders, and unknown placeholders are left in the output.

use std::collections::HashMap;

use crate::builder::BuildError;
use crate::router::DEFAULT_TEMPLATE;

pub const TITLE: &str = "{{title}}";
pub const FEATURED_IMAGE: &str = "{{featured_image}}";
pub const CONTENT: &str = "{{content}}";
pub const MAIN_NAV: &str = "{{main-nav}}";
pub const BREADCRUMBS: &str = "{{breadcrumbs}}";
pub const CONTENT_INDEX: &str = "{{content-index}}";

/// Values substituted into a page template.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Featured image fragment
    pub featured_image: String,
    /// Rendered body
    pub content: String,
    /// Site navigation
    pub main_nav: String,
    /// Breadcrumb trail
    pub breadcrumbs: String,
    /// Card grid of sibling pages
    pub content_index: String,
}

impl PageContext {
    fn values(&self) -> [(&'static str, &str); 6] {
        [
            (TITLE, self.title.as_str()),
            (FEATURED_IMAGE, self.featured_image.as_str()),
            (CONTENT, self.content.as_str()),
            (MAIN_NAV, self.main_nav.as_str()),
            (BREADCRUMBS, self.breadcrumbs.as_str()),
            (CONTENT_INDEX, self.content_index.as_str()),
        ]
    }
}

/// Replace every known placeholder in `template`.
pub fn compose(template: &str, context: &PageContext) -> String {
    let values = context.values();
    let mut out = String::with_capacity(template.len() + context.content.len());
    let mut rest = template;

    while let Some(pos) = rest.find("{{") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match values.iter().find(|(placeholder, _)| tail.starts_with(placeholder)) {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push_str("{{");
                rest = &tail[2..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Replace only the navigation placeholder. Used for pages copied straight
/// from the source tree.
pub fn substitute_nav(html: &str, main_nav: &str) -> String {
    html.replace(MAIN_NAV, main_nav)
}

/// In-memory page templates, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<String, String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, html: impl Into<String>) {
        self.templates.insert(name.into(), html.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Look up a template, falling back to the default content template.
    pub fn resolve(&self, name: &str) -> Result<&str, BuildError> {
        if let Some(html) = self.get(name) {
            return Ok(html);
        }
        if name != DEFAULT_TEMPLATE {
            tracing::debug!("Template {} not found, using {}", name, DEFAULT_TEMPLATE);
        }
        self.get(DEFAULT_TEMPLATE)
            .ok_or_else(|| BuildError::TemplateError(format!("Template not found: {}", name)))
    }

    /// Render a page using the named template.
    pub fn render_page(&self, name: &str, context: &PageContext) -> Result<String, BuildError> {
        Ok(compose(self.resolve(name)?, context))
    }
}
