//! Static site builder.

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use sajt_markup::{transform, FrontMatterError};

use crate::assets::AssetPipeline;
use crate::content::{discover_content, ContentItem};
use crate::content_index::ContentIndex;
use crate::fragments;
use crate::nav::NavTree;
use crate::output::{reset_output_dir, GitPreserver, OutputFile, SiteOutput};
use crate::router::PageKind;
use crate::templates::{PageContext, TemplateSet};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Content files (`<type>/<name>.md`)
    pub content_dir: PathBuf,

    /// HTML templates, CSS, JavaScript and other static files
    pub source_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Leave drafts out of the site
    pub publish: bool,

    /// Slug of the content type rendered as dictionary entries
    pub dictionary_type: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            source_dir: PathBuf::from("source"),
            output_dir: PathBuf::from("out"),
            publish: false,
            dictionary_type: "dictionary".to_string(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of content pages generated
    pub pages: usize,

    /// Number of files copied from the source tree
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Everything planned for one build, before anything is written.
#[derive(Debug)]
pub struct SitePlan {
    pub output: SiteOutput,
    pub pages: usize,
    pub assets: usize,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the site: plan every file, then replace the output directory.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let plan = self.plan()?;

        reset_output_dir(&self.config.output_dir, &mut GitPreserver::new())?;
        plan.output.write_to(&self.config.output_dir)?;

        Ok(BuildResult {
            pages: plan.pages,
            assets: plan.assets,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Produce every output file in memory without touching the output
    /// directory.
    pub fn plan(&self) -> Result<SitePlan, BuildError> {
        let publish = self.config.publish;
        let dictionary = self.config.dictionary_type.as_str();

        let source = AssetPipeline::new(&self.config.source_dir).load()?;
        let items = discover_content(&self.config.content_dir)?;

        let nav = NavTree::build(&items, publish, dictionary);
        if let Ok(json) = serde_json::to_string_pretty(&nav) {
            tracing::debug!("Navigation:\n{}", json);
        }
        let main_nav = nav.render();

        let (templates, html_pages) = source.templates(&main_nav);
        let index = ContentIndex::new(&items);

        let rendered: Vec<Vec<OutputFile>> = items
            .par_iter()
            .filter(|item| {
                let visible = item.is_visible(publish);
                if !visible {
                    tracing::debug!("Skipping draft {}", item.label());
                }
                visible
            })
            .map(|item| self.render_item(item, &templates, &index, &main_nav))
            .collect::<Result<_, _>>()?;

        let mut output = SiteOutput::new();
        let assets = source.assets.len() + html_pages.len();
        output.extend(source.assets);
        output.extend(html_pages);

        let pages = rendered.len();
        for files in rendered {
            output.extend(files);
        }

        Ok(SitePlan {
            output,
            pages,
            assets,
        })
    }

    /// Render one content item to its page, plus the bare fragment for
    /// dictionary entries.
    fn render_item(
        &self,
        item: &ContentItem,
        templates: &TemplateSet,
        index: &ContentIndex<'_>,
        main_nav: &str,
    ) -> Result<Vec<OutputFile>, BuildError> {
        let kind = PageKind::classify(item, &self.config.dictionary_type);

        let content_index = if kind.has_content_index() {
            index.render(&item.content_type_slug, self.config.publish)
        } else {
            String::new()
        };

        let context = PageContext {
            title: item.title().to_string(),
            featured_image: fragments::featured_image(&item.settings),
            content: transform(&item.raw_body),
            main_nav: main_nav.to_string(),
            breadcrumbs: fragments::breadcrumbs(item),
            content_index,
        };

        let html = templates.render_page(kind.template(), &context)?;
        tracing::debug!("Rendered {} with {}", item.label(), kind.template());

        let mut files = vec![OutputFile::new(kind.output_path(item), html)];
        if let Some(path) = kind.fragment_path(item) {
            files.push(OutputFile::new(path, context.content));
        }

        Ok(files)
    }
}
