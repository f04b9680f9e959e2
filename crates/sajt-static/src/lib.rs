//! Static site generator for sajt.
//!
//! Builds a static site from a tree of content files and a tree of HTML, CSS
//! and JavaScript sources.

pub mod assets;
pub mod builder;
pub mod content;
pub mod content_index;
pub mod fragments;
pub mod nav;
pub mod output;
pub mod router;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SitePlan, StaticBuilder};
pub use content::{discover_content, ContentItem};
pub use output::{GitPreserver, OutputFile, SiteOutput, WipeHook};
