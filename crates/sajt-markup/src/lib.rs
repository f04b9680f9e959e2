//! Markup layer for sajt content files.
//!
//! Splits content files into settings and body, derives URL slugs from display
//! names, and turns the line-oriented body markup into HTML.

pub mod frontmatter;
pub mod rules;
pub mod slug;
pub mod transform;

pub use frontmatter::{parse_front_matter, FrontMatter, FrontMatterError, SettingValue, Settings};
pub use rules::LineRule;
pub use slug::slugify;
pub use transform::transform;
