//! Content module - loads MDX posts and renders their bodies

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod path;
mod post;

pub use error::{ContentError, ContentErrorKind};
pub use frontmatter::{FrontMatter, Metadata, ValidationMode};
pub use loader::{read_content_file, ContentLoader, LoadFailure, LoadReport};
pub use markdown::{html_escape, strip_mdx_esm, MarkdownRenderer};
pub use path::ContentPath;
pub use post::{by_locale, sort_by_date_desc, tag_counts, translations_of, url_segment, Post};
