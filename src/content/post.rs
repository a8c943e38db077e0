//! Post model and collection helpers

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use super::Metadata;

// Everything that cannot appear raw in a path segment or an HTML attribute
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode one URL path segment
pub fn url_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// A blog post: one locale of one article folder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Locale from the file name
    pub locale: String,

    /// Parsed front-matter plus the file-derived slug
    pub metadata: Metadata,

    /// Markdown body with the front-matter removed
    pub content: String,

    /// Name of the article directory
    pub folder: String,

    /// Source file path relative to the content root
    pub source: PathBuf,
}

impl Post {
    /// URL path of the rendered post, e.g. `/en/blog/my-post/`
    pub fn url_path(&self) -> String {
        format!(
            "/{}/blog/{}/",
            url_segment(&self.locale),
            url_segment(&self.folder)
        )
    }
}

/// Posts written in `locale`
pub fn by_locale<'a>(posts: &'a [Post], locale: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.locale == locale).collect()
}

/// All translations of the article stored in `folder`
pub fn translations_of<'a>(posts: &'a [Post], folder: &str) -> Vec<&'a Post> {
    let mut found: Vec<_> = posts.iter().filter(|p| p.folder == folder).collect();
    found.sort_by(|a, b| a.locale.cmp(&b.locale));
    found
}

/// Sort newest first; undated posts go last, ties break on folder then locale
pub fn sort_by_date_desc<P: AsRef<Post>>(posts: &mut [P]) {
    posts.sort_by(|a, b| compare_date_desc(a.as_ref(), b.as_ref()));
}

fn compare_date_desc(a: &Post, b: &Post) -> Ordering {
    match (a.metadata.parse_date(), b.metadata.parse_date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.metadata.date.cmp(&a.metadata.date),
    }
    .then_with(|| a.folder.cmp(&b.folder))
    .then_with(|| a.locale.cmp(&b.locale))
}

impl AsRef<Post> for Post {
    fn as_ref(&self) -> &Post {
        self
    }
}

/// Tag usage counts, most used first, then alphabetical
pub fn tag_counts<P: AsRef<Post>>(posts: &[P]) -> Vec<(String, usize)> {
    let mut tags: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.as_ref().metadata.tags {
            *tags.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<_> = tags
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags
}
