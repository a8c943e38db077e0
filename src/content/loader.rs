//! Content loader - builds posts from the content directory
//!
//! Layout: one directory per article, one `<locale>.<slug>.<ext>` file per
//! translation inside it. Every file is read and parsed on its own task.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::task::{self, JoinSet};
use walkdir::WalkDir;

use super::{ContentError, ContentPath, FrontMatter, Metadata, Post, ValidationMode};
use crate::Site;

/// Outcome of a load that keeps going past per-file failures
#[derive(Debug, Default)]
pub struct LoadReport {
    pub posts: Vec<Post>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A content file that could not be turned into a post
#[derive(Debug)]
pub struct LoadFailure {
    /// Path relative to the content root
    pub path: PathBuf,
    pub error: ContentError,
}

/// Serializable view of a [`LoadFailure`]
#[derive(Debug, Serialize)]
pub struct FailureSummary<'a> {
    pub path: &'a Path,
    pub kind: super::ContentErrorKind,
    pub message: String,
}

impl LoadFailure {
    pub fn summary(&self) -> FailureSummary<'_> {
        FailureSummary {
            path: &self.path,
            kind: self.error.kind(),
            message: self.error.to_string(),
        }
    }
}

/// Loads posts from a content root
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
    extension: String,
    validation: ValidationMode,
}

impl ContentLoader {
    /// Create a loader for `root` with the default `mdx` extension
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: "mdx".to_string(),
            validation: ValidationMode::default(),
        }
    }

    /// Loader configured from the site settings
    pub fn for_site(site: &Site) -> Self {
        Self::new(&site.content_dir)
            .with_extension(&site.config.content_extension)
            .with_validation(site.config.validation)
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List content files as paths relative to the root, sorted by name
    pub fn enumerate(&self) -> Result<Vec<PathBuf>, ContentError> {
        if !self.root.is_dir() {
            return Err(ContentError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                let io = e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop")
                });
                ContentError::from_dir_io(&path, io)
            })?;

            let path = entry.path();
            if entry.depth() == 1 {
                if !entry.file_type().is_dir() {
                    tracing::debug!("Skipping stray file in content root: {:?}", path);
                }
                continue;
            }

            if entry.file_type().is_file() && self.is_content_file(path) {
                let relative = path.strip_prefix(&self.root).unwrap_or(path);
                files.push(relative.to_path_buf());
            }
        }

        tracing::debug!("Found {} content files under {:?}", files.len(), self.root);
        Ok(files)
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }

    /// Build every post; the first failure fails the whole load
    pub async fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
        let files = self.enumerate()?;
        let (mut tasks, _) = self.spawn_all(files);
        let mut posts = Vec::with_capacity(tasks.len());

        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(|e| ContentError::TaskFailed {
                message: e.to_string(),
            })?;
            // Returning early drops the set, which aborts the remaining tasks
            posts.push(result?);
        }

        if let Some(duplicate) = take_duplicates(&mut posts).into_iter().next() {
            return Err(duplicate.error);
        }

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.root);
        Ok(posts)
    }

    /// Build every post that can be built and report the rest
    ///
    /// Only a failure to list the root directory is returned as an error.
    pub async fn load_posts_partial(&self) -> Result<LoadReport, ContentError> {
        let files = self.enumerate()?;
        let (tasks, paths) = self.spawn_all(files);
        Ok(collect_report(tasks, paths).await)
    }

    fn spawn_all(&self, files: Vec<PathBuf>) -> (JoinSet<PostResult>, HashMap<task::Id, PathBuf>) {
        let mut tasks = JoinSet::new();
        let mut paths = HashMap::with_capacity(files.len());
        for relative in files {
            let root = self.root.clone();
            let validation = self.validation;
            let path = relative.clone();
            let handle = tasks.spawn(async move { load_post(&root, &relative, validation).await });
            paths.insert(handle.id(), path);
        }
        (tasks, paths)
    }
}

type PostResult = Result<Post, ContentError>;

/// Drain `tasks`, naming each failure after the file its task was loading
async fn collect_report(
    mut tasks: JoinSet<PostResult>,
    mut paths: HashMap<task::Id, PathBuf>,
) -> LoadReport {
    let mut report = LoadReport::default();

    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, result) = match joined {
            Ok(pair) => pair,
            Err(e) => (
                e.id(),
                Err(ContentError::TaskFailed {
                    message: e.to_string(),
                }),
            ),
        };
        let path = paths.remove(&id).unwrap_or_default();

        match result {
            Ok(post) => report.posts.push(post),
            Err(error) => {
                tracing::warn!("Failed to load post {:?}: {}", path, error);
                report.failures.push(LoadFailure { path, error });
            }
        }
    }

    let duplicates = take_duplicates(&mut report.posts);
    report.failures.extend(duplicates);
    report.failures.sort_by(|a, b| a.path.cmp(&b.path));
    report
}

/// Remove every post whose (folder, locale) pair an earlier file already took
///
/// Posts end up sorted by source path; the first file of a pair is kept.
fn take_duplicates(posts: &mut Vec<Post>) -> Vec<LoadFailure> {
    posts.sort_by(|a, b| a.source.cmp(&b.source));

    let mut seen: HashMap<(String, String), PathBuf> = HashMap::new();
    let mut failures = Vec::new();

    posts.retain(|post| {
        let key = (post.folder.clone(), post.locale.clone());
        match seen.get(&key) {
            Some(first) => {
                failures.push(LoadFailure {
                    path: post.source.clone(),
                    error: ContentError::DuplicateTranslation {
                        folder: post.folder.clone(),
                        locale: post.locale.clone(),
                        first: first.clone(),
                        second: post.source.clone(),
                    },
                });
                false
            }
            None => {
                seen.insert(key, post.source.clone());
                true
            }
        }
    });

    failures
}

/// Read a content file and split it into front-matter and body
pub async fn read_content_file(
    path: &Path,
    validation: ValidationMode,
) -> Result<(FrontMatter, String), ContentError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::FileReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let (fm, body) =
        FrontMatter::parse(&raw, validation).map_err(|e| ContentError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok((fm, body.to_string()))
}

/// Build one post from `root/relative`
async fn load_post(
    root: &Path,
    relative: &Path,
    validation: ValidationMode,
) -> Result<Post, ContentError> {
    let parsed = ContentPath::parse(relative)?;
    let (fm, content) = read_content_file(&root.join(relative), validation).await?;

    if validation == ValidationMode::Strict {
        if let Some(field) = fm.missing_field() {
            return Err(ContentError::MissingField {
                path: relative.to_path_buf(),
                field,
            });
        }
    }

    tracing::debug!("Parsed {}", parsed);

    Ok(Post {
        locale: parsed.locale,
        metadata: Metadata::from_front_matter(fm, parsed.slug),
        content,
        folder: parsed.folder,
        source: relative.to_path_buf(),
    })
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}
