//! Content loading errors

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The kind of failure behind a [`ContentError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentErrorKind {
    DirectoryNotFound,
    FileReadFailed,
    ParseFailed,
    MalformedFilename,
    MissingField,
    DuplicateTranslation,
    TaskFailed,
}

/// Errors raised while scanning and parsing the content directory
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse front-matter in {}: {message}", path.display())]
    ParseFailed { path: PathBuf, message: String },

    #[error("malformed content filename {}: {reason}", path.display())]
    MalformedFilename { path: PathBuf, reason: String },

    #[error("{} is missing required front-matter field '{field}'", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error(
        "{} and {} are both the '{locale}' translation of '{folder}'",
        first.display(),
        second.display()
    )]
    DuplicateTranslation {
        folder: String,
        locale: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("content task failed: {message}")]
    TaskFailed { message: String },
}

impl ContentError {
    pub fn kind(&self) -> ContentErrorKind {
        match self {
            ContentError::DirectoryNotFound { .. } => ContentErrorKind::DirectoryNotFound,
            ContentError::FileReadFailed { .. } => ContentErrorKind::FileReadFailed,
            ContentError::ParseFailed { .. } => ContentErrorKind::ParseFailed,
            ContentError::MalformedFilename { .. } => ContentErrorKind::MalformedFilename,
            ContentError::MissingField { .. } => ContentErrorKind::MissingField,
            ContentError::DuplicateTranslation { .. } => ContentErrorKind::DuplicateTranslation,
            ContentError::TaskFailed { .. } => ContentErrorKind::TaskFailed,
        }
    }

    /// The file or directory the error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ContentError::DirectoryNotFound { path }
            | ContentError::FileReadFailed { path, .. }
            | ContentError::ParseFailed { path, .. }
            | ContentError::MalformedFilename { path, .. }
            | ContentError::MissingField { path, .. } => Some(path.as_path()),
            ContentError::DuplicateTranslation { second, .. } => Some(second.as_path()),
            ContentError::TaskFailed { .. } => None,
        }
    }

    /// Map an I/O error raised while listing the directory `path`
    pub(crate) fn from_dir_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ContentError::DirectoryNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ContentError::FileReadFailed {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_path() {
        let err = ContentError::MalformedFilename {
            path: PathBuf::from("post/readme.mdx"),
            reason: "missing slug".to_string(),
        };
        assert_eq!(err.kind(), ContentErrorKind::MalformedFilename);
        assert_eq!(err.path(), Some(Path::new("post/readme.mdx")));
        assert!(err.to_string().contains("missing slug"));

        let err = ContentError::TaskFailed {
            message: "panicked".to_string(),
        };
        assert_eq!(err.kind(), ContentErrorKind::TaskFailed);
        assert!(err.path().is_none());
    }

    #[test]
    fn test_duplicate_translation_names_both_files() {
        let err = ContentError::DuplicateTranslation {
            folder: "a".to_string(),
            locale: "en".to_string(),
            first: PathBuf::from("a/en.one.mdx"),
            second: PathBuf::from("a/en.two.mdx"),
        };
        assert_eq!(err.kind(), ContentErrorKind::DuplicateTranslation);
        assert_eq!(err.path(), Some(Path::new("a/en.two.mdx")));
        let message = err.to_string();
        assert!(message.contains("a/en.one.mdx"));
        assert!(message.contains("a/en.two.mdx"));
    }

    #[test]
    fn test_from_io_not_found() {
        let err = ContentError::from_dir_io(
            Path::new("missing"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ContentErrorKind::DirectoryNotFound);

        let err = ContentError::from_dir_io(
            Path::new("locked"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ContentErrorKind::FileReadFailed);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ContentErrorKind::DirectoryNotFound).unwrap();
        assert_eq!(json, "\"directory_not_found\"");
    }
}
