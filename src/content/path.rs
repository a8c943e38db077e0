//! Content filename grammar: `<folder>/<locale>.<slug>.<ext>`

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::ContentError;

lazy_static! {
    // locale: up to the first dot; ext: after the last dot; slug: everything between
    static ref FILE_NAME: Regex =
        Regex::new(r"^(?P<locale>[^.]+)\.(?P<slug>.+)\.(?P<ext>[^.]+)$").unwrap();
}

/// The parts encoded in a content file's path relative to the content root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentPath {
    pub folder: String,
    pub locale: String,
    pub slug: String,
    pub extension: String,
}

impl ContentPath {
    /// Parse a path relative to the content root
    pub fn parse(relative: &Path) -> Result<Self, ContentError> {
        let malformed = |reason: &str| ContentError::MalformedFilename {
            path: relative.to_path_buf(),
            reason: reason.to_string(),
        };

        let mut parts = Vec::with_capacity(2);
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(
                    part.to_str()
                        .ok_or_else(|| malformed("path is not valid UTF-8"))?,
                ),
                _ => return Err(malformed("expected a plain <folder>/<file> path")),
            }
        }

        let [folder, file_name] = parts.as_slice() else {
            return Err(malformed("expected exactly <folder>/<file>"));
        };

        let captures = FILE_NAME
            .captures(file_name)
            .ok_or_else(|| malformed("file name must look like <locale>.<slug>.<ext>"))?;

        Ok(Self {
            folder: folder.to_string(),
            locale: captures["locale"].to_string(),
            slug: captures["slug"].to_string(),
            extension: captures["ext"].to_string(),
        })
    }

    /// Rebuild the relative path
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.folder).join(format!(
            "{}.{}.{}",
            self.locale, self.slug, self.extension
        ))
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}.{}.{}",
            self.folder, self.locale, self.slug, self.extension
        )
    }
}
