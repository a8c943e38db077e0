//! Locale home pages: `<pages_dir>/<locale>.<ext>`

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};

use crate::content::{FrontMatter, ValidationMode};
use crate::i18n::Routing;

/// A locale's home page document
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub locale: String,
    pub front_matter: FrontMatter,
    pub content: String,
    pub source: PathBuf,
}

/// Result of looking up a locale page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Found(Page),
    NotFound,
}

/// Resolves locale pages from the pages directory
pub struct PageResolver {
    pages_dir: PathBuf,
    extension: String,
    routing: Routing,
}

impl PageResolver {
    pub fn new<P: AsRef<Path>>(pages_dir: P, extension: &str, routing: Routing) -> Self {
        Self {
            pages_dir: pages_dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
            routing,
        }
    }

    /// Path the page for `locale` would be read from
    pub fn page_path(&self, locale: &str) -> PathBuf {
        self.pages_dir.join(format!("{}.{}", locale, self.extension))
    }

    /// Load the page for `locale`
    ///
    /// Unsupported locales and missing documents are `NotFound`; other read
    /// errors propagate.
    pub async fn resolve(&self, locale: &str) -> Result<PageOutcome> {
        if !self.routing.is_supported(locale) {
            tracing::debug!("Locale {} is not configured", locale);
            return Ok(PageOutcome::NotFound);
        }

        let path = self.page_path(locale);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No page document at {:?}", path);
                return Ok(PageOutcome::NotFound);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read page {}", path.display()))
            }
        };

        // Lenient parsing never fails
        let (front_matter, body) = FrontMatter::parse(&raw, ValidationMode::Lenient)
            .with_context(|| format!("failed to parse page {}", path.display()))?;

        Ok(PageOutcome::Found(Page {
            locale: locale.to_string(),
            front_matter,
            content: body.to_string(),
            source: path,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn resolver(dir: &Path) -> PageResolver {
        PageResolver::new(
            dir,
            "mdx",
            Routing::new(vec!["en".to_string(), "es".to_string()], "en"),
        )
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("es.mdx"),
            "---\ntitle: Hola\n---\n# Soy Carlos\n",
        )
        .unwrap();

        match resolver(dir.path()).resolve("es").await.unwrap() {
            PageOutcome::Found(page) => {
                assert_eq!(page.locale, "es");
                assert_eq!(page.front_matter.title.as_deref(), Some("Hola"));
                assert_eq!(page.content, "# Soy Carlos\n");
                assert_eq!(page.source, dir.path().join("es.mdx"));
            }
            PageOutcome::NotFound => panic!("expected page"),
        }
    }

    #[tokio::test]
    async fn test_resolve_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = resolver(dir.path()).resolve("en").await.unwrap();
        assert_eq!(outcome, PageOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_unsupported_locale() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fr.mdx"), "Bonjour").unwrap();
        let outcome = resolver(dir.path()).resolve("fr").await.unwrap();
        assert_eq!(outcome, PageOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_directory_in_place_of_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("en.mdx")).unwrap();
        assert!(resolver(dir.path()).resolve("en").await.is_err());
    }
}
