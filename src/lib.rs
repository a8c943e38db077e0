//! mdx-blog: a multilingual blog built from MDX content folders
//!
//! Articles live in `<content_dir>/<folder>/<locale>.<slug>.mdx`. The crate
//! loads them into typed posts, renders a static site per locale and can
//! serve it with host-based redirects.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod i18n;
pub mod pages;
pub mod redirect;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentError, ContentLoader, LoadReport, Post};

/// A blog site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Article folders
    pub content_dir: PathBuf,
    /// Locale home pages
    pub pages_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Translation files
    pub languages_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let pages_dir = base_dir.join(&config.pages_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let languages_dir = base_dir.join(&config.languages_dir);

        Self {
            config,
            base_dir,
            content_dir,
            pages_dir,
            public_dir,
            languages_dir,
        }
    }

    /// Locale routing for this site
    pub fn routing(&self) -> i18n::Routing {
        i18n::Routing::from_config(&self.config.i18n)
    }

    /// Every post of every locale, freshly read from disk
    pub async fn get_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        ContentLoader::for_site(self).load_posts().await
    }

    /// Every post that loads, plus the files that did not
    pub async fn get_posts_partial(&self) -> Result<LoadReport, ContentError> {
        ContentLoader::for_site(self).load_posts_partial().await
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.content_dir, dir.path().join("src/content/blog"));
        assert_eq!(site.pages_dir, dir.path().join("src/app"));
        assert_eq!(site.public_dir, dir.path().join("public"));
        assert_eq!(site.routing().default_locale(), "en");
    }

    #[test]
    fn test_site_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "content_dir: posts\ni18n:\n  locales: [es]\n  default_locale: es\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.content_dir, dir.path().join("posts"));
        assert_eq!(site.routing().locales(), &["es".to_string()]);
    }

    #[test]
    fn test_site_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "i18n:\n  locales: [es]\n  default_locale: en\n",
        )
        .unwrap();
        assert!(Site::new(dir.path()).is_err());
    }

    #[tokio::test]
    async fn test_get_all_posts() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("src/content/blog/first");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("en.first.mdx"), "---\ntitle: First\n---\nHi\n").unwrap();
        fs::write(folder.join("es.primero.mdx"), "---\ntitle: Primero\n---\nHola\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let posts = site.get_all_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(content::by_locale(&posts, "es")[0].metadata.slug, "primero");
    }
}
