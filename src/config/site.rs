//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::ValidationMode;
use crate::redirect::RedirectRule;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub pages_dir: String,
    pub public_dir: String,
    pub languages_dir: String,

    // Content
    pub content_extension: String,
    pub validation: ValidationMode,
    #[serde(default)]
    pub highlight: HighlightConfig,
    pub date_format: String,

    // Internationalization
    #[serde(default)]
    pub i18n: I18nConfig,

    // Routing
    #[serde(default)]
    pub redirects: Vec<RedirectRule>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "src/content/blog".to_string(),
            pages_dir: "src/app".to_string(),
            public_dir: "public".to_string(),
            languages_dir: "languages".to_string(),

            content_extension: "mdx".to_string(),
            validation: ValidationMode::default(),
            highlight: HighlightConfig::default(),
            date_format: "%Y-%m-%d".to_string(),

            i18n: I18nConfig::default(),

            redirects: Vec::new(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.check()?;
        Ok(config)
    }

    /// Reject configurations the generator cannot work with
    pub fn check(&self) -> Result<()> {
        if self.i18n.locales.is_empty() {
            anyhow::bail!("i18n.locales must list at least one locale");
        }
        if !self.i18n.locales.contains(&self.i18n.default_locale) {
            anyhow::bail!(
                "i18n.default_locale '{}' is not one of {:?}",
                self.i18n.default_locale,
                self.i18n.locales
            );
        }
        if self.content_extension.is_empty() || self.content_extension.contains('.') {
            anyhow::bail!(
                "content_extension must be a bare extension like 'mdx', got '{}'",
                self.content_extension
            );
        }
        Ok(())
    }
}

/// Locale routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub locales: Vec<String>,
    pub default_locale: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string(), "es".to_string()],
            default_locale: "en".to_string(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "src/content/blog");
        assert_eq!(config.i18n.locales, vec!["en", "es"]);
        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(config.validation, ValidationMode::Lenient);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Carlos
content_dir: content/posts
validation: strict
i18n:
  locales: [es, en, pt]
  default_locale: es
redirects:
  - source: /
    host: meet.example.com
    destination: https://calendly.com/someone/30min
    permanent: false
analytics: plausible
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Carlos");
        assert_eq!(config.content_dir, "content/posts");
        assert_eq!(config.validation, ValidationMode::Strict);
        assert_eq!(config.i18n.locales, vec!["es", "en", "pt"]);
        assert_eq!(config.i18n.default_locale, "es");
        assert_eq!(config.redirects.len(), 1);
        assert_eq!(config.redirects[0].host.as_deref(), Some("meet.example.com"));
        assert!(config.extra.contains_key("analytics"));
        // Untouched sections keep their defaults
        assert_eq!(config.public_dir, "public");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_check_rejects_unknown_default_locale() {
        let mut config = SiteConfig::default();
        config.i18n.default_locale = "fr".to_string();
        assert!(config.check().is_err());

        let mut config = SiteConfig::default();
        config.i18n.locales.clear();
        assert!(config.check().is_err());
    }

    #[test]
    fn test_check_rejects_dotted_extension() {
        let mut config = SiteConfig::default();
        config.content_extension = ".mdx".to_string();
        assert!(config.check().is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SiteConfig::load(dir.path().join("_config.yml")).is_err());
    }
}
