//! Internationalization (i18n) support: locale routing and UI strings

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::I18nConfig;

const BUILTIN_EN: &str = r#"
site:
  home: Home
  blog: Blog
blog:
  title: Blog
  description: Blog
  heading: Articles
  empty: No posts yet.
  translations: Also available in
  original: Originally published at
not_found:
  title: Page not found
  message: The page you are looking for does not exist.
"#;

const BUILTIN_ES: &str = r#"
site:
  home: Inicio
  blog: Blog
blog:
  title: Blog
  description: Blog
  heading: Artículos
  empty: Todavía no hay artículos.
  translations: También disponible en
  original: Publicado originalmente en
not_found:
  title: Página no encontrada
  message: La página que buscas no existe.
"#;

/// Supported locales and the default one
#[derive(Debug, Clone)]
pub struct Routing {
    locales: Vec<String>,
    default_locale: String,
}

/// Route parameters for one statically generated locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleParams {
    pub locale: String,
}

impl Routing {
    pub fn new(locales: Vec<String>, default_locale: &str) -> Self {
        Self {
            locales,
            default_locale: default_locale.to_string(),
        }
    }

    pub fn from_config(config: &I18nConfig) -> Self {
        Self::new(config.locales.clone(), &config.default_locale)
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn is_supported(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// One parameter set per locale, in configuration order
    pub fn static_params(&self) -> Vec<LocaleParams> {
        self.locales
            .iter()
            .map(|locale| LocaleParams {
                locale: locale.clone(),
            })
            .collect()
    }

    /// Pick a locale from an `Accept-Language` header value
    pub fn negotiate(&self, accept_language: Option<&str>) -> &str {
        let Some(header) = accept_language else {
            return &self.default_locale;
        };

        let mut ranges: Vec<(&str, f32)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((tag, quality))
            })
            .filter(|(_, q)| *q > 0.0)
            .collect();
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (tag, _) in ranges {
            let primary = tag.split('-').next().unwrap_or(tag);
            let found = self
                .locales
                .iter()
                .find(|l| l.eq_ignore_ascii_case(tag))
                .or_else(|| self.locales.iter().find(|l| l.eq_ignore_ascii_case(primary)));
            if let Some(locale) = found {
                return locale;
            }
        }

        &self.default_locale
    }
}

/// Internationalization handler
pub struct I18n {
    /// Language consulted when a key is missing
    fallback: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl I18n {
    /// Create a handler seeded with the built-in strings
    pub fn new(fallback: &str) -> Self {
        let mut translations = HashMap::new();
        for (lang, source) in [("en", BUILTIN_EN), ("es", BUILTIN_ES)] {
            let data: HashMap<String, serde_yaml::Value> =
                serde_yaml::from_str(source).unwrap_or_default();
            translations.insert(lang.to_string(), data);
        }

        Self {
            fallback: fallback.to_string(),
            translations,
        }
    }

    /// Load language files from a directory, layering them over what is loaded
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml") | Some("json")) {
                continue;
            }

            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read language file {}", path.display()))?;

            // JSON documents are valid YAML
            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    let target = self.translations.entry(lang.to_string()).or_default();
                    for (key, value) in data {
                        match target.get_mut(&key) {
                            Some(existing) => merge_values(existing, value),
                            None => {
                                target.insert(key, value);
                            }
                        }
                    }
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// All translations of `lang` with dot-notation keys, missing keys
    /// filled from the fallback language
    pub fn get_all_translations_for(&self, lang: &str) -> HashMap<String, String> {
        let mut result = HashMap::new();

        if let Some(lang_data) = self.translations.get(lang) {
            flatten_translations(lang_data, "", &mut result);
        }

        if lang != self.fallback {
            if let Some(fallback_data) = self.translations.get(&self.fallback) {
                let mut fallback_result = HashMap::new();
                flatten_translations(fallback_data, "", &mut fallback_result);
                for (k, v) in fallback_result {
                    result.entry(k).or_insert(v);
                }
            }
        }

        result
    }
}

/// Deep-merge `overlay` into `base`; mappings merge, anything else replaces
fn merge_values(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(
    data: &HashMap<String, serde_yaml::Value>,
    prefix: &str,
    result: &mut HashMap<String, String>,
) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: HashMap<String, serde_yaml::Value> = map
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {}
            scalar => {
                result.insert(full_key, yaml_value_to_string(scalar));
            }
        }
    }
}
