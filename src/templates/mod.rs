//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is off: text fields are
//! escaped when the context data is built, rendered markdown goes in as is.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // URLs and rendered HTML must not be escaped
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("404.html", include_str!("site/404.html")),
            ("redirect.html", include_str!("site/redirect.html")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    let s = s.trim();
    if s.chars().count() <= length {
        Ok(tera::Value::String(s.to_string()))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Turn `{"blog.title": "Blog"}` into `{"blog": {"title": "Blog"}}` for templates
pub fn nest_translations(flat: &HashMap<String, String>) -> tera::Value {
    let mut root = tera::Map::new();

    let mut keys: Vec<_> = flat.keys().collect();
    keys.sort();

    for key in keys {
        let parts: Vec<&str> = key.split('.').collect();
        insert_nested(&mut root, &parts, &flat[key]);
    }

    tera::Value::Object(root)
}

fn insert_nested(map: &mut tera::Map<String, tera::Value>, parts: &[&str], value: &str) {
    match parts {
        [] => {}
        [last] => {
            map.insert(last.to_string(), tera::Value::String(value.to_string()));
        }
        [first, rest @ ..] => {
            let child = map
                .entry(first.to_string())
                .or_insert_with(|| tera::Value::Object(tera::Map::new()));
            if !child.is_object() {
                *child = tera::Value::Object(tera::Map::new());
            }
            if let tera::Value::Object(child_map) = child {
                insert_nested(child_map, rest, value);
            }
        }
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub folder: String,
    pub locale: String,
    pub date: String,
    pub date_iso: String,
    pub description: String,
    pub tags: Vec<String>,
    pub original_uri: String,
    pub url: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocaleLink {
    pub locale: String,
    pub url: String,
}
