//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::ContentPath;
use crate::Site;

const DEFAULT_SCAFFOLD: &str = r#"---
title: {{ title }}
date: {{ date }}
description: ''
tags: []
---
"#;

/// Create `<content_dir>/<folder>/<locale>.<slug>.<ext>` from the scaffold
///
/// The folder defaults to the slug; give the folder of an existing article to
/// add a translation of it.
pub fn create_post(
    site: &Site,
    title: &str,
    locale: &str,
    folder: Option<&str>,
) -> Result<PathBuf> {
    let routing = site.routing();
    if !routing.is_supported(locale) {
        anyhow::bail!(
            "Unknown locale: {}. Available: {}",
            locale,
            routing.locales().join(", ")
        );
    }

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    let content_path = ContentPath {
        folder: folder.map(slug::slugify).unwrap_or_else(|| slug.clone()),
        locale: locale.to_string(),
        slug,
        extension: site.config.content_extension.clone(),
    };
    let file_path = site.content_dir.join(content_path.relative_path());

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Load scaffold template
    let scaffold_path = site
        .base_dir
        .join("scaffolds")
        .join(format!("post.{}", content_path.extension));
    let scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    // A JSON string is a valid double-quoted YAML scalar
    let content = scaffold_content
        .replace("{{ title }}", &serde_json::to_string(title)?)
        .replace(
            "{{ date }}",
            &chrono::Local::now().format("%Y-%m-%d").to_string(),
        );

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, locale: Option<&str>, folder: Option<&str>) -> Result<()> {
    let routing = site.routing();
    let locale = locale.unwrap_or(routing.default_locale());
    create_post(site, title, locale, folder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_post_loads() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_post(&site, "Hello: World", "en", None).unwrap();
        assert_eq!(
            path,
            site.content_dir.join("hello-world/en.hello-world.mdx")
        );

        let posts = site.get_all_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].metadata.title.as_deref(), Some("Hello: World"));
        assert_eq!(posts[0].metadata.slug, "hello-world");
    }

    #[test]
    fn test_new_translation_in_existing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        create_post(&site, "Hello World", "en", None).unwrap();
        let path = create_post(&site, "Hola Mundo", "es", Some("hello-world")).unwrap();
        assert_eq!(path, site.content_dir.join("hello-world/es.hola-mundo.mdx"));
    }

    #[test]
    fn test_new_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        create_post(&site, "Hello World", "en", None).unwrap();
        assert!(create_post(&site, "Hello World", "en", None).is_err());
    }

    #[test]
    fn test_new_rejects_unknown_locale() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(create_post(&site, "Bonjour", "fr", None).is_err());
    }

    #[test]
    fn test_new_uses_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("scaffolds")).unwrap();
        fs::write(
            dir.path().join("scaffolds/post.mdx"),
            "---\ntitle: {{ title }}\n---\nWrite here\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_post(&site, "Scaffolded", "en", None).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "---\ntitle: \"Scaffolded\"\n---\nWrite here\n");
    }
}
