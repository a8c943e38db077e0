//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: My Blog
description: ''
author: ''

# URL
url: http://localhost:4000
root: /

# Directory
content_dir: src/content/blog
pages_dir: src/app
public_dir: public
languages_dir: languages

# Content
content_extension: mdx
# lenient: missing fields become empty values; strict: they fail the load
validation: lenient
date_format: '%Y-%m-%d'
highlight:
  theme: base16-ocean.dark
  line_number: false

# Internationalization
i18n:
  locales: [en, es]
  default_locale: en

# Redirects
# - source: /
#   host: meet.example.com
#   destination: https://calendly.com/someone/30min
#   permanent: false
redirects: []
"#;

const HOME_EN: &str = r#"---
title: Home
---

# Hi there

Welcome to my blog. Read the [latest articles](/en/blog/).
"#;

const HOME_ES: &str = r#"---
title: Inicio
---

# Hola

Bienvenido a mi blog. Lee los [últimos artículos](/es/blog/).
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    // Create directory structure
    let content_dir = target_dir.join("src/content/blog/hello-world");
    fs::create_dir_all(&content_dir)?;
    fs::create_dir_all(target_dir.join("src/app"))?;
    fs::create_dir_all(target_dir.join("languages"))?;

    fs::write(&config_path, CONFIG)?;

    fs::write(target_dir.join("src/app/en.mdx"), HOME_EN)?;
    fs::write(target_dir.join("src/app/es.mdx"), HOME_ES)?;

    // One article, two translations
    let today = chrono::Local::now().format("%Y-%m-%d");
    let hello_en = format!(
        r#"---
title: Hello World
date: {}
description: My first post
tags: [welcome]
---

This is your very first post. Every article lives in its own folder, one
`<locale>.<slug>.mdx` file per translation.

```rust
fn main() {{
    println!("Hello, world!");
}}
```
"#,
        today
    );
    let hello_es = format!(
        r#"---
title: Hola Mundo
date: {}
description: Mi primer artículo
tags: [welcome]
---

Este es tu primer artículo.
"#,
        today
    );

    fs::write(content_dir.join("en.hello-world.mdx"), hello_en)?;
    fs::write(content_dir.join("es.hola-mundo.mdx"), hello_es)?;

    tracing::info!("Initialized site in {:?}", target_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{by_locale, ValidationMode};
    use crate::Site;

    #[tokio::test]
    async fn test_init_site_loads() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let mut site = Site::new(dir.path()).unwrap();
        site.config.validation = ValidationMode::Strict;
        let posts = site.get_all_posts().await.unwrap();

        assert_eq!(posts.len(), 2);
        let es = by_locale(&posts, "es");
        assert_eq!(es[0].metadata.slug, "hola-mundo");
        assert_eq!(es[0].folder, "hello-world");
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
