//! Generator module - generates the static site using built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::fs;
use std::path::Path;

use tera::Context;

use crate::content::{
    by_locale, html_escape, sort_by_date_desc, translations_of, url_segment, MarkdownRenderer,
    Post,
};
use crate::i18n::{I18n, Routing};
use crate::pages::Page;
use crate::templates::{nest_translations, LocaleLink, PostData, SiteData, TemplateRenderer};
use crate::Site;

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    routing: Routing,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let routing = site.routing();
        let renderer = TemplateRenderer::new()?;
        let markdown = MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.highlight.line_number,
        );

        let mut i18n = I18n::new(routing.default_locale());
        i18n.load_languages(&site.languages_dir)?;

        Ok(Self {
            site: site.clone(),
            routing,
            renderer,
            markdown,
            i18n,
        })
    }

    /// Generate the entire site
    ///
    /// `pages` holds the home page of each locale that has one.
    pub fn generate(&self, posts: &[Post], pages: &[Page]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        // Root redirects to the default locale
        self.generate_root_redirect()?;

        for params in self.routing.static_params() {
            let locale = params.locale.as_str();

            match pages.iter().find(|p| p.locale == locale) {
                Some(page) => self.generate_home_page(page)?,
                None => tracing::warn!("No home page for locale {}", locale),
            }

            let mut locale_posts = by_locale(posts, locale);
            sort_by_date_desc(&mut locale_posts);

            let post_data = locale_posts
                .iter()
                .map(|post| self.build_post_data(post))
                .collect::<Result<Vec<_>>>()?;

            self.generate_blog_page(locale, &post_data)?;
            self.generate_post_pages(posts, &locale_posts, &post_data)?;

            tracing::info!("Generated {} posts for locale {}", post_data.len(), locale);
        }

        self.generate_not_found_page()?;

        Ok(())
    }

    fn build_site_data(&self) -> SiteData {
        let config = &self.site.config;
        SiteData {
            title: html_escape(&config.title),
            description: html_escape(&config.description),
            author: html_escape(&config.author),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }

    /// Build template data for one post, rendering its body
    fn build_post_data(&self, post: &Post) -> Result<PostData> {
        let metadata = &post.metadata;
        let content = self
            .markdown
            .render(&post.content)
            .with_context(|| format!("failed to render {}", post.source.display()))?;

        Ok(PostData {
            title: html_escape(metadata.display_title()),
            slug: metadata.slug.clone(),
            folder: post.folder.clone(),
            locale: post.locale.clone(),
            date: metadata.display_date(&self.site.config.date_format),
            date_iso: metadata
                .parse_date()
                .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
            description: html_escape(metadata.description.as_deref().unwrap_or_default()),
            tags: metadata.tags.iter().map(|t| html_escape(t)).collect(),
            original_uri: html_escape(metadata.original_uri.as_deref().unwrap_or_default()),
            url: post.url_path(),
            content,
        })
    }

    /// Create a base context with common variables
    fn create_base_context(&self, locale: &str, alternates: &[LocaleLink]) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.build_site_data());
        context.insert("locale", locale);
        context.insert("alternates", alternates);
        context.insert("current_year", &chrono::Local::now().year().to_string());
        context.insert(
            "t",
            &nest_translations(&self.i18n.get_all_translations_for(locale)),
        );
        context
    }

    /// One link per configured locale, built from a path template
    fn locale_links(&self, path: impl Fn(&str) -> String) -> Vec<LocaleLink> {
        self.routing
            .locales()
            .iter()
            .map(|locale| LocaleLink {
                locale: locale.clone(),
                url: path(&url_segment(locale)),
            })
            .collect()
    }

    fn generate_root_redirect(&self) -> Result<()> {
        let target = format!("/{}/", url_segment(self.routing.default_locale()));

        let mut context = Context::new();
        context.insert("site", &self.build_site_data());
        context.insert("target", &target);

        let html = self.renderer.render("redirect.html", &context)?;
        self.write_file("index.html", &html)
    }

    fn generate_home_page(&self, page: &Page) -> Result<()> {
        let alternates = self.locale_links(|l| format!("/{}/", l));
        let content = self
            .markdown
            .render(&page.content)
            .with_context(|| format!("failed to render {}", page.source.display()))?;
        let title = page.front_matter.title.as_deref().unwrap_or_default();

        let mut context = self.create_base_context(&page.locale, &alternates);
        context.insert("page_title", &html_escape(title));
        context.insert("page_content", &content);

        let html = self.renderer.render("home.html", &context)?;
        self.write_file(&format!("{}/index.html", page.locale), &html)
    }

    fn generate_blog_page(&self, locale: &str, posts: &[PostData]) -> Result<()> {
        let alternates = self.locale_links(|l| format!("/{}/blog/", l));

        let mut context = self.create_base_context(locale, &alternates);
        context.insert("posts", posts);

        let html = self.renderer.render("blog.html", &context)?;
        self.write_file(&format!("{}/blog/index.html", locale), &html)
    }

    /// Generate individual post pages
    fn generate_post_pages(
        &self,
        all_posts: &[Post],
        posts: &[&Post],
        post_data: &[PostData],
    ) -> Result<()> {
        for (post, data) in posts.iter().zip(post_data) {
            let alternates: Vec<LocaleLink> = translations_of(all_posts, &post.folder)
                .into_iter()
                .map(|p| LocaleLink {
                    locale: p.locale.clone(),
                    url: p.url_path(),
                })
                .collect();
            let translations: Vec<&LocaleLink> = alternates
                .iter()
                .filter(|link| link.locale != post.locale)
                .collect();

            let mut context = self.create_base_context(&post.locale, &alternates);
            context.insert("post", data);
            context.insert("translations", &translations);

            let html = self.renderer.render("post.html", &context)?;
            self.write_file(
                &format!("{}/blog/{}/index.html", post.locale, post.folder),
                &html,
            )?;
        }

        Ok(())
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let locale = self.routing.default_locale();
        let context = self.create_base_context(locale, &[]);
        let html = self.renderer.render("404.html", &context)?;
        self.write_file("404.html", &html)
    }

    /// Write `html` under the public directory
    fn write_file(&self, relative: &str, html: &str) -> Result<()> {
        let output_path = self.site.public_dir.join(Path::new(relative));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, Metadata};
    use std::path::PathBuf;

    fn post(locale: &str, folder: &str, title: &str, date: &str) -> Post {
        Post {
            locale: locale.to_string(),
            metadata: Metadata {
                title: Some(title.to_string()),
                slug: folder.to_string(),
                date: Some(date.to_string()),
                tags: vec!["rust".to_string()],
                ..Default::default()
            },
            content: format!("Body of **{}**\n", title),
            folder: folder.to_string(),
            source: PathBuf::from(format!("{}/{}.{}.mdx", folder, locale, folder)),
        }
    }

    fn home(locale: &str, body: &str) -> Page {
        Page {
            locale: locale.to_string(),
            front_matter: FrontMatter {
                title: Some("Home".to_string()),
                ..Default::default()
            },
            content: body.to_string(),
            source: PathBuf::from(format!("src/app/{}.mdx", locale)),
        }
    }

    #[test]
    fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let posts = vec![
            post("en", "hello", "Hello <World>", "2024-01-15"),
            post("es", "hello", "Hola", "2024-01-15"),
            post("en", "older", "Older", "2023-06-01"),
        ];
        let pages = vec![home("en", "# Hi from Carlos\n")];

        Generator::new(&site).unwrap().generate(&posts, &pages).unwrap();

        let public = &site.public_dir;
        let root = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(root.contains("url=/en/"));

        let en_home = fs::read_to_string(public.join("en/index.html")).unwrap();
        assert!(en_home.contains("<h1>Hi from Carlos</h1>"));
        assert!(!public.join("es/index.html").exists());

        let en_blog = fs::read_to_string(public.join("en/blog/index.html")).unwrap();
        let newer = en_blog.find("/en/blog/hello/").unwrap();
        let older = en_blog.find("/en/blog/older/").unwrap();
        assert!(newer < older);
        assert!(en_blog.contains("Hello &lt;World&gt;"));

        let es_post = fs::read_to_string(public.join("es/blog/hello/index.html")).unwrap();
        assert!(es_post.contains("<strong>Hola</strong>"));
        assert!(es_post.contains(r#"href="/en/blog/hello/""#));
        assert!(es_post.contains(r#"<html lang="es">"#));

        let es_blog = fs::read_to_string(public.join("es/blog/index.html")).unwrap();
        assert!(!es_blog.contains("/en/blog/older/"));

        assert!(public.join("404.html").exists());
    }

    #[test]
    fn test_folder_with_markup_characters_is_encoded_in_links() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let posts = vec![post("en", r#"say "hi"<now>"#, "Quoted", "2024-01-15")];

        Generator::new(&site).unwrap().generate(&posts, &[]).unwrap();

        let en_blog = fs::read_to_string(site.public_dir.join("en/blog/index.html")).unwrap();
        assert!(en_blog.contains(r#"href="/en/blog/say%20%22hi%22%3Cnow%3E/""#));
        assert!(!en_blog.contains("<now>"));
        assert!(site
            .public_dir
            .join(r#"en/blog/say "hi"<now>/index.html"#)
            .exists());
    }

    #[test]
    fn test_generate_empty_locale() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        Generator::new(&site).unwrap().generate(&[], &[]).unwrap();

        let es_blog = fs::read_to_string(site.public_dir.join("es/blog/index.html")).unwrap();
        assert!(es_blog.contains("Artículos"));
    }

    #[test]
    fn test_language_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("languages")).unwrap();
        fs::write(
            dir.path().join("languages/en.yml"),
            "blog:\n  heading: Writing\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();

        Generator::new(&site).unwrap().generate(&[], &[]).unwrap();

        let en_blog = fs::read_to_string(site.public_dir.join("en/blog/index.html")).unwrap();
        assert!(en_blog.contains("Writing"));
    }
}
