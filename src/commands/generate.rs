//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::pages::{Page, PageOutcome, PageResolver};
use crate::Site;

/// Generate the static site
///
/// Posts load all-or-nothing: one bad file aborts before anything is written.
pub async fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let posts = site.get_all_posts().await?;
    let pages = load_pages(site).await?;

    tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

    let generator = Generator::new(site)?;
    generator.generate(&posts, &pages)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Home pages of every configured locale that has one
pub async fn load_pages(site: &Site) -> Result<Vec<Page>> {
    let routing = site.routing();
    let resolver = PageResolver::new(
        &site.pages_dir,
        &site.config.content_extension,
        routing.clone(),
    );

    let mut pages = Vec::new();
    for params in routing.static_params() {
        match resolver.resolve(&params.locale).await? {
            PageOutcome::Found(page) => pages.push(page),
            PageOutcome::NotFound => {
                tracing::debug!("No page for locale {}", params.locale);
            }
        }
    }

    Ok(pages)
}
