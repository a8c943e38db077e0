//! List site content

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::content::{by_locale, sort_by_date_desc, tag_counts, Post};
use crate::Site;

#[derive(Serialize)]
struct LocaleCount<'a> {
    locale: &'a str,
    posts: usize,
    default: bool,
}

#[derive(Serialize)]
struct TagCount<'a> {
    tag: &'a str,
    posts: usize,
}

/// List site content by type
pub async fn run(site: &Site, content_type: &str, locale: Option<&str>, json: bool) -> Result<()> {
    let posts = site.get_all_posts().await?;
    print!("{}", render(site, &posts, content_type, locale, json)?);
    Ok(())
}

fn render(
    site: &Site,
    posts: &[Post],
    content_type: &str,
    locale: Option<&str>,
    json: bool,
) -> Result<String> {
    let mut selected: Vec<&Post> = match locale {
        Some(locale) => by_locale(posts, locale),
        None => posts.iter().collect(),
    };
    sort_by_date_desc(&mut selected);

    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&selected)?)?;
            } else {
                writeln!(out, "Posts ({}):", selected.len())?;
                for post in &selected {
                    writeln!(
                        out,
                        "  {} - [{}] {} [{}]",
                        post.metadata.display_date(&site.config.date_format),
                        post.locale,
                        post.metadata.display_title(),
                        post.source.display()
                    )?;
                }
            }
        }
        "tag" | "tags" => {
            let tags = tag_counts(&selected);
            if json {
                let tags: Vec<_> = tags
                    .iter()
                    .map(|(tag, posts)| TagCount { tag, posts: *posts })
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&tags)?)?;
            } else {
                writeln!(out, "Tags ({}):", tags.len())?;
                for (tag, count) in tags {
                    writeln!(out, "  {} ({})", tag, count)?;
                }
            }
        }
        "locale" | "locales" => {
            let routing = site.routing();
            let locales: Vec<_> = routing
                .locales()
                .iter()
                .map(|l| LocaleCount {
                    locale: l,
                    posts: by_locale(posts, l).len(),
                    default: l == routing.default_locale(),
                })
                .collect();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&locales)?)?;
            } else {
                writeln!(out, "Locales ({}):", locales.len())?;
                for l in locales {
                    let marker = if l.default { " (default)" } else { "" };
                    writeln!(out, "  {}{} - {} posts", l.locale, marker, l.posts)?;
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, locale",
                content_type
            );
        }
    }

    Ok(out)
}
