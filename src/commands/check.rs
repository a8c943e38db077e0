//! Check that every content file loads

use anyhow::Result;

use crate::Site;

/// Load every post, report each file that fails and fail if any did
pub async fn run(site: &Site, json: bool) -> Result<()> {
    let report = site.get_posts_partial().await?;

    if json {
        let failures: Vec<_> = report.failures.iter().map(|f| f.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&failures)?);
    } else {
        for failure in &report.failures {
            let summary = failure.summary();
            println!("  {} [{:?}] {}", summary.path.display(), summary.kind, summary.message);
        }
    }

    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} content files failed to load",
            report.failures.len(),
            report.failures.len() + report.posts.len()
        );
    }

    println!("All {} posts loaded", report.posts.len());
    Ok(())
}
