//! Human-readable summary of a finished run.

use sitemapper_crawler::CrawlOutcome;
use url::Url;

/// Extract the path component from a URL, `/` for bare hosts.
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Render the per-run summary printed after every seed has been written.
pub fn generate_run_report(outcomes: &[CrawlOutcome]) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("Summary:\n");
    report.push_str(&format!("  Seeds crawled: {}\n", outcomes.len()));

    let total_pages: usize = outcomes.iter().map(|o| o.pages.len()).sum();
    report.push_str(&format!("  Pages discovered: {}\n", total_pages));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for outcome in outcomes {
        let host = Url::parse(&outcome.seed)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| outcome.seed.clone());

        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!(
            "  {} page(s) over {} level(s)\n\n",
            outcome.pages.len(),
            outcome.levels
        ));

        let mut paths: Vec<String> = outcome
            .pages
            .iter()
            .map(|page| extract_url_path(page))
            .collect();
        paths.sort();

        for path in paths {
            report.push_str(&format!("  {}\n", path));
        }
        report.push('\n');
    }

    report
}
