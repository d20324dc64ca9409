use anyhow::{Context, Result, bail};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitemapper_core::report::generate_run_report;
use sitemapper_core::sitemap::SiteMapDocument;
use sitemapper_crawler::{CrawlOutcome, Crawler, ProgressCallback};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Runtime configuration resolved from the command line.
pub struct RunConfig {
    pub file_path: String,
    pub max_depth: usize,
}

/// Seed-list paths are anchored at the home directory unless absolute or
/// already tilde-prefixed.
pub fn resolve_seed_path(file_path: &str) -> PathBuf {
    if Path::new(file_path).is_absolute() || file_path.starts_with('~') {
        return PathBuf::from(shellexpand::tilde(file_path).into_owned());
    }
    PathBuf::from(shellexpand::tilde(&format!("~/{file_path}")).into_owned())
}

/// Load the seed list: one URL per line, carriage returns stripped, blank
/// lines skipped. An unparseable line aborts the run.
pub fn load_seeds_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed list {}", path.display()))?;

    let content = content.replace('\r', "");

    let mut seeds = Vec::new();
    for line in content.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        Url::parse(line).with_context(|| format!("Invalid seed URL '{line}'"))?;
        // The raw line is kept as the seed so output URLs match the file.
        seeds.push(line.to_string());
    }

    if seeds.is_empty() {
        bail!("No seed URLs found in {}", path.display());
    }

    Ok(seeds)
}

/// Output location for a seed: `<root>/<host>/<host>.xml`.
pub fn output_path_for(root: &Path, seed: &str) -> Result<PathBuf> {
    let url = Url::parse(seed).with_context(|| format!("Invalid seed URL '{seed}'"))?;
    let host = url
        .host_str()
        .with_context(|| format!("Seed URL '{seed}' has no host"))?;
    Ok(root.join(host).join(format!("{host}.xml")))
}

/// Crawl one seed and write its sitemap under `out_root`.
pub async fn map_seed(
    seed: &str,
    max_depth: usize,
    out_root: &Path,
    progress: Option<ProgressCallback>,
) -> Result<(CrawlOutcome, PathBuf)> {
    let mut crawler = Crawler::new().with_max_depth(max_depth);
    if let Some(callback) = progress {
        crawler = crawler.with_progress_callback(callback);
    }

    let outcome = crawler
        .crawl(seed)
        .await
        .with_context(|| format!("Crawl of {seed} failed"))?;

    let document = SiteMapDocument::from_pages(&outcome.pages);
    let out_file = output_path_for(out_root, seed)?;
    let out_dir = out_file.parent().expect("Output path always has a parent");

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let xml = document
        .to_xml()
        .with_context(|| format!("Failed to serialize sitemap for {seed}"))?;
    fs::write(&out_file, xml)
        .with_context(|| format!("Failed to write {}", out_file.display()))?;
    info!("Wrote {} entries to {}", document.len(), out_file.display());

    Ok((outcome, out_file))
}

/// Run the whole batch: every seed in file order, one sitemap per seed host.
/// There is no per-seed isolation; the first failure aborts the run.
pub async fn handle_generate(config: RunConfig) -> Result<()> {
    tracing_subscriber::fmt::init();

    let seed_path = resolve_seed_path(&config.file_path);
    let seeds = load_seeds_from_file(&seed_path)?;
    let out_root = std::env::current_dir().context("Cannot resolve working directory")?;

    println!(
        "\nMapping {} seed(s), max depth {}\n",
        seeds.len(),
        config.max_depth
    );

    let mut outcomes = Vec::new();
    for seed in &seeds {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(seed.clone());

        let spinner_updates = spinner.clone();
        let progress: ProgressCallback = Arc::new(move |url: &str| {
            spinner_updates.set_message(url.to_string());
        });

        let result = map_seed(seed, config.max_depth, &out_root, Some(progress)).await;
        spinner.finish_and_clear();

        let (outcome, out_file) = result?;
        println!(
            "{} {} ({} page(s))",
            "✓".green().bold(),
            out_file.display(),
            outcome.page_count()
        );
        outcomes.push(outcome);
    }

    print!("\n{}", generate_run_report(&outcomes));
    Ok(())
}
