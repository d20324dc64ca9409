pub mod report;
pub mod sitemap;

pub use report::{extract_url_path, generate_run_report};
pub use sitemap::{SiteMapDocument, SitemapError, UrlEntry};
