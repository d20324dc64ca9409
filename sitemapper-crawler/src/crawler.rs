use crate::error::{CrawlError, Result};
use crate::result::CrawlOutcome;
use crate::scope;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Level-synchronized breadth-first crawler.
///
/// One `crawl` call per seed. Each frontier level is fetched through a
/// bounded worker pool and fully drained before the next level starts, so
/// depth always means "link hops from the seed". A URL is fetched at most
/// once per traversal; the first failed fetch aborts the whole traversal.
pub struct Crawler {
    client: Client,
    max_depth: usize,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("Sitemapper/0.1 (https://github.com/trapdoorsec/sitemapper)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_depth: 10,
            workers: 8,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome> {
        if scope::origin_of(seed).is_none() {
            return Err(CrawlError::InvalidUrl(seed.to_string()));
        }

        info!("Starting crawl of {} (max depth {})", seed, self.max_depth);

        let mut visited: HashSet<String> = HashSet::new();
        let mut next: HashSet<String> = HashSet::new();
        next.insert(seed.to_string());
        let mut levels = 0;

        // The bound is inclusive: max_depth 10 expands eleven levels, the
        // seed level plus ten link hops.
        for depth in 0..=self.max_depth {
            let current = std::mem::take(&mut next);
            if current.is_empty() {
                break;
            }

            // Claim every URL of this level up front; the fan-out below only
            // ever sees URLs no other level can claim again.
            let pending: Vec<String> = current
                .into_iter()
                .filter(|url| !visited.contains(url))
                .collect();
            for url in &pending {
                visited.insert(url.clone());
            }

            debug!("Level {}: fetching {} URL(s)", depth, pending.len());
            levels += 1;

            let mut fetches = stream::iter(pending.into_iter().map(|url| {
                let client = self.client.clone();
                async move {
                    let hrefs = Self::fetch_and_extract(&client, &url).await?;
                    Ok::<_, CrawlError>((url, hrefs))
                }
            }))
            .buffer_unordered(self.workers);

            // Drain the whole level before advancing; a single failed fetch
            // aborts the traversal with no partial result.
            while let Some(fetched) = fetches.next().await {
                let (page_url, hrefs) = fetched?;

                if let Some(ref callback) = self.progress_callback {
                    callback(&page_url);
                }

                let origin = scope::origin_of(&page_url)
                    .ok_or_else(|| CrawlError::InvalidUrl(page_url.clone()))?;
                for href in &hrefs {
                    if let Some(link) = scope::resolve(&origin, href)
                        && !visited.contains(&link)
                    {
                        next.insert(link);
                    }
                }
            }
        }

        info!("Crawl of {} complete: {} page(s)", seed, visited.len());

        Ok(CrawlOutcome {
            seed: seed.to_string(),
            pages: visited.into_iter().collect(),
            levels,
        })
    }

    async fn fetch_and_extract(client: &Client, url: &str) -> Result<Vec<String>> {
        debug!("Fetching {}", url);

        // The response status is not inspected; whatever body the server
        // returns is scanned for anchors.
        let response = client.get(url).send().await?;
        let body = response.text().await?;

        Ok(Self::extract_hrefs(&body))
    }

    fn extract_hrefs(body: &str) -> Vec<String> {
        let document = Html::parse_document(body);
        let link_selector = Selector::parse("a[href]").unwrap();

        document
            .select(&link_selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn html_page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html")
            .set_body_string(format!("<html><body>{body}</body></html>"))
    }

    fn sorted(mut pages: Vec<String>) -> Vec<String> {
        pages.sort();
        pages
    }

    #[tokio::test]
    async fn test_link_discovery_stays_same_origin() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(concat!(
                r##"<a href="/page1">one</a>"##,
                r##"<a href="/page2">two</a>"##,
                r##"<a href="https://external.com/x">elsewhere</a>"##,
                r##"<a href="//cdn.example.com/lib.js">cdn</a>"##,
                r##"<a href="#top">top</a>"##,
                r##"<a href="mailto:a@b.c">mail</a>"##,
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page1"))
            .respond_with(html_page("one"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page2"))
            .respond_with(html_page("two"))
            .mount(&server)
            .await;

        let crawler = Crawler::new().with_max_depth(1);
        let outcome = crawler.crawl(&server.uri()).await.unwrap();

        let expected = sorted(vec![
            server.uri(),
            format!("{}/page1", server.uri()),
            format!("{}/page2", server.uri()),
        ]);
        assert_eq!(sorted(outcome.pages), expected);
        assert_eq!(outcome.levels, 2);
    }

    #[tokio::test]
    async fn test_max_depth_zero_visits_only_the_seed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(r##"<a href="/page1">one</a>"##))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page1"))
            .respond_with(html_page("one"))
            .expect(0)
            .mount(&server)
            .await;

        let crawler = Crawler::new().with_max_depth(0);
        let outcome = crawler.crawl(&server.uri()).await.unwrap();

        assert_eq!(outcome.pages, vec![server.uri()]);
        assert_eq!(outcome.levels, 1);
    }

    #[tokio::test]
    async fn test_depth_bound_is_inclusive() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(r##"<a href="/a">a</a>"##))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(html_page(r##"<a href="/b">b</a>"##))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(html_page(r##"<a href="/c">c</a>"##))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/c"))
            .respond_with(html_page("end"))
            .expect(0)
            .mount(&server)
            .await;

        // max_depth 2 processes levels 0, 1 and 2; /c is discovered at the
        // edge of level 2 but never fetched.
        let crawler = Crawler::new().with_max_depth(2);
        let outcome = crawler.crawl(&server.uri()).await.unwrap();

        let expected = sorted(vec![
            server.uri(),
            format!("{}/a", server.uri()),
            format!("{}/b", server.uri()),
        ]);
        assert_eq!(sorted(outcome.pages), expected);
        assert_eq!(outcome.levels, 3);
    }

    #[tokio::test]
    async fn test_never_fetches_a_url_twice() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(
                r##"<a href="/page1">one</a><a href="/page2">two</a>"##,
            ))
            .expect(1)
            .mount(&server)
            .await;
        // The two pages link to each other and to themselves.
        Mock::given(method("GET"))
            .and(path("/page1"))
            .respond_with(html_page(
                r##"<a href="/page2">two</a><a href="/page1">me</a>"##,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page2"))
            .respond_with(html_page(
                r##"<a href="/page1">one</a><a href="/page2">me</a>"##,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let crawler = Crawler::new().with_max_depth(5);
        let outcome = crawler.crawl(&server.uri()).await.unwrap();

        assert_eq!(outcome.pages.len(), 3);
    }

    #[tokio::test]
    async fn test_identical_graph_crawls_identically() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(
                r##"<a href="/x">x</a><a href="/y">y</a>"##,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(html_page(r##"<a href="/y">y</a>"##))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/y"))
            .respond_with(html_page("leaf"))
            .mount(&server)
            .await;

        let crawler = Crawler::new().with_max_depth(3);
        let first = crawler.crawl(&server.uri()).await.unwrap();
        let second = crawler.crawl(&server.uri()).await.unwrap();

        assert_eq!(sorted(first.pages), sorted(second.pages));
    }

    #[tokio::test]
    async fn test_response_status_is_not_inspected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(r##"<a href="/gone">gone</a>"##))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let crawler = Crawler::new().with_max_depth(1);
        let outcome = crawler.crawl(&server.uri()).await.unwrap();

        assert!(outcome.pages.contains(&format!("{}/gone", server.uri())));
    }

    #[tokio::test]
    async fn test_invalid_seed_is_rejected() {
        let crawler = Crawler::new();
        let err = crawler.crawl("not a url").await.unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_unreachable_seed_aborts_the_traversal() {
        let crawler = Crawler::new().with_max_depth(1);
        let result = crawler.crawl("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(CrawlError::Http(_))));
    }

    #[test]
    fn test_extract_hrefs_finds_anchors_only() {
        let html = r##"
            <html><body>
                <a href="/one">one</a>
                <a name="anchor-without-href">skip</a>
                <link href="/style.css" rel="stylesheet">
                <a href="https://h.com/two">two</a>
            </body></html>
        "##;
        let hrefs = Crawler::extract_hrefs(html);
        assert_eq!(hrefs, vec!["/one", "https://h.com/two"]);
    }
}
