use serde::{Deserialize, Serialize};

/// The outcome of one seed's traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// The seed URL the traversal started from, exactly as supplied.
    pub seed: String,
    /// Every in-scope page that was fetched, in no particular order.
    pub pages: Vec<String>,
    /// Number of frontier levels that were actually processed.
    pub levels: usize,
}

impl CrawlOutcome {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
