pub mod crawler;
pub mod error;
pub mod result;
pub mod scope;

pub use crawler::{Crawler, ProgressCallback};
pub use error::CrawlError;
pub use result::CrawlOutcome;
