pub mod browser;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod filters;
pub mod listing;
pub mod markup;
pub mod prompt;
pub mod query;
pub mod scrape;
pub mod stats;

pub use error::{Result, ScraperError};
pub use listing::ListingRecord;
pub use stats::PriceStatistics;
