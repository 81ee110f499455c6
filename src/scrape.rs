use std::time::Duration;
use tracing::{debug, info, warn};

use crate::browser::BrowserSession;
use crate::error::Result;
use crate::extract::AttributeExtractor;
use crate::filters::{self, FilterDimension, FilterOptions, FilterSelection};
use crate::listing::{ListingRecord, into_records};
use crate::markup::{self, READY_SELECTOR};
use crate::query::{self, SearchVariant};

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Raw index input per dimension, as typed or passed on the command line.
pub type RawSelection = Vec<(FilterDimension, String)>;

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub base_url: String,
    pub variant: SearchVariant,
    pub wait_timeout: Duration,
    pub settle_delay: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.ebay.com".to_string(),
            variant: SearchVariant::default(),
            wait_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(3),
        }
    }
}

pub struct SoldItemScraper<B> {
    session: B,
    settings: ScrapeSettings,
    extractor: AttributeExtractor,
}

impl<B: BrowserSession> SoldItemScraper<B> {
    pub fn new(session: B, settings: ScrapeSettings) -> Self {
        let extractor = AttributeExtractor::new(settings.variant);
        Self {
            session,
            settings,
            extractor,
        }
    }

    // fetch and parse failures are logged and give an empty list
    pub async fn scrape_sold_items(
        &mut self,
        category: &str,
        selection: &FilterSelection,
    ) -> Vec<ListingRecord> {
        let url = query::search_url(
            &self.settings.base_url,
            category,
            selection,
            self.settings.variant,
        );
        info!(url = %url, "searching sold listings");

        match self.fetch_results(&url).await {
            Ok(html) => {
                let candidates = markup::parse_candidates(&html);
                debug!(count = candidates.len(), "item candidates found");
                let records = into_records(candidates, &self.extractor);
                info!(count = records.len(), "valid listings processed");
                records
            }
            Err(e) => {
                warn!(error = %e, url = %url, "scrape failed, returning no listings");
                Vec::new()
            }
        }
    }

    async fn fetch_results(&mut self, url: &str) -> Result<String> {
        self.session.navigate(url).await?;
        self.session
            .wait_for(READY_SELECTOR, self.settings.wait_timeout)
            .await?;
        self.session.execute(SCROLL_SCRIPT).await?;
        tokio::time::sleep(self.settings.settle_delay).await;
        self.session.page_source().await
    }

    // the basic variant and any fetch failure use the static lists
    pub async fn filter_options(&mut self, category: &str) -> FilterOptions {
        if self.settings.variant == SearchVariant::Basic {
            return FilterOptions::fallback(category);
        }

        let url = query::search_url(
            &self.settings.base_url,
            category,
            &FilterSelection::new(),
            self.settings.variant,
        );

        match self.fetch_results(&url).await {
            Ok(html) => markup::parse_filter_options(&html, category),
            Err(e) => {
                warn!(error = %e, "filter options unavailable, using static lists");
                FilterOptions::fallback(category)
            }
        }
    }

    /// Fetches option lists and asks `choose` for raw indices when given,
    /// then runs the search. Without `choose` no filters are applied.
    pub async fn search<F>(&mut self, category: &str, choose: Option<F>) -> Result<Vec<ListingRecord>>
    where
        F: FnOnce(&FilterOptions) -> Result<RawSelection>,
    {
        let selection = match choose {
            Some(choose) => {
                let options = self.filter_options(category).await;
                info!(category, dimensions = options.dimensions().count(), "filter options ready");
                let raw = choose(&options)?;
                filters::normalize(&options, &raw)
            }
            None => FilterSelection::new(),
        };

        println!("\n🔎 Scraping sold listings for {category}... This may take a moment.");
        Ok(self.scrape_sold_items(category, &selection).await)
    }

    pub async fn close(self) -> Result<()> {
        self.session.close().await
    }
}

/// One full run on `session`. The session is closed on every path, including
/// when choosing filters fails.
pub async fn run_with_session<B, F>(
    session: B,
    settings: ScrapeSettings,
    category: &str,
    choose: Option<F>,
) -> Result<Vec<ListingRecord>>
where
    B: BrowserSession,
    F: FnOnce(&FilterOptions) -> Result<RawSelection>,
{
    let mut scraper = SoldItemScraper::new(session, settings);
    let outcome = scraper.search(category, choose).await;

    if let Err(e) = scraper.close().await {
        warn!(error = %e, "failed to close browser session");
    }
    outcome
}
