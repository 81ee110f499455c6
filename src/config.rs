use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::browser::ChromeOptions;
use crate::filters::FilterDimension;
use crate::query::SearchVariant;
use crate::scrape::ScrapeSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    /// Chrome over WebDriver.
    Chrome,
    /// Plain HTTP fetch without script execution.
    Http,
}

/// Scrape sold marketplace listings for a device category and summarize prices.
#[derive(Debug, Parser)]
#[command(name = "sold-scraper", version)]
pub struct Config {
    /// Device category, e.g. phone, laptop, tablet. Prompted for when absent.
    pub category: Option<String>,

    /// Filter choice as DIMENSION=INDICES (1-based), e.g. storage=1,3.
    #[arg(long = "select", value_name = "DIM=INDICES", value_parser = parse_select)]
    pub selections: Vec<(FilterDimension, String)>,

    /// Never prompt; use only --select values.
    #[arg(long)]
    pub no_prompt: bool,

    /// Print the newest saved export for the category instead of scraping.
    #[arg(long)]
    pub last: bool,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    #[arg(long, env = "MARKETPLACE_BASE_URL", default_value = "https://www.ebay.com")]
    pub base_url: String,

    #[arg(long, env = "SCRAPER_ENGINE", value_enum, default_value_t = Engine::Chrome)]
    pub engine: Engine,

    #[arg(long, env = "SCRAPER_HEADLESS", default_value_t = true, action = clap::ArgAction::Set)]
    pub headless: bool,

    #[arg(long, env = "SCRAPER_WAIT_TIMEOUT_SECS", default_value_t = 10)]
    pub wait_timeout_secs: u64,

    #[arg(long, env = "SCRAPER_SETTLE_DELAY_MS", default_value_t = 3000)]
    pub settle_delay_ms: u64,

    #[arg(long, env = "SCRAPER_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, env = "SCRAPER_VARIANT", value_enum, default_value_t = SearchVariant::FilterAware)]
    pub variant: SearchVariant,
}

impl Config {
    pub fn scrape_settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            base_url: self.base_url.clone(),
            variant: self.variant,
            wait_timeout: self.wait_timeout(),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }

    pub fn chrome_options(&self) -> ChromeOptions {
        ChromeOptions {
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

fn parse_select(value: &str) -> Result<(FilterDimension, String), String> {
    let (dim, indices) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DIM=INDICES, got `{value}`"))?;
    let dim = FilterDimension::from_name(dim)
        .ok_or_else(|| format!("unknown filter dimension `{}`", dim.trim()))?;
    Ok((dim, indices.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_filter_aware_chrome() {
        let config = Config::try_parse_from(["sold-scraper", "phone"]).unwrap();

        assert_eq!(config.category.as_deref(), Some("phone"));
        assert_eq!(config.engine, Engine::Chrome);
        assert_eq!(config.variant, SearchVariant::FilterAware);
        assert!(config.headless);
        assert_eq!(config.scrape_settings().settle_delay, Duration::from_secs(3));
    }

    #[test]
    fn parses_selections_and_overrides() {
        let config = Config::try_parse_from([
            "sold-scraper",
            "laptop",
            "--select",
            "ram=2",
            "--select",
            "Condition=1,5",
            "--variant",
            "basic",
            "--headless",
            "false",
        ])
        .unwrap();

        assert_eq!(
            config.selections,
            vec![
                (FilterDimension::Ram, "2".to_string()),
                (FilterDimension::Condition, "1,5".to_string()),
            ]
        );
        assert_eq!(config.variant, SearchVariant::Basic);
        assert!(!config.headless);
    }

    #[test]
    fn rejects_unknown_dimension() {
        assert!(Config::try_parse_from(["sold-scraper", "--select", "weight=1"]).is_err());
        assert!(Config::try_parse_from(["sold-scraper", "--select", "storage"]).is_err());
    }
}
