use reqwest::header::USER_AGENT;
use std::time::Duration;
use thirtyfour::ChromiumLikeCapabilities;
use thirtyfour::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, ScraperError};

const DESKTOP_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    async fn execute(&mut self, script: &str) -> Result<()>;

    async fn page_source(&mut self) -> Result<String>;

    async fn close(self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub webdriver_url: String,
    pub headless: bool,
}

pub struct ChromeSession {
    driver: Option<WebDriver>,
}

impl ChromeSession {
    pub async fn start(options: &ChromeOptions) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage", "--window-size=1920,1080"];
        if options.headless {
            args.push("--headless=new");
        }
        for arg in args {
            caps.add_arg(arg)
                .map_err(|e| ScraperError::Setup(e.to_string()))?;
        }

        let driver = WebDriver::new(options.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| ScraperError::Setup(format!("{} ({})", e, options.webdriver_url)))?;

        info!(webdriver = %options.webdriver_url, headless = options.headless, "chrome session started");
        Ok(Self {
            driver: Some(driver),
        })
    }

    fn driver(&self) -> Result<&WebDriver> {
        self.driver.as_ref().ok_or(ScraperError::Closed)
    }
}

impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.driver()?.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.driver()?
            .query(By::Css(selector))
            .wait(timeout, Duration::from_millis(250))
            .first()
            .await
            .map_err(|e| {
                debug!(error = %e, selector, "wait failed");
                ScraperError::NotReady {
                    selector: selector.to_string(),
                    secs: timeout.as_secs(),
                }
            })?;
        Ok(())
    }

    async fn execute(&mut self, script: &str) -> Result<()> {
        self.driver()?.execute(script, Vec::new()).await?;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.driver()?.source().await?)
    }

    async fn close(mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            driver.quit().await?;
            debug!("chrome session closed");
        }
        Ok(())
    }
}

// no script support; readiness is a selector match on the fetched markup
pub struct HttpSession {
    client: reqwest::Client,
    source: Option<String>,
}

impl HttpSession {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            source: None,
        })
    }
}

impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, DESKTOP_UA)
            .send()
            .await?
            .error_for_status()?;
        self.source = Some(response.text().await?);
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let selector_parsed = scraper::Selector::parse(selector)
            .map_err(|_| ScraperError::Selector(selector.to_string()))?;
        let html = self.source.as_deref().unwrap_or_default();
        let document = scraper::Html::parse_document(html);
        if document.select(&selector_parsed).next().is_some() {
            Ok(())
        } else {
            Err(ScraperError::NotReady {
                selector: selector.to_string(),
                secs: timeout.as_secs(),
            })
        }
    }

    async fn execute(&mut self, _script: &str) -> Result<()> {
        warn!("http session cannot execute scripts, skipping");
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.source.clone().unwrap_or_default())
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}

pub enum Session {
    Chrome(ChromeSession),
    Http(HttpSession),
}

impl BrowserSession for Session {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        match self {
            Self::Chrome(s) => s.navigate(url).await,
            Self::Http(s) => s.navigate(url).await,
        }
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        match self {
            Self::Chrome(s) => s.wait_for(selector, timeout).await,
            Self::Http(s) => s.wait_for(selector, timeout).await,
        }
    }

    async fn execute(&mut self, script: &str) -> Result<()> {
        match self {
            Self::Chrome(s) => s.execute(script).await,
            Self::Http(s) => s.execute(script).await,
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        match self {
            Self::Chrome(s) => s.page_source().await,
            Self::Http(s) => s.page_source().await,
        }
    }

    async fn close(self) -> Result<()> {
        match self {
            Self::Chrome(s) => s.close().await,
            Self::Http(s) => s.close().await,
        }
    }
}
