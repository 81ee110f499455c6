use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScraperError>;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// The automation engine could not be started. Fatal for a run.
    #[error("browser setup failed: {0}")]
    Setup(String),

    #[error("browser command failed: {0}")]
    Browser(#[from] thirtyfour::error::WebDriverError),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out after {secs}s waiting for `{selector}`")]
    NotReady { selector: String, secs: u64 },

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session already closed")]
    Closed,
}
