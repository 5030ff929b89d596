//! Fetching raw CSV bytes from a URL or a local file.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::domain::DataSource;
use crate::error::AppError;

/// Published copies of the UCI bike-sharing dataset.
pub const DEFAULT_DAILY_URL: &str = "https://raw.githubusercontent.com/fathiyyaa/proyek_dicoding/main/Bike/day.csv";
pub const DEFAULT_HOURLY_URL: &str = "https://raw.githubusercontent.com/fathiyyaa/proyek_dicoding/main/Bike/hour.csv";

pub const DAILY_ENV: &str = "BIKE_DASH_DAY_CSV";
pub const HOURLY_ENV: &str = "BIKE_DASH_HOUR_CSV";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Reads data sources. HTTP requests share one blocking client.
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn fetch(&self, source: &DataSource) -> Result<Vec<u8>, AppError> {
        match source {
            DataSource::Url(url) => self.fetch_url(url),
            DataSource::Path(path) => {
                info!(path = %path.display(), "reading dataset file");
                std::fs::read(path)
                    .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))
            }
        }
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>, AppError> {
        info!(url, "downloading dataset");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::runtime(format!("Request to '{url}' failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Request to '{url}' failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::runtime(format!("Failed to read response from '{url}': {e}")))?;
        Ok(body.to_vec())
    }
}

/// Resolve a source: explicit flag, then environment (`.env` included), then default URL.
pub fn resolve_source(flag: Option<&str>, env_var: &str, default_url: &str) -> DataSource {
    if let Some(raw) = flag.filter(|s| !s.trim().is_empty()) {
        return DataSource::parse(raw);
    }
    match std::env::var(env_var) {
        Ok(raw) if !raw.trim().is_empty() => DataSource::parse(&raw),
        _ => DataSource::Url(default_url.to_string()),
    }
}
