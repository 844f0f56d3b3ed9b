use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Source of remote image bytes
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("fleet-tables")
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to request {}", url))?
            .error_for_status()
            .with_context(|| format!("Bad response from {}", url))?;

        let bytes = response.bytes().context("Failed to read response body")?;
        Ok(bytes.to_vec())
    }
}

/// Whether an `image_src` value points at a remote resource
pub fn is_remote(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
