use crate::error::FetchError;
use async_trait::async_trait;

/// Source of raw page HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of `url` as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
