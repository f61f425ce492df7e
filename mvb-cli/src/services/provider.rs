//! Metadata provider abstraction
//!
//! A provider turns a title (or provider id) into catalog entries. "Nothing
//! matched" is a successful empty answer; transport, HTTP and decoding
//! failures are errors, so callers can tell an outage from a miss.

use mvb_common::CatalogEntry;
use thiserror::Error;

/// Provider call failures
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Best single match for a title, optionally pinned to a release year
    async fn fetch_by_title(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<Option<CatalogEntry>, ProviderError>;

    /// Full record for a provider id
    async fn fetch_by_id(&self, id: &str) -> Result<Option<CatalogEntry>, ProviderError>;

    /// Every match for a title, each with full metadata, in provider order
    async fn search_by_title(&self, title: &str) -> Result<Vec<CatalogEntry>, ProviderError>;
}
