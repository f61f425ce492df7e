//! OMDb API client
//!
//! Key-based title search and detail lookup against https://www.omdbapi.com/.
//! Search hits carry only id/title/year, so every hit is followed by a detail
//! lookup; those run with bounded concurrency and keep hit order.

use futures::stream::{self, StreamExt};
use mvb_common::catalog::entry::NO_POSTER_DATA_URI;
use mvb_common::{CatalogEntry, NewEntry};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::provider::{MetadataProvider, ProviderError};

pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
const USER_AGENT: &str = "Movibucks/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Detail lookups in flight at once during a search
pub const DETAIL_CONCURRENCY: usize = 4;

/// Detail record (`?i=` / `?t=`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OmdbRecord {
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
}

/// Search response (`?s=`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "Search")]
    pub search: Option<Vec<OmdbSearchHit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchHit {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
}

fn is_true(response: &Option<String>) -> bool {
    response.as_deref() == Some("True")
}

/// Normalize an OMDb detail record into a catalog entry
pub fn normalize_record(record: OmdbRecord) -> CatalogEntry {
    let poster = match record.poster.as_deref() {
        None | Some("") | Some("N/A") => NO_POSTER_DATA_URI.to_string(),
        Some(url) => upgrade_to_https(url),
    };

    CatalogEntry::new(NewEntry {
        id: record.imdb_id,
        title: record.title,
        year: record.year,
        poster: Some(poster),
        plot: record.plot,
        genre: record.genre,
        imdb_rating: record.imdb_rating,
    })
}

fn upgrade_to_https(url: &str) -> String {
    match url.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") => format!("https://{}", &url[7..]),
        _ => url.to_string(),
    }
}

/// OMDb API client
pub struct OmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, OMDB_BASE_URL)
    }

    /// Client against another endpoint (local test servers, mirrors)
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, ProviderError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("r", "json")])
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(ProviderError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    async fn lookup(&self, params: &[(&str, &str)]) -> Result<Option<CatalogEntry>, ProviderError> {
        let record: OmdbRecord = self.get_json(params).await?;

        if !is_true(&record.response) {
            tracing::debug!(
                error = record.error.as_deref().unwrap_or("no match"),
                "OMDb lookup returned no record"
            );
            return Ok(None);
        }

        let entry = normalize_record(record);
        tracing::info!(
            id = %entry.id(),
            title = %entry.title(),
            genre = %entry.genre(),
            "Retrieved movie from OMDb"
        );
        Ok(Some(entry))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbClient {
    fn name(&self) -> &'static str {
        "OMDb"
    }

    async fn fetch_by_title(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<Option<CatalogEntry>, ProviderError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        tracing::debug!(title = %title, year = ?year, "Querying OMDb by title");

        let mut params = vec![("t", title), ("plot", "short")];
        if let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) {
            params.push(("y", year));
        }
        self.lookup(&params).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<CatalogEntry>, ProviderError> {
        tracing::debug!(id = %id, "Querying OMDb by id");
        self.lookup(&[("i", id), ("plot", "short")]).await
    }

    async fn search_by_title(&self, title: &str) -> Result<Vec<CatalogEntry>, ProviderError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(query = %title, "Searching OMDb");

        let response: OmdbSearchResponse = self.get_json(&[("s", title), ("page", "1")]).await?;

        let hits = match response.search {
            Some(hits) if is_true(&response.response) && !hits.is_empty() => hits,
            _ => {
                tracing::info!(
                    query = %title,
                    reason = response.error.as_deref().unwrap_or("no hits"),
                    "OMDb search found nothing"
                );
                return Ok(Vec::new());
            }
        };

        let hit_count = hits.len();
        let lookups: Vec<Result<Option<CatalogEntry>, ProviderError>> = stream::iter(hits)
            .map(|hit| async move { self.fetch_by_id(&hit.imdb_id).await })
            .buffered(DETAIL_CONCURRENCY)
            .collect()
            .await;

        let mut entries = Vec::with_capacity(hit_count);
        let mut first_error = None;
        for lookup in lookups {
            match lookup {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "OMDb detail lookup failed, skipping hit");
                    first_error.get_or_insert(e);
                }
            }
        }

        // Every detail lookup failing means the provider is down, not that nothing matched
        if entries.is_empty() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        tracing::info!(
            query = %title,
            hits = hit_count,
            entries = entries.len(),
            "OMDb search complete"
        );
        Ok(entries)
    }
}
