//! Search coordination
//!
//! A search runs in three steps so the session is never borrowed across a
//! provider call:
//! 1. `Session::begin_search` issues a ticket
//! 2. [`lookup`] queries the provider (search, then single-title fallback)
//! 3. [`finish`] merges the results unless a newer search has started
//!
//! Without a provider the catalog is reset to the seed set instead.

use mvb_common::catalog::seed_catalog;
use mvb_common::{CatalogEntry, SearchOutcome, SearchTicket, Session};
use tracing::{info, warn};

use super::provider::{MetadataProvider, ProviderError};

/// Provider answer for one query
#[derive(Debug)]
pub enum Lookup {
    Found(Vec<CatalogEntry>),
    NotFound,
    /// The provider failed; nothing is known about matches
    Unavailable(ProviderError),
}

/// What a search did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchReport {
    /// Blank query; nothing happened
    EmptyQuery,
    /// No provider configured; catalog reset to the seed set
    Seeded,
    /// Results merged into the catalog
    Found { results: usize, added: usize },
    NotFound,
    /// Provider failure, reported separately from a genuine miss
    Unavailable(String),
    /// A newer search superseded this one
    Stale,
}

/// Search by title; when that yields nothing, try a single exact-title fetch
pub async fn lookup(provider: &dyn MetadataProvider, query: &str) -> Lookup {
    let mut failure = None;

    match provider.search_by_title(query).await {
        Ok(results) if !results.is_empty() => return Lookup::Found(results),
        Ok(_) => {}
        Err(e) => {
            warn!(provider = provider.name(), query = %query, error = %e, "Search failed");
            failure = Some(e);
        }
    }

    match provider.fetch_by_title(query, None).await {
        Ok(Some(entry)) => Lookup::Found(vec![entry]),
        Ok(None) => match failure {
            Some(e) => Lookup::Unavailable(e),
            None => Lookup::NotFound,
        },
        Err(e) => {
            warn!(provider = provider.name(), query = %query, error = %e, "Title fetch failed");
            Lookup::Unavailable(failure.unwrap_or(e))
        }
    }
}

/// Apply a lookup to the session
pub fn finish(session: &mut Session, ticket: SearchTicket, lookup: Lookup) -> SearchReport {
    match lookup {
        Lookup::Found(results) => {
            let count = results.len();
            match session.apply_search(ticket, results) {
                SearchOutcome::Applied { added } => {
                    info!(results = count, added, "Search results merged into catalog");
                    SearchReport::Found { results: count, added }
                }
                SearchOutcome::Stale => SearchReport::Stale,
            }
        }
        Lookup::NotFound => SearchReport::NotFound,
        Lookup::Unavailable(e) => SearchReport::Unavailable(e.to_string()),
    }
}

/// Full search against an optional provider
pub async fn run_search(
    session: &mut Session,
    provider: Option<&dyn MetadataProvider>,
    query: &str,
) -> SearchReport {
    let query = query.trim();
    if query.is_empty() {
        return SearchReport::EmptyQuery;
    }

    let Some(provider) = provider else {
        info!("No metadata provider configured, showing seed catalog");
        session.replace_catalog(seed_catalog());
        return SearchReport::Seeded;
    };

    let ticket = session.begin_search();
    let result = lookup(provider, query).await;
    finish(session, ticket, result)
}
