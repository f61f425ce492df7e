//! Provider API key resolution
//!
//! Priority: Database → ENV → TOML. The database key is the one written by
//! `mvb key set`; the other tiers let a key be supplied without touching
//! stored state.

use mvb_common::config::TomlConfig;
use mvb_common::{Result, StateStore};
use tracing::{info, warn};

/// Environment variable holding the OMDb API key
pub const OMDB_API_KEY_ENV: &str = "MVB_OMDB_API_KEY";

/// Resolve the OMDb API key; `None` leaves the provider disabled
pub async fn resolve_omdb_api_key(
    store: &StateStore,
    toml_config: &TomlConfig,
) -> Result<Option<String>> {
    let db_key = store.api_key().await?;
    let env_key = std::env::var(OMDB_API_KEY_ENV).ok();
    let toml_key = toml_config.omdb_api_key.clone();

    let candidates = [
        ("database", db_key),
        ("environment", env_key),
        ("TOML", toml_key),
    ];

    let sources: Vec<&str> = candidates
        .iter()
        .filter(|(_, key)| key.as_deref().is_some_and(is_valid_key))
        .map(|(source, _)| *source)
        .collect();

    if sources.len() > 1 {
        warn!(
            "OMDb API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    for (source, key) in candidates {
        if let Some(key) = key.filter(|k| is_valid_key(k)) {
            info!(source, "OMDb API key loaded");
            return Ok(Some(key.trim().to_string()));
        }
    }

    info!("OMDb API key not configured; searches will show the seed catalog");
    Ok(None)
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(is_valid_key(" abc "));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key(" \t\n"));
    }
}
