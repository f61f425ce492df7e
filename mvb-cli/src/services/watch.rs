//! External listing links for the "watch" action

use mvb_common::CatalogEntry;
use reqwest::Url;

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";
const IMDB_FIND_URL: &str = "https://www.imdb.com/find/";

fn is_imdb_id(id: &str) -> bool {
    id.strip_prefix("tt")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Listing page for an entry: its IMDb title page when the id is an IMDb id,
/// otherwise an IMDb title search
pub fn watch_url(entry: &CatalogEntry) -> String {
    if is_imdb_id(entry.id()) {
        return format!("{}{}/", IMDB_TITLE_URL, entry.id());
    }
    match Url::parse_with_params(IMDB_FIND_URL, &[("q", entry.title())]) {
        Ok(url) => url.to_string(),
        Err(_) => IMDB_FIND_URL.to_string(),
    }
}
