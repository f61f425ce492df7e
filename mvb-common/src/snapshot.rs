//! JSON codec for the persisted catalog state
//!
//! Document layout:
//!
//! ```json
//! {
//!   "user":     { "id": "...", "name": "...", "avatar": "...", "ratings": { "tt1": 4 } },
//!   "movies":   [ { "id": "tt1", "title": "...", "year": "...", "poster": "...",
//!                   "plot": "...", "genre": "...", "imdbRating": "..." } ],
//!   "featured": "tt1"
//! }
//! ```
//!
//! There is no schema version. Missing or null members decode as defaults,
//! and a `ratings` member that is not an object is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::catalog::entry::lenient_string;
use crate::catalog::CatalogEntry;
use crate::ratings::RatingStore;
use crate::user::UserProfile;
use crate::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserRecord {
    #[serde(deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    avatar: Option<String>,
    ratings: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StateDocument {
    user: Option<UserRecord>,
    movies: Option<Vec<CatalogEntry>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    featured: Option<String>,
}

/// Decoded catalog state
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub profile: UserProfile,
    pub ratings: RatingStore,
    pub entries: Vec<CatalogEntry>,
    /// Lead result of the last search, if one was made
    pub featured: Option<String>,
}

/// Serialize profile, ratings, the full entry list and the featured id into one document
pub fn encode(
    profile: &UserProfile,
    ratings: &RatingStore,
    entries: &[CatalogEntry],
    featured: Option<&str>,
) -> Result<String> {
    let ratings: Map<String, Value> = ratings
        .snapshot()
        .into_iter()
        .map(|(id, rating)| (id, Value::from(rating)))
        .collect();

    let document = StateDocument {
        user: Some(UserRecord {
            id: Some(profile.id.clone()),
            name: Some(profile.name.clone()),
            avatar: Some(profile.avatar.clone()),
            ratings: Value::Object(ratings),
        }),
        movies: Some(entries.to_vec()),
        featured: featured.map(str::to_string),
    };
    Ok(serde_json::to_string(&document)?)
}

/// Parse a stored document. Only a document that is not a JSON object, or
/// a `movies` member that is not a list of entry objects, fails the decode.
pub fn decode(raw: &str) -> Result<StateSnapshot> {
    let document: StateDocument = serde_json::from_str(raw)?;
    let user = document.user.unwrap_or_default();

    let ratings = match user.ratings {
        Value::Object(map) => RatingStore::from_snapshot(map),
        Value::Null => RatingStore::new(),
        other => {
            debug!(ratings = %other, "Ignoring stored ratings that are not an object");
            RatingStore::new()
        }
    };

    Ok(StateSnapshot {
        profile: UserProfile::with_defaults(user.id, user.name, user.avatar),
        ratings,
        entries: document.movies.unwrap_or_default(),
        featured: document.featured,
    })
}
