//! Per-user star ratings
//!
//! Ratings are integers in `1..=5`. Absence of a key means "unrated", which
//! is distinct from every numeric value. There is no un-rate operation.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::{Error, Result};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Round half up, then clamp into `1..=5`. NaN has no rating.
pub fn coerce_rating(raw: f64) -> Option<u8> {
    if raw.is_nan() {
        return None;
    }
    let rounded = (raw + 0.5).floor();
    Some(rounded.clamp(MIN_RATING as f64, MAX_RATING as f64) as u8)
}

/// Parse user text (`"4"`, `" 3.6 "`, `"1e1"`) into a rating
pub fn parse_rating(raw: &str) -> Option<u8> {
    raw.trim().parse::<f64>().ok().and_then(coerce_rating)
}

/// Mapping from catalog entry id to rating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingStore {
    ratings: HashMap<String, u8>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate an entry from raw user input; rejects non-numeric input.
    ///
    /// The id is not checked against the catalog.
    pub fn try_rate(&mut self, entry_id: &str, raw: &str) -> Result<u8> {
        let rating = parse_rating(raw)
            .ok_or_else(|| Error::InvalidInput(format!("rating must be numeric, got {:?}", raw)))?;
        self.ratings.insert(entry_id.to_string(), rating);
        Ok(rating)
    }

    /// Rate an entry from raw user input, silently dropping non-numeric input
    pub fn rate(&mut self, entry_id: &str, raw: &str) {
        if let Err(e) = self.try_rate(entry_id, raw) {
            debug!(entry_id = %entry_id, error = %e, "Ignoring rating");
        }
    }

    /// Rate an entry from a number; returns the stored value
    pub fn rate_number(&mut self, entry_id: &str, raw: f64) -> Option<u8> {
        let rating = coerce_rating(raw)?;
        self.ratings.insert(entry_id.to_string(), rating);
        Some(rating)
    }

    pub fn rating_for(&self, entry_id: &str) -> Option<u8> {
        self.ratings.get(entry_id).copied()
    }

    pub fn rated_entry_ids(&self) -> HashSet<&str> {
        self.ratings.keys().map(String::as_str).collect()
    }

    pub fn is_rated(&self, entry_id: &str) -> bool {
        self.ratings.contains_key(entry_id)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Id-ordered copy for persistence
    pub fn snapshot(&self) -> BTreeMap<String, u8> {
        self.ratings
            .iter()
            .map(|(id, rating)| (id.clone(), *rating))
            .collect()
    }

    /// Rebuild from a stored snapshot.
    ///
    /// Values pass through the same coercion as user input; numeric strings
    /// are accepted and anything else is dropped.
    pub fn from_snapshot<I>(snapshot: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut store = Self::new();
        for (id, value) in snapshot {
            let rating = match &value {
                Value::Number(n) => n.as_f64().and_then(coerce_rating),
                Value::String(s) => parse_rating(s),
                _ => None,
            };
            match rating {
                Some(rating) => {
                    store.ratings.insert(id, rating);
                }
                None => debug!(entry_id = %id, value = %value, "Dropping unreadable stored rating"),
            }
        }
        store
    }
}
