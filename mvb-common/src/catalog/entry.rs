//! Catalog entry (one movie record)
//!
//! Entries are immutable once constructed. User ratings live in the
//! [`RatingStore`](crate::ratings::RatingStore), not on the entry.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Bucket label for entries without a usable genre
pub const DEFAULT_GENRE: &str = "General";

/// Poster used when a record carries none
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/270x200?text=No+Poster";

/// Inline "No Poster" image substituted for provider records without artwork
pub const NO_POSTER_DATA_URI: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='270' height='200'%3E%3Crect fill='%231a1a1a' width='270' height='200'/%3E%3Ctext fill='%23666' x='135' y='100' dominant-baseline='middle' text-anchor='middle' font-family='sans-serif' font-size='14'%3ENo Poster%3C/text%3E%3C/svg%3E";

const DEFAULT_TITLE: &str = "Unknown";
const DEFAULT_PLOT: &str = "No description available.";
const UNKNOWN_RATING: &str = "N/A";

/// Plot summaries longer than this are cut for card display
const SHORT_PLOT_CHARS: usize = 120;

/// Raw entry fields as they arrive from storage, seed data or a provider.
///
/// Every field is optional; empty strings count as missing. Converting into
/// a [`CatalogEntry`] applies the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub poster: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub plot: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub genre: Option<String>,
    #[serde(rename = "imdbRating", deserialize_with = "lenient_string")]
    pub imdb_rating: Option<String>,
}

/// Scalar field as text: numbers and booleans are stringified, null and
/// nested values count as missing
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// A movie record in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NewEntry")]
pub struct CatalogEntry {
    id: String,
    title: String,
    year: String,
    poster: String,
    plot: String,
    genre: String,
    #[serde(rename = "imdbRating")]
    imdb_rating: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<NewEntry> for CatalogEntry {
    fn from(fields: NewEntry) -> Self {
        Self {
            id: non_empty(fields.id).unwrap_or_else(generate_entry_id),
            title: non_empty(fields.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            year: fields.year.unwrap_or_default(),
            poster: non_empty(fields.poster).unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            plot: non_empty(fields.plot).unwrap_or_else(|| DEFAULT_PLOT.to_string()),
            genre: non_empty(fields.genre).unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            imdb_rating: non_empty(fields.imdb_rating)
                .unwrap_or_else(|| UNKNOWN_RATING.to_string()),
        }
    }
}

impl CatalogEntry {
    pub fn new(fields: NewEntry) -> Self {
        fields.into()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn poster(&self) -> &str {
        &self.poster
    }

    pub fn plot(&self) -> &str {
        &self.plot
    }

    /// Comma-separated genre list, e.g. `"Action, Sci-Fi"`
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// External aggregate rating as reported by the provider (`"N/A"` if unknown)
    pub fn imdb_rating(&self) -> &str {
        &self.imdb_rating
    }

    /// First genre token, trimmed; [`DEFAULT_GENRE`] when blank
    pub fn primary_genre(&self) -> &str {
        primary_genre_of(&self.genre)
    }

    /// Display style derived from the genre string
    pub fn style(&self) -> &'static GenreStyle {
        GenreStyle::for_genre(&self.genre)
    }

    /// `"Title (Year)"`
    pub fn display_title(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }

    /// Plot cut to 120 characters with a trailing ellipsis
    pub fn short_plot(&self) -> String {
        if self.plot.chars().count() > SHORT_PLOT_CHARS {
            let cut: String = self.plot.chars().take(SHORT_PLOT_CHARS).collect();
            format!("{}...", cut)
        } else {
            self.plot.clone()
        }
    }

    /// User rating as `n/5` when present, otherwise the external rating
    pub fn rating_display(&self, user_rating: Option<u8>) -> String {
        match user_rating {
            Some(stars) => format!("{}/5", stars),
            None => format!("IMDB: {}", self.imdb_rating),
        }
    }
}

/// Primary genre label of a comma-separated genre string
pub fn primary_genre_of(genre: &str) -> &str {
    let first = genre.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        DEFAULT_GENRE
    } else {
        first
    }
}

/// Unique fallback id: `movie_<unix millis>_<7 base36 chars>`
pub fn generate_entry_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("movie_{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}

/// Card styling resolved from genre keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreStyle {
    /// Keyword matched (case-insensitively) against the genre string
    pub keyword: Option<&'static str>,
    pub css_class: &'static str,
    pub icon: Option<&'static str>,
    pub badge: Option<&'static str>,
}

/// Checked in order; first keyword contained in the genre string wins
const GENRE_STYLES: &[GenreStyle] = &[
    GenreStyle {
        keyword: Some("action"),
        css_class: "movie-card--action",
        icon: Some("fa-bomb"),
        badge: Some("Action"),
    },
    GenreStyle {
        keyword: Some("comedy"),
        css_class: "movie-card--comedy",
        icon: Some("fa-face-laugh"),
        badge: Some("Comedy"),
    },
];

const DEFAULT_STYLE: GenreStyle = GenreStyle {
    keyword: None,
    css_class: "movie-card--default",
    icon: None,
    badge: None,
};

impl GenreStyle {
    pub fn for_genre(genre: &str) -> &'static GenreStyle {
        let genre = genre.to_lowercase();
        GENRE_STYLES
            .iter()
            .find(|style| style.keyword.is_some_and(|k| genre.contains(k)))
            .unwrap_or(&DEFAULT_STYLE)
    }
}
