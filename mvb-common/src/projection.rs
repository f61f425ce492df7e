//! View projection
//!
//! Computes which entries are visible, and in what order, for the current
//! view state. Read-only over the catalog and ratings; the result borrows
//! from them and has no lifecycle of its own.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::ratings::RatingStore;
use crate::Error;

/// Which part of the catalog is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Full catalog
    #[default]
    All,
    /// Only entries the user has rated
    RatedOnly,
}

/// How the visible entries are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// One row per genre
    #[default]
    Carousel,
    /// One flat grid in catalog order
    Grid,
    /// Genre rows with full detail cards
    Expanded,
}

impl DisplayMode {
    /// Whether this layout presents genre buckets
    pub fn is_grouped(self) -> bool {
        !matches!(self, DisplayMode::Grid)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Carousel => "carousel",
            DisplayMode::Grid => "grid",
            DisplayMode::Expanded => "expanded",
        };
        f.write_str(name)
    }
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carousel" => Ok(DisplayMode::Carousel),
            "grid" => Ok(DisplayMode::Grid),
            "expanded" => Ok(DisplayMode::Expanded),
            other => Err(Error::InvalidInput(format!("unknown display mode: {}", other))),
        }
    }
}

/// Transient view state; reset only by explicit user action, never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub genre_filter: Option<String>,
    pub display: DisplayMode,
}

/// The visible entries, grouped by genre label or flat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection<'a> {
    Grouped(BTreeMap<&'a str, Vec<&'a CatalogEntry>>),
    Flat(Vec<&'a CatalogEntry>),
}

impl<'a> Projection<'a> {
    /// Entries in presentation order
    pub fn entries(&self) -> Vec<&'a CatalogEntry> {
        match self {
            Projection::Grouped(groups) => groups.values().flatten().copied().collect(),
            Projection::Flat(entries) => entries.clone(),
        }
    }

    pub fn entry_ids(&self) -> Vec<&'a str> {
        self.entries().into_iter().map(CatalogEntry::id).collect()
    }

    pub fn len(&self) -> usize {
        match self {
            Projection::Grouped(groups) => groups.values().map(Vec::len).sum(),
            Projection::Flat(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute the visible entries.
///
/// `entries` is the catalog in insertion order and `index` must have been
/// rebuilt from it.
///
/// - Rated-only: catalog entries the user has rated, optionally narrowed by a
///   case-insensitive substring match of the filter against the full genre
///   string.
/// - Otherwise with a filter: the exact bucket for that label (or nothing).
/// - Otherwise: the whole index.
pub fn project<'a>(
    entries: &'a [CatalogEntry],
    index: &'a CatalogIndex,
    ratings: &RatingStore,
    view: &ViewState,
) -> Projection<'a> {
    let grouped = view.display.is_grouped();

    match (view.mode, view.genre_filter.as_deref()) {
        (ViewMode::RatedOnly, filter) => {
            let needle = filter.map(str::to_lowercase);
            let visible: Vec<&CatalogEntry> = entries
                .iter()
                .filter(|e| ratings.is_rated(e.id()))
                .filter(|e| match &needle {
                    Some(needle) => e.genre().to_lowercase().contains(needle.as_str()),
                    None => true,
                })
                .collect();
            if grouped {
                Projection::Grouped(group_by_primary_genre(visible))
            } else {
                Projection::Flat(visible)
            }
        }
        (ViewMode::All, Some(genre)) => match index.buckets().get_key_value(genre) {
            Some((label, bucket)) if grouped => {
                Projection::Grouped(BTreeMap::from([(label.as_str(), bucket.iter().collect())]))
            }
            Some((_, bucket)) => Projection::Flat(bucket.iter().collect()),
            None if grouped => Projection::Grouped(BTreeMap::new()),
            None => Projection::Flat(Vec::new()),
        },
        (ViewMode::All, None) => {
            if grouped {
                Projection::Grouped(
                    index
                        .buckets()
                        .iter()
                        .map(|(label, bucket)| (label.as_str(), bucket.iter().collect()))
                        .collect(),
                )
            } else {
                Projection::Flat(entries.iter().collect())
            }
        }
    }
}

fn group_by_primary_genre(entries: Vec<&CatalogEntry>) -> BTreeMap<&str, Vec<&CatalogEntry>> {
    let mut groups: BTreeMap<&str, Vec<&CatalogEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.primary_genre()).or_default().push(entry);
    }
    groups
}
