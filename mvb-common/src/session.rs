//! Application session
//!
//! One `Session` owns the catalog, its genre index, the rating store and the
//! transient view state. Every catalog mutation rebuilds the index.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::catalog::{seed_catalog, CatalogEntry, CatalogIndex};
use crate::projection::{project, DisplayMode, Projection, ViewMode, ViewState};
use crate::ratings::RatingStore;
use crate::snapshot::StateSnapshot;
use crate::user::UserProfile;
use crate::Result;

/// Issued when a search starts; results are only accepted for the newest ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// What happened to a batch of search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were merged into the catalog
    Applied { added: usize },
    /// A newer search started after this one; results discarded
    Stale,
}

#[derive(Debug, Clone)]
pub struct Session {
    profile: UserProfile,
    entries: Vec<CatalogEntry>,
    index: CatalogIndex,
    ratings: RatingStore,
    view: ViewState,
    featured: Option<String>,
    search_generation: u64,
}

impl Session {
    pub fn new(profile: UserProfile, entries: Vec<CatalogEntry>, ratings: RatingStore) -> Self {
        let entries = dedupe(entries);
        let index = CatalogIndex::rebuild(&entries);
        Self {
            profile,
            entries,
            index,
            ratings,
            view: ViewState::default(),
            featured: None,
            search_generation: 0,
        }
    }

    /// Fresh session over the seed catalog
    pub fn seeded() -> Self {
        Self::new(UserProfile::default(), seed_catalog(), RatingStore::new())
    }

    /// Startup: restore a saved snapshot, seeding the catalog when it has no entries.
    ///
    /// A saved featured id is kept only alongside a saved catalog. Returns
    /// the session and whether it should be saved right away (it was seeded).
    pub fn restore(snapshot: Option<StateSnapshot>) -> (Self, bool) {
        match snapshot {
            Some(snapshot) if !snapshot.entries.is_empty() => {
                info!(
                    entries = snapshot.entries.len(),
                    ratings = snapshot.ratings.len(),
                    "Restored saved catalog"
                );
                let mut session = Self::new(snapshot.profile, snapshot.entries, snapshot.ratings);
                session.featured = snapshot.featured;
                (session, false)
            }
            Some(snapshot) => {
                info!(ratings = snapshot.ratings.len(), "Saved catalog empty, seeding");
                (Self::new(snapshot.profile, seed_catalog(), snapshot.ratings), true)
            }
            None => {
                info!("No saved state, seeding catalog");
                (Self::seeded(), true)
            }
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Catalog in insertion order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn entry(&self, entry_id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id() == entry_id)
    }

    /// Last search's lead result, else the first catalog entry
    pub fn featured(&self) -> Option<&CatalogEntry> {
        self.featured
            .as_deref()
            .and_then(|id| self.entry(id))
            .or_else(|| self.entries.first())
    }

    /// Stored featured id, without the first-entry fallback
    pub fn featured_id(&self) -> Option<&str> {
        self.featured.as_deref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view.mode = mode;
    }

    pub fn set_genre_filter(&mut self, genre: Option<String>) {
        self.view.genre_filter = genre.filter(|g| !g.trim().is_empty());
    }

    pub fn set_display_mode(&mut self, display: DisplayMode) {
        self.view.display = display;
    }

    /// Visible entries for the current view state
    pub fn project(&self) -> Projection<'_> {
        project(&self.entries, &self.index, &self.ratings, &self.view)
    }

    /// Rate, absorbing invalid input
    pub fn rate(&mut self, entry_id: &str, raw: &str) {
        self.ratings.rate(entry_id, raw);
    }

    /// Rate, reporting non-numeric input
    pub fn try_rate(&mut self, entry_id: &str, raw: &str) -> Result<u8> {
        self.ratings.try_rate(entry_id, raw)
    }

    /// Replace the whole catalog; ratings are kept
    pub fn replace_catalog(&mut self, entries: Vec<CatalogEntry>) {
        self.entries = dedupe(entries);
        self.featured = None;
        self.reindex();
    }

    /// Append entries whose ids are not yet in the catalog.
    ///
    /// The first appended entry (or the already-present copy of the first
    /// incoming entry) becomes the featured entry. Returns the number added.
    pub fn append_entries(&mut self, incoming: Vec<CatalogEntry>) -> usize {
        let Some(lead) = incoming.first().map(|e| e.id().to_string()) else {
            return 0;
        };
        let mut known: HashSet<String> = self.entries.iter().map(|e| e.id().to_string()).collect();
        let mut added = 0;
        for entry in incoming {
            if known.insert(entry.id().to_string()) {
                self.entries.push(entry);
                added += 1;
            } else {
                debug!(entry_id = %entry.id(), "Skipping entry already in catalog");
            }
        }
        self.featured = Some(lead);
        self.reindex();
        added
    }

    /// Start a search; any earlier outstanding search becomes stale
    pub fn begin_search(&mut self) -> SearchTicket {
        self.search_generation += 1;
        SearchTicket(self.search_generation)
    }

    /// Merge search results unless a newer search has started since `ticket`
    pub fn apply_search(&mut self, ticket: SearchTicket, results: Vec<CatalogEntry>) -> SearchOutcome {
        if ticket.0 != self.search_generation {
            debug!(
                ticket = ticket.0,
                latest = self.search_generation,
                "Discarding stale search results"
            );
            return SearchOutcome::Stale;
        }
        let added = self.append_entries(results);
        SearchOutcome::Applied { added }
    }

    fn reindex(&mut self) {
        self.index = CatalogIndex::rebuild(&self.entries);
    }
}

fn dedupe(entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.id().to_string()))
        .collect()
}
