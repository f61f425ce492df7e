//! Persistence gateway
//!
//! Snapshots the session into the settings table as one JSON document and
//! restores it at startup. A missing, unreadable or malformed document is
//! "no saved state"; the caller falls back to the seed catalog.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db::settings::{self, CATALOG_STATE_KEY, DARK_MODE_KEY, OMDB_API_KEY};
use crate::session::Session;
use crate::snapshot::{self, StateSnapshot};
use crate::Result;

/// Dark mode is on until the user turns it off
const DEFAULT_DARK_MODE: bool = true;

#[derive(Debug, Clone)]
pub struct StateStore {
    db: SqlitePool,
}

impl StateStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    /// Write the full catalog and rating snapshot; last write wins
    pub async fn save(&self, session: &Session) -> Result<()> {
        let document = snapshot::encode(
            session.profile(),
            session.ratings(),
            session.entries(),
            session.featured_id(),
        )?;
        settings::set_setting(&self.db, CATALOG_STATE_KEY, document).await?;
        debug!(
            entries = session.entries().len(),
            ratings = session.ratings().len(),
            "Saved catalog state"
        );
        Ok(())
    }

    /// Read the saved state, or `None` when there is nothing usable
    pub async fn load(&self) -> Option<StateSnapshot> {
        let raw = match settings::get_raw(&self.db, CATALOG_STATE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved catalog state");
                return None;
            }
            Err(e) => {
                warn!("Could not read saved state: {}", e);
                return None;
            }
        };

        match snapshot::decode(&raw) {
            Ok(snapshot) => {
                info!(
                    entries = snapshot.entries.len(),
                    ratings = snapshot.ratings.len(),
                    "Loaded saved state"
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!("Could not load saved state: {}", e);
                None
            }
        }
    }

    /// Load the saved session, seeding (and saving) when there is none
    pub async fn open_session(&self) -> Result<Session> {
        let (session, needs_save) = Session::restore(self.load().await);
        if needs_save {
            self.save(&session).await?;
        }
        Ok(session)
    }

    pub async fn dark_mode(&self) -> bool {
        match settings::get_setting::<bool>(&self.db, DARK_MODE_KEY).await {
            Ok(Some(enabled)) => enabled,
            Ok(None) => DEFAULT_DARK_MODE,
            Err(e) => {
                warn!("Ignoring stored dark mode preference: {}", e);
                DEFAULT_DARK_MODE
            }
        }
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        settings::set_setting(&self.db, DARK_MODE_KEY, enabled).await
    }

    /// Stored provider key, if any (blank counts as none)
    pub async fn api_key(&self) -> Result<Option<String>> {
        let key = settings::get_raw(&self.db, OMDB_API_KEY).await?;
        Ok(key.filter(|k| !k.trim().is_empty()))
    }

    pub async fn set_api_key(&self, key: &str) -> Result<()> {
        settings::set_setting(&self.db, OMDB_API_KEY, key.trim()).await
    }

    pub async fn clear_api_key(&self) -> Result<()> {
        settings::delete_setting(&self.db, OMDB_API_KEY).await
    }
}
