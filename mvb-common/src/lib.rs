//! # Movibucks Common Library
//!
//! Core of the movie catalog:
//! - Catalog entries, genre index and seed catalog
//! - Rating store
//! - View projection
//! - Application session
//! - State snapshot codec and persistence gateway
//! - Configuration loading

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod persistence;
pub mod projection;
pub mod ratings;
pub mod session;
pub mod snapshot;
pub mod user;

pub use catalog::{CatalogEntry, CatalogIndex, NewEntry};
pub use error::{Error, Result};
pub use persistence::StateStore;
pub use projection::{DisplayMode, Projection, ViewMode, ViewState};
pub use ratings::RatingStore;
pub use session::{SearchOutcome, SearchTicket, Session};
