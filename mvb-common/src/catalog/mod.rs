//! Catalog entries, genre index and the seed catalog

pub mod entry;
pub mod index;
pub mod seed;

pub use entry::{CatalogEntry, GenreStyle, NewEntry, DEFAULT_GENRE};
pub use index::CatalogIndex;
pub use seed::seed_catalog;
