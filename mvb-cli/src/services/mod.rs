//! Services: metadata provider, search coordination, external links

pub mod omdb_client;
pub mod provider;
pub mod search;
pub mod watch;

pub use omdb_client::OmdbClient;
pub use provider::{MetadataProvider, ProviderError};
