//! Error type shared by the catalog library and the `mvb` binary

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Settings table could not be opened, read or written
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data directory or config file access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or transmitted JSON could not be encoded/decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad `config.toml`, or a stored setting of the wrong type
    #[error("Configuration error: {0}")]
    Config(String),

    /// No catalog entry with the given id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rating, display mode or API key the user typed was rejected
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
