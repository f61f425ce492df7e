//! SQLite storage: connection setup and the key/value settings table

pub mod init;
pub mod settings;

pub use init::{create_settings_table, init_database, init_memory_database};
