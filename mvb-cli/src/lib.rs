//! # mvb
//!
//! Command-line movie catalog: browse by genre, rate, and pull new titles
//! from OMDb.
//!
//! ## Configuration
//!
//! - `MVB_ROOT_FOLDER` - folder holding `movibucks.db`
//! - `MVB_OMDB_API_KEY` - OMDb API key (when none is stored with `mvb key set`)
//! - `~/.config/movibucks/config.toml` - `root_folder`, `omdb_api_key`, `[logging]`

pub mod commands;
pub mod config;
pub mod services;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{execute, AppContext, Commands};

/// Movibucks - movie catalog browser.
#[derive(Debug, Parser)]
#[command(name = "mvb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder holding the catalog database.
    #[arg(long, short)]
    pub root_folder: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}
