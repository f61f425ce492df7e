//! Command execution
//!
//! Each command works on an [`AppContext`] and writes its human-readable
//! output to the supplied writer. Commands that change the catalog, ratings
//! or preferences save before returning.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use mvb_common::config::{user_config_path, write_toml_config, TomlConfig};
use mvb_common::{
    CatalogEntry, DisplayMode, Error, Projection, Session, StateStore, ViewMode,
};
use tracing::info;

use crate::services::search::{run_search, SearchReport};
use crate::services::watch::watch_url;
use crate::services::MetadataProvider;

/// Everything a command needs
pub struct AppContext {
    pub store: StateStore,
    pub session: Session,
    /// `None` when no API key is configured
    pub provider: Option<Arc<dyn MetadataProvider>>,
}

impl AppContext {
    /// Open the saved session (seeding it on first run)
    pub async fn open(
        store: StateStore,
        provider: Option<Arc<dyn MetadataProvider>>,
    ) -> Result<Self> {
        let session = store
            .open_session()
            .await
            .context("Failed to open catalog session")?;
        Ok(Self {
            store,
            session,
            provider,
        })
    }

    async fn save(&self) -> Result<()> {
        self.store
            .save(&self.session)
            .await
            .context("Failed to save catalog state")
    }

    fn entry(&self, entry_id: &str) -> Result<&CatalogEntry> {
        self.session
            .entry(entry_id)
            .ok_or_else(|| Error::NotFound(format!("movie {}", entry_id)).into())
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the catalog.
    List(ListArgs),
    /// Search the metadata provider and add the results to the catalog.
    Search {
        /// Title to search for.
        query: String,
    },
    /// Add the best match for one title.
    Fetch {
        /// Exact title.
        title: String,
        /// Release year.
        #[arg(long, short)]
        year: Option<String>,
    },
    /// Rate a movie from 1 to 5.
    Rate {
        /// Movie id.
        id: String,
        /// Rating; decimals are rounded and the result clamped to 1-5.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Show one movie's details.
    Show {
        /// Movie id.
        id: String,
    },
    /// Print the external listing link for a movie.
    Watch {
        /// Movie id.
        id: String,
    },
    /// Show the featured movie (lead result of the last search, kept across runs).
    Featured,
    /// Read or change the dark mode preference.
    DarkMode {
        /// New setting; prints the current one when omitted.
        #[arg(value_enum)]
        setting: Option<Toggle>,
    },
    /// Manage the stored OMDb API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Write a config file with default settings.
    InitConfig {
        /// Where to write it; defaults to the per-user config path.
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the list command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Only movies you have rated.
    #[arg(long)]
    pub rated: bool,

    /// Only this genre.
    #[arg(long, short)]
    pub genre: Option<String>,

    /// Layout.
    #[arg(long, short, value_enum, default_value_t = DisplayArg::Carousel)]
    pub display: DisplayArg,
}

/// Layout choices on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DisplayArg {
    /// Genre rows.
    #[default]
    Carousel,
    /// One flat grid.
    Grid,
    /// Genre rows with detail cards.
    Expanded,
}

impl From<DisplayArg> for DisplayMode {
    fn from(arg: DisplayArg) -> Self {
        match arg {
            DisplayArg::Carousel => DisplayMode::Carousel,
            DisplayArg::Grid => DisplayMode::Grid,
            DisplayArg::Expanded => DisplayMode::Expanded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
    Toggle,
}

#[derive(Debug, Subcommand)]
pub enum KeyAction {
    /// Store a key.
    Set {
        /// OMDb API key.
        key: String,
    },
    /// Remove the stored key.
    Clear,
    /// Show whether a key is stored.
    Show,
}

/// Execute one command.
///
/// # Errors
///
/// Returns an error for unknown movie ids, provider failures, invalid keys
/// and storage failures.
pub async fn execute(command: Commands, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::List(args) => list(args, ctx, out),
        Commands::Search { query } => search(&query, ctx, out).await,
        Commands::Fetch { title, year } => fetch(&title, year.as_deref(), ctx, out).await,
        Commands::Rate { id, value } => rate(&id, &value, ctx, out).await,
        Commands::Show { id } => {
            let entry = ctx.entry(&id)?;
            write_details(entry, &ctx.session, out)
        }
        Commands::Watch { id } => {
            let entry = ctx.entry(&id)?;
            writeln!(out, "{}", watch_url(entry))?;
            Ok(())
        }
        Commands::Featured => match ctx.session.featured() {
            Some(entry) => write_details(entry, &ctx.session, out),
            None => {
                writeln!(out, "No movies to show.")?;
                Ok(())
            }
        },
        Commands::DarkMode { setting } => dark_mode(setting, ctx, out).await,
        Commands::Key { action } => key(action, ctx, out).await,
        Commands::InitConfig { path, force } => {
            let path = match path.or_else(user_config_path) {
                Some(path) => path,
                None => bail!("No config directory on this platform; pass --path"),
            };
            init_config(&path, force, out)
        }
    }
}

fn list(args: ListArgs, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    ctx.session.set_view_mode(if args.rated {
        ViewMode::RatedOnly
    } else {
        ViewMode::All
    });
    ctx.session.set_genre_filter(args.genre);
    ctx.session.set_display_mode(args.display.into());

    let session = &ctx.session;
    let expanded = session.view().display == DisplayMode::Expanded;
    let projection = session.project();

    if projection.is_empty() {
        writeln!(out, "No movies to show.")?;
        return Ok(());
    }

    match &projection {
        Projection::Grouped(groups) => {
            for (genre, entries) in groups {
                writeln!(out, "== {} ==", genre)?;
                for entry in entries {
                    if expanded {
                        write_details(entry, session, out)?;
                        writeln!(out)?;
                    } else {
                        write_line(entry, session, out)?;
                    }
                }
            }
        }
        Projection::Flat(entries) => {
            for entry in entries {
                write_line(entry, session, out)?;
            }
        }
    }
    Ok(())
}

async fn search(query: &str, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    let provider = ctx.provider.clone();
    let report = run_search(&mut ctx.session, provider.as_deref(), query).await;

    match report {
        SearchReport::EmptyQuery => writeln!(out, "Enter a title to search for.")?,
        SearchReport::Seeded => {
            ctx.save().await?;
            writeln!(
                out,
                "No OMDb API key configured; showing the starter catalog ({} movies).",
                ctx.session.entries().len()
            )?;
        }
        SearchReport::Found { results, added } => {
            ctx.save().await?;
            writeln!(out, "Found {} result(s), {} new.", results, added)?;
            if let Some(entry) = ctx.session.featured() {
                writeln!(out, "Featured: {}", entry.display_title())?;
            }
        }
        SearchReport::NotFound => writeln!(out, "No results found")?,
        SearchReport::Unavailable(reason) => bail!("Search unavailable: {}", reason),
        SearchReport::Stale => {}
    }
    Ok(())
}

async fn fetch(
    title: &str,
    year: Option<&str>,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(provider) = ctx.provider.clone() else {
        bail!("OMDb API key not configured. Set one with `mvb key set <KEY>` or MVB_OMDB_API_KEY");
    };

    let found = provider
        .fetch_by_title(title, year)
        .await
        .with_context(|| format!("{} lookup failed", provider.name()))?;

    let Some(entry) = found else {
        writeln!(out, "No results found")?;
        return Ok(());
    };

    let display = entry.display_title();
    let added = ctx.session.append_entries(vec![entry]);
    ctx.save().await?;

    if added > 0 {
        writeln!(out, "Added {}", display)?;
    } else {
        writeln!(out, "{} is already in the catalog", display)?;
    }
    Ok(())
}

async fn rate(entry_id: &str, raw: &str, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    ctx.entry(entry_id)?;

    match ctx.session.try_rate(entry_id, raw) {
        Ok(stars) => {
            ctx.save().await?;
            info!(entry_id = %entry_id, stars, "Rating saved");
            writeln!(out, "{}/5", stars)?;
        }
        Err(Error::InvalidInput(reason)) => {
            writeln!(out, "Rating unchanged: {}", reason)?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn dark_mode(setting: Option<Toggle>, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    let current = ctx.store.dark_mode().await;
    let enabled = match setting {
        None => current,
        Some(Toggle::On) => true,
        Some(Toggle::Off) => false,
        Some(Toggle::Toggle) => !current,
    };

    if setting.is_some() {
        ctx.store
            .set_dark_mode(enabled)
            .await
            .context("Failed to save dark mode preference")?;
    }

    writeln!(out, "Dark mode: {}", if enabled { "on" } else { "off" })?;
    Ok(())
}

async fn key(action: KeyAction, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    match action {
        KeyAction::Set { key } => {
            if !crate::config::is_valid_key(&key) {
                return Err(Error::InvalidInput("API key must not be blank".to_string()).into());
            }
            ctx.store.set_api_key(&key).await.context("Failed to store API key")?;
            writeln!(out, "OMDb API key saved.")?;
        }
        KeyAction::Clear => {
            ctx.store.clear_api_key().await.context("Failed to remove API key")?;
            writeln!(out, "OMDb API key removed.")?;
        }
        KeyAction::Show => match ctx.store.api_key().await? {
            Some(key) => writeln!(out, "OMDb API key: {}", mask_key(&key))?,
            None => writeln!(out, "No OMDb API key stored.")?,
        },
    }
    Ok(())
}

fn init_config(path: &Path, force: bool, out: &mut dyn Write) -> Result<()> {
    if path.exists() && !force {
        writeln!(out, "Config already exists at {} (use --force to replace it)", path.display())?;
        return Ok(());
    }

    write_toml_config(&TomlConfig::default(), path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default config");
    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}

/// Hide all but the last four characters
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let shown = chars.len().min(4);
    let hidden = chars.len() - shown;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

fn write_line(entry: &CatalogEntry, session: &Session, out: &mut dyn Write) -> Result<()> {
    let rating = entry.rating_display(session.ratings().rating_for(entry.id()));
    match entry.style().badge {
        Some(badge) => writeln!(
            out,
            "  {}  {}  [{}]  {}",
            entry.id(),
            entry.display_title(),
            badge,
            rating
        )?,
        None => writeln!(out, "  {}  {}  {}", entry.id(), entry.display_title(), rating)?,
    }
    Ok(())
}

fn write_details(entry: &CatalogEntry, session: &Session, out: &mut dyn Write) -> Result<()> {
    let rating = entry.rating_display(session.ratings().rating_for(entry.id()));
    writeln!(out, "{}", entry.display_title())?;
    match entry.style().badge {
        Some(badge) => writeln!(out, "Genre:  {} [{}]", entry.genre(), badge)?,
        None => writeln!(out, "Genre:  {}", entry.genre())?,
    }
    writeln!(out, "Rating: {}", rating)?;
    writeln!(out, "Poster: {}", entry.poster())?;
    writeln!(out, "{}", entry.short_plot())?;
    Ok(())
}
