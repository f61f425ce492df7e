//! Integration tests for CLI commands
//!
//! Runs commands against an in-memory catalog database and checks both the
//! printed output and what was saved.

mod helpers;

use std::sync::Arc;

use helpers::{FakeOmdb, GOOD_KEY};
use mvb_cli::commands::{DisplayArg, KeyAction, ListArgs, Toggle};
use mvb_cli::services::{MetadataProvider, OmdbClient};
use mvb_cli::{execute, AppContext, Commands};
use mvb_common::db::{init_database, init_memory_database};
use mvb_common::{Error, StateStore};
use tempfile::TempDir;

async fn context(provider: Option<Arc<dyn MetadataProvider>>) -> AppContext {
    let store = StateStore::new(init_memory_database().await.unwrap());
    AppContext::open(store, provider).await.unwrap()
}

async fn omdb_context(server: &FakeOmdb) -> AppContext {
    let client = OmdbClient::with_base_url(GOOD_KEY.to_string(), &server.base_url).unwrap();
    context(Some(Arc::new(client))).await
}

async fn run(ctx: &mut AppContext, command: Commands) -> String {
    let mut out = Vec::new();
    execute(command, ctx, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn list(rated: bool, genre: Option<&str>, display: DisplayArg) -> Commands {
    Commands::List(ListArgs {
        rated,
        genre: genre.map(str::to_string),
        display,
    })
}

#[tokio::test]
async fn test_first_run_lists_seed_catalog_by_genre() {
    let mut ctx = context(None).await;

    let output = run(&mut ctx, list(false, None, DisplayArg::Carousel)).await;

    let action = output.find("== Action ==").unwrap();
    let comedy = output.find("== Comedy ==").unwrap();
    let drama = output.find("== Drama ==").unwrap();
    assert!(action < comedy && comedy < drama);
    assert!(output.contains("tt1375666  Inception (2010)  [Action]  IMDB: 8.8"));
    assert!(output.contains("tt0111161  The Shawshank Redemption (1994)  IMDB: 9.3"));
}

#[tokio::test]
async fn test_rate_then_list_rated_only() {
    let mut ctx = context(None).await;

    assert_eq!(run(&mut ctx, Commands::Rate { id: "tt0137523".into(), value: "3.5".into() }).await, "4/5\n");
    assert_eq!(run(&mut ctx, Commands::Rate { id: "tt0111161".into(), value: "0".into() }).await, "1/5\n");

    let output = run(&mut ctx, list(true, None, DisplayArg::Grid)).await;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Fight Club (1999)") && lines[0].ends_with("4/5"));
    assert!(lines[1].contains("The Shawshank Redemption") && lines[1].ends_with("1/5"));

    // Ratings were saved
    let snapshot = ctx.store.load().await.unwrap();
    assert_eq!(snapshot.ratings.rating_for("tt0137523"), Some(4));
}

#[tokio::test]
async fn test_non_numeric_rating_leaves_rating_unchanged() {
    let mut ctx = context(None).await;
    run(&mut ctx, Commands::Rate { id: "tt1375666".into(), value: "5".into() }).await;

    let output = run(&mut ctx, Commands::Rate { id: "tt1375666".into(), value: "great".into() }).await;
    assert!(output.starts_with("Rating unchanged"));
    assert_eq!(ctx.session.ratings().rating_for("tt1375666"), Some(5));
}

#[tokio::test]
async fn test_rated_only_filter_with_nothing_rated() {
    let mut ctx = context(None).await;
    let output = run(&mut ctx, list(true, Some("drama"), DisplayArg::Carousel)).await;
    assert_eq!(output, "No movies to show.\n");
}

#[tokio::test]
async fn test_genre_filter_uses_exact_bucket() {
    let mut ctx = context(None).await;

    let output = run(&mut ctx, list(false, Some("Comedy"), DisplayArg::Carousel)).await;
    assert!(output.contains("Forrest Gump"));
    assert!(output.contains("Fight Club"));
    assert!(!output.contains("Inception"));

    let output = run(&mut ctx, list(false, Some("Sci-Fi"), DisplayArg::Carousel)).await;
    assert_eq!(output, "No movies to show.\n");
}

#[tokio::test]
async fn test_show_and_watch() {
    let mut ctx = context(None).await;
    run(&mut ctx, Commands::Rate { id: "tt0848228".into(), value: "2".into() }).await;

    let output = run(&mut ctx, Commands::Show { id: "tt0848228".into() }).await;
    assert!(output.starts_with("The Avengers (2012)\n"));
    assert!(output.contains("Genre:  Action, Sci-Fi [Action]"));
    assert!(output.contains("Rating: 2/5"));

    let output = run(&mut ctx, Commands::Watch { id: "tt0848228".into() }).await;
    assert_eq!(output, "https://www.imdb.com/title/tt0848228/\n");
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let mut ctx = context(None).await;
    let mut out = Vec::new();

    let err = execute(Commands::Show { id: "tt404".into() }, &mut ctx, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));

    let err = execute(
        Commands::Rate { id: "tt404".into(), value: "3".into() },
        &mut ctx,
        &mut out,
    )
    .await
    .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
    assert!(!ctx.session.ratings().is_rated("tt404"));
}

#[tokio::test]
async fn test_search_without_key_resets_to_seed() {
    let mut ctx = context(None).await;

    let output = run(&mut ctx, Commands::Search { query: "heat".into() }).await;
    assert!(output.contains("starter catalog (5 movies)"));
    assert_eq!(ctx.session.entries().len(), 5);
}

#[tokio::test]
async fn test_search_appends_and_features_lead_result() {
    let server = FakeOmdb::start().await;
    let mut ctx = omdb_context(&server).await;

    let output = run(&mut ctx, Commands::Search { query: "heat".into() }).await;
    assert!(output.contains("Found 3 result(s), 3 new."));
    assert!(output.contains("Featured: Heat (1995)"));
    assert_eq!(ctx.session.entries().len(), 8);

    let output = run(&mut ctx, Commands::Featured).await;
    assert!(output.starts_with("Heat (1995)\n"));

    // Searching again adds nothing new
    let output = run(&mut ctx, Commands::Search { query: "heat".into() }).await;
    assert!(output.contains("Found 3 result(s), 0 new."));

    let snapshot = ctx.store.load().await.unwrap();
    assert_eq!(snapshot.entries.len(), 8);
}

#[tokio::test]
async fn test_search_miss_prints_no_results() {
    let server = FakeOmdb::start().await;
    let mut ctx = omdb_context(&server).await;

    let output = run(&mut ctx, Commands::Search { query: "qwertyuiop".into() }).await;
    assert_eq!(output, "No results found\n");
    assert_eq!(ctx.session.entries().len(), 5);
}

#[tokio::test]
async fn test_search_outage_is_an_error() {
    let server = FakeOmdb::start_with_failing_lookups().await;
    let mut ctx = omdb_context(&server).await;
    let mut out = Vec::new();

    let err = execute(Commands::Search { query: "heat".into() }, &mut ctx, &mut out)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Search unavailable"));
    assert_eq!(ctx.session.entries().len(), 5);
}

#[tokio::test]
async fn test_fetch_adds_single_title() {
    let server = FakeOmdb::start().await;
    let mut ctx = omdb_context(&server).await;

    let output = run(&mut ctx, Commands::Fetch { title: "Heat".into(), year: Some("1995".into()) }).await;
    assert_eq!(output, "Added Heat (1995)\n");

    let output = run(&mut ctx, Commands::Fetch { title: "Heat".into(), year: None }).await;
    assert_eq!(output, "Heat (1995) is already in the catalog\n");

    let output = run(&mut ctx, Commands::Fetch { title: "Nope".into(), year: None }).await;
    assert_eq!(output, "No results found\n");
}

#[tokio::test]
async fn test_fetch_without_key_fails() {
    let mut ctx = context(None).await;
    let mut out = Vec::new();
    let result = execute(Commands::Fetch { title: "Heat".into(), year: None }, &mut ctx, &mut out).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_dark_mode_toggle() {
    let mut ctx = context(None).await;

    assert_eq!(run(&mut ctx, Commands::DarkMode { setting: None }).await, "Dark mode: on\n");
    assert_eq!(
        run(&mut ctx, Commands::DarkMode { setting: Some(Toggle::Toggle) }).await,
        "Dark mode: off\n"
    );
    assert!(!ctx.store.dark_mode().await);
    assert_eq!(
        run(&mut ctx, Commands::DarkMode { setting: Some(Toggle::On) }).await,
        "Dark mode: on\n"
    );
}

#[tokio::test]
async fn test_key_management() {
    let mut ctx = context(None).await;

    let action = |action| Commands::Key { action };

    assert_eq!(run(&mut ctx, action(KeyAction::Show)).await, "No OMDb API key stored.\n");
    run(&mut ctx, action(KeyAction::Set { key: "abcdef1234".into() })).await;
    assert_eq!(run(&mut ctx, action(KeyAction::Show)).await, "OMDb API key: ******1234\n");
    run(&mut ctx, action(KeyAction::Clear)).await;
    assert_eq!(ctx.store.api_key().await.unwrap(), None);

    let mut out = Vec::new();
    let err = execute(action(KeyAction::Set { key: "  ".into() }), &mut ctx, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_catalog_persists_between_runs() {
    let server = FakeOmdb::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("movibucks.db");

    {
        let client = OmdbClient::with_base_url(GOOD_KEY.to_string(), &server.base_url).unwrap();
        let store = StateStore::new(init_database(&db_path).await.unwrap());
        let mut ctx = AppContext::open(store, Some(Arc::new(client))).await.unwrap();
        run(&mut ctx, Commands::Fetch { title: "Heat".into(), year: None }).await;
        run(&mut ctx, Commands::Rate { id: "tt0113277".into(), value: "5".into() }).await;
    }

    let store = StateStore::new(init_database(&db_path).await.unwrap());
    let mut ctx = AppContext::open(store, None).await.unwrap();
    let output = run(&mut ctx, list(true, None, DisplayArg::Expanded)).await;
    assert!(output.starts_with("== Action ==\nHeat (1995)\n"));
    assert!(output.contains("Rating: 5/5"));
}

#[tokio::test]
async fn test_featured_entry_persists_between_runs() {
    let server = FakeOmdb::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("movibucks.db");

    {
        let client = OmdbClient::with_base_url(GOOD_KEY.to_string(), &server.base_url).unwrap();
        let store = StateStore::new(init_database(&db_path).await.unwrap());
        let mut ctx = AppContext::open(store, Some(Arc::new(client))).await.unwrap();
        run(&mut ctx, Commands::Search { query: "heat".into() }).await;
    }

    let store = StateStore::new(init_database(&db_path).await.unwrap());
    let mut ctx = AppContext::open(store, None).await.unwrap();
    let output = run(&mut ctx, Commands::Featured).await;
    assert!(output.starts_with("Heat (1995)\n"));
}

#[tokio::test]
async fn test_init_config_writes_defaults_once() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("movibucks").join("config.toml");
    let mut ctx = context(None).await;

    let output = run(&mut ctx, Commands::InitConfig { path: Some(path.clone()), force: false }).await;
    assert!(output.starts_with("Wrote "));
    let config = mvb_common::config::TomlConfig::load(&path).unwrap();
    assert_eq!(config, mvb_common::config::TomlConfig::default());

    let output = run(&mut ctx, Commands::InitConfig { path: Some(path.clone()), force: false }).await;
    assert!(output.starts_with("Config already exists"));

    let output = run(&mut ctx, Commands::InitConfig { path: Some(path), force: true }).await;
    assert!(output.starts_with("Wrote "));
}
