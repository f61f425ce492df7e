//! Local stand-in for the OMDb API
//!
//! Serves canned records on 127.0.0.1 with an OS-assigned port:
//! - `s=heat`: three hits (tt0113277, tt0000002, tt0000003)
//! - `s=reel`: eight hits (tt2000001..tt2000008), each detail answers slowly
//! - `i=<id>`: detail record; tt0113277 answers slowest
//! - `t=<title>`: title lookup; `Heat` requires `y=1995` when a year is sent
//!
//! Any key other than [`GOOD_KEY`] gets a 401.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub const GOOD_KEY: &str = "test-key";

#[derive(Default)]
struct FakeState {
    /// Detail and title lookups answer 500
    fail_lookups: bool,
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Running fake server
pub struct FakeOmdb {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeOmdb {
    pub async fn start() -> Self {
        Self::spawn(FakeState::default()).await
    }

    /// Searches succeed but every detail and title lookup fails
    pub async fn start_with_failing_lookups() -> Self {
        Self::spawn(FakeState {
            fail_lookups: true,
            ..Default::default()
        })
        .await
    }

    async fn spawn(state: FakeState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/", get(handle))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/", addr),
            state,
        }
    }

    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Most `i=` lookups seen being served at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Base URL nothing is listening on
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if params.get("apikey").map(String::as_str) != Some(GOOD_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"Response": "False", "Error": "Invalid API key!"})),
        )
            .into_response();
    }

    if let Some(query) = params.get("s") {
        return Json(search(query)).into_response();
    }

    if state.fail_lookups && (params.contains_key("i") || params.contains_key("t")) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable").into_response();
    }

    if let Some(id) = params.get("i") {
        let current = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        state.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let delay = if id == "tt0113277" {
            Some(Duration::from_millis(100))
        } else if id.starts_with("tt20000") {
            Some(Duration::from_millis(50))
        } else {
            None
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        state.in_flight.fetch_sub(1, Ordering::SeqCst);
        return Json(record(id).unwrap_or_else(not_found)).into_response();
    }

    if let Some(title) = params.get("t") {
        let year = params.get("y").map(String::as_str);
        let found = match (title.to_lowercase().as_str(), year) {
            ("heat", None) | ("heat", Some("1995")) => record("tt0113277"),
            _ => None,
        };
        return Json(found.unwrap_or_else(not_found)).into_response();
    }

    Json(json!({"Response": "False", "Error": "Incorrect IMDb ID."})).into_response()
}

fn not_found() -> Value {
    json!({"Response": "False", "Error": "Movie not found!"})
}

fn search(query: &str) -> Value {
    if query.eq_ignore_ascii_case("heat") {
        json!({
            "Search": [
                {"Title": "Heat", "Year": "1995", "imdbID": "tt0113277", "Type": "movie"},
                {"Title": "Heat Wave", "Year": "2009", "imdbID": "tt0000002", "Type": "movie"},
                {"Title": "Heat Sparse", "Year": "2020", "imdbID": "tt0000003", "Type": "movie"}
            ],
            "totalResults": "3",
            "Response": "True"
        })
    } else if query.eq_ignore_ascii_case("reel") {
        let hits: Vec<Value> = reel_ids()
            .map(|id| json!({"Title": format!("Reel {}", id), "Year": "2001", "imdbID": id, "Type": "movie"}))
            .collect();
        json!({"Search": hits, "totalResults": "8", "Response": "True"})
    } else {
        not_found()
    }
}

fn reel_ids() -> impl Iterator<Item = String> {
    (1..=8).map(|n| format!("tt200000{}", n))
}

fn record(id: &str) -> Option<Value> {
    let record = match id {
        "tt0113277" => json!({
            "Title": "Heat",
            "Year": "1995",
            "Genre": "Action, Crime, Drama",
            "Plot": "A group of high-end professional thieves start to feel the heat from the LAPD when they unknowingly leave a clue at their latest heist.",
            "Poster": "http://img.example.com/heat.jpg",
            "imdbRating": "8.3",
            "imdbID": "tt0113277",
            "Response": "True"
        }),
        "tt0000002" => json!({
            "Title": "Heat Wave",
            "Year": "2009",
            "Genre": "Comedy, Romance",
            "Plot": "Summer goes wrong.",
            "Poster": "https://img.example.com/wave.jpg",
            "imdbRating": "5.9",
            "imdbID": "tt0000002",
            "Response": "True"
        }),
        "tt0000003" => json!({
            "Title": "Heat Sparse",
            "Year": "2020",
            "Poster": "N/A",
            "imdbID": "tt0000003",
            "Response": "True"
        }),
        reel if reel_ids().any(|id| id == reel) => json!({
            "Title": format!("Reel {}", reel),
            "Year": "2001",
            "Genre": "Documentary",
            "imdbID": reel,
            "Response": "True"
        }),
        _ => return None,
    };
    Some(record)
}
