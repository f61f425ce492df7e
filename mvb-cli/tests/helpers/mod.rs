//! Test helper utilities
//!
//! Shared utilities for testing mvb-cli

pub mod fake_omdb;

pub use fake_omdb::{closed_base_url, FakeOmdb, GOOD_KEY};
