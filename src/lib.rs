//! Offline-first coffee shop journal.
//!
//! Brewlog records visits to coffee shops (name, address, order, price,
//! rating, review, photo) in a local SQLite database and lets a front end
//! list, sort, search and delete them. A cache-first asset worker keeps the
//! front end's static files available without a network.
//!
//! # Architecture
//!
//! - **Storage**: SQLite, one `entries` table with lookup indexes on `name`
//!   and `"order"`, schema versioned in `schema_meta`
//! - **Queries**: full scans ordered or filtered in memory
//! - **Presentation boundary**: front ends raise [`journal::Intent`]s and
//!   receive results through a [`journal::RenderSink`]
//! - **Assets**: a versioned response cache filled on install, served
//!   cache-first over HTTP
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite initialization, schema, and migrations
//! - [`journal`] — Entry store, sort/search, photo codec, and intent dispatch
//! - [`assets`] — Offline asset worker and its response cache
//! - [`server`] — HTTP front for the asset worker

pub mod assets;
pub mod config;
pub mod db;
pub mod error;
pub mod journal;
pub mod server;

pub use error::JournalError;
