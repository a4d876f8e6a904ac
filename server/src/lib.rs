//! WriteFlow backend: a writing-assistance HTTP service. Tool endpoints
//! (grammar, paraphrase, humanize, AI-check, chat) route through a mode
//! dispatcher with ordered provider fallback and a deterministic-shape mock
//! terminal; chat sessions and writing entries persist to SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod providers;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;
