//! Flight Search Backend Library
//!
//! Airport resolution, flight search and a guided trip-planning conversation
//! over the SearchAPI.io Google Flights engines. The binary in `src/main.rs`
//! serves them over HTTP.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod provider;
pub mod search;
pub mod state;
pub mod tools;
