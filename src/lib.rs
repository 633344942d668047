//! VOD catalog add-on
//!
//! Turns one operator-supplied URL, either a playlist document or a single
//! playable video, into a browsable catalog served over HTTP.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod sources;
pub mod utils;
pub mod web;
