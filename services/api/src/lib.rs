//! services/api/src/lib.rs
//!
//! The quiz web server: session-authenticated pages and the quiz generation API.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
