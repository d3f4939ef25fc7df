//! GRIDIRON — NFL stats lookup with fuzzy name resolution
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod cache;
pub mod config;
pub mod matching;
pub mod provider;
pub mod season;
pub mod service;
pub mod types;
