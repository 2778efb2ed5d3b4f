//! Book Dashboard Library
//!
//! Searches the Open Library catalog, enriches each result with its first
//! author's birth date and best-known work, and keeps the page, sort and
//! export state behind a login gate.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
