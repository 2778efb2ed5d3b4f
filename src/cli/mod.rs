//! Command-line interface components
//!
//! This module contains CLI-specific code for the book dashboard, including
//! argument parsing, the one-shot commands and the interactive terminal UI.

pub mod args;
pub mod commands;
pub mod tui;

pub use args::{Cli, Commands, ExportArgs, GlobalArgs, SearchArgs};
pub use commands::{build_pipeline, export_dashboard, handle_config, handle_export, handle_search};
pub use tui::handle_tui;
