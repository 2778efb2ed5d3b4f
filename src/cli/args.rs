//! Command-line argument parsing for the book dashboard
//!
//! This module defines the CLI structure using clap derive macros. With no
//! subcommand the interactive dashboard starts.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{PageSize, SortColumn, SortDirection};

/// Book Dashboard - search the Open Library catalog
#[derive(Parser, Debug)]
#[command(
    name = "book_dashboard",
    version,
    about = "Search the Open Library catalog, enrich results with author data and export CSV",
    long_about = "A terminal dashboard over the Open Library search and author APIs.
Results are paginated and sortable, enriched with each first author's birth date
and best-known work, and can be exported as a CSV file."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand; defaults to the interactive dashboard
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (trace level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive terminal dashboard
    Tui,

    /// Load one page and print it as a table
    Search(SearchArgs),

    /// Load one page and write it as CSV
    Export(ExportArgs),

    /// Print the default configuration file
    Config,
}

/// Login and page selection shared by `search` and `export`
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Dashboard username
    #[arg(short, long)]
    pub username: String,

    /// Dashboard password; prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,

    /// Search text; defaults to the configured query
    #[arg(short = 'Q', long)]
    pub query: Option<String>,

    /// 1-based page number
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (10, 50 or 100)
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<PageSize>,

    /// Column to sort the page by
    #[arg(long, default_value = "title", value_parser = parse_sort_column)]
    pub sort: SortColumn,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub descending: bool,
}

impl SearchArgs {
    /// Sort direction requested on the command line
    pub fn direction(&self) -> SortDirection {
        if self.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Arguments for the export command
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Output file; defaults to the configured export file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

fn parse_page_size(raw: &str) -> Result<PageSize, String> {
    let size: u32 = raw.parse().map_err(|e| format!("{}", e))?;
    PageSize::try_from(size)
}

fn parse_sort_column(raw: &str) -> Result<SortColumn, String> {
    raw.parse()
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective log level based on verbosity flags
    ///
    /// `None` means no flag was given and the configured level applies.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.global.very_verbose {
            Some("trace")
        } else if self.global.verbose {
            Some("debug")
        } else if self.global.quiet {
            Some("error")
        } else {
            None
        }
    }
}
