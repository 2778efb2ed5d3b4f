//! Book Dashboard CLI application
//!
//! Terminal dashboard over the Open Library catalog with author enrichment,
//! sorting, pagination and CSV export.

use std::fs::OpenOptions;
use std::process;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use book_dashboard::cli::{
    handle_config, handle_export, handle_search, handle_tui, Cli, Commands,
};
use book_dashboard::config::AppConfig;
use book_dashboard::constants::logging::TARGET;
use book_dashboard::errors::{AppError, Result};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(&cli, &config, interactive)?;

    info!("Book Dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        None | Some(Commands::Tui) => {
            info!("Executing tui command");
            handle_tui(config).await
        }
        Some(Commands::Search(args)) => {
            info!("Executing search command");
            handle_search(args, config).await
        }
        Some(Commands::Export(args)) => {
            info!("Executing export command");
            handle_export(args, config).await
        }
        Some(Commands::Config) => handle_config(),
    }
}

/// Initialize logging from CLI flags, falling back to the configured level
///
/// The terminal UI owns the screen, so in interactive mode log lines go to
/// `[logging] log_file` or nowhere.
fn init_logging(cli: &Cli, config: &AppConfig, interactive: bool) -> Result<()> {
    let level: &str = match cli.log_level() {
        Some(level) => level,
        None => &config.logging.level,
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("{}={}", TARGET, level)).map_err(|e| {
            AppError::generic(format!("Invalid log level '{}': {}", level, e))
        })?,
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose);

    match (&config.logging.log_file, interactive) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, true) => builder.with_writer(std::io::sink).init(),
        (None, false) => builder.with_writer(std::io::stderr).init(),
    }

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
    Ok(())
}
