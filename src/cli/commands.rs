//! Command implementations for the book dashboard CLI
//!
//! The non-interactive commands go through the same session gate and
//! dashboard as the terminal UI: log in, select a page, load it, then print
//! or export what the dashboard holds.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::app::{
    CatalogClient, Dashboard, EnrichmentPipeline, LoadStatus, Shell, SortColumn,
};
use crate::cli::args::{ExportArgs, SearchArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, AuthError, ExportError, Result};

/// Build the enrichment pipeline described by `config`
pub fn build_pipeline(config: &AppConfig) -> Result<EnrichmentPipeline> {
    let client = CatalogClient::with_config(config.client_config())?;
    Ok(EnrichmentPipeline::new(
        Arc::new(client),
        config.dashboard.author_failure_policy,
    ))
}

/// Handle the search command
pub async fn handle_search(args: SearchArgs, config: AppConfig) -> Result<()> {
    let dashboard = load_dashboard(&args, &config).await?;

    println!(
        "🔍 '{}' page {} ({})",
        dashboard.view().query,
        args.page,
        dashboard.range_label()
    );
    println!();
    print_table(&dashboard);

    Ok(())
}

/// Handle the export command
pub async fn handle_export(args: ExportArgs, config: AppConfig) -> Result<()> {
    let dashboard = load_dashboard(&args.search, &config).await?;
    let output = args
        .output
        .unwrap_or_else(|| config.dashboard.export_file.clone());

    export_dashboard(&dashboard, &output)?;
    println!(
        "✅ Exported {} rows to {}",
        dashboard.export_rows().len(),
        output.display()
    );

    Ok(())
}

/// Handle the config command
pub fn handle_config() -> Result<()> {
    print!("{}", AppConfig::default_config_content());
    Ok(())
}

/// Write the dashboard's export rows to `path`
///
/// # Errors
///
/// - `ExportError::LoadInProgress` while a load is outstanding
/// - `ExportError::NothingLoaded` if the latest load did not succeed
pub fn export_dashboard(dashboard: &Dashboard, path: &Path) -> Result<()> {
    match dashboard.status() {
        LoadStatus::Loaded { .. } => {}
        LoadStatus::Loading { .. } => return Err(ExportError::LoadInProgress.into()),
        LoadStatus::Idle | LoadStatus::Failed { .. } => {
            return Err(ExportError::NothingLoaded.into())
        }
    }
    crate::app::write_csv_file(&dashboard.export_rows(), path)?;
    Ok(())
}

/// Log in, select the requested page and load it
async fn load_dashboard(args: &SearchArgs, config: &AppConfig) -> Result<Dashboard> {
    let pipeline = build_pipeline(config)?;
    let password = match &args.password {
        Some(password) => password.clone(),
        None => rpassword::prompt_password("Password: ").map_err(AuthError::PasswordPrompt)?,
    };

    let mut shell = Shell::new(config.dashboard_defaults());
    if shell.login(&args.username, &password).is_none() {
        return Err(AuthError::InvalidCredentials.into());
    }

    let dashboard = shell.dashboard_mut()?;
    if let Some(query) = &args.query {
        dashboard.set_query(query.clone());
    }
    if let Some(page_size) = args.page_size {
        dashboard.set_page_size(page_size);
    }
    dashboard.set_page(args.page.saturating_sub(1));
    dashboard.set_sort(args.sort, args.direction());

    info!(
        "Loading '{}' page {} (size {})",
        dashboard.view().query,
        args.page,
        dashboard.view().page_size
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| AppError::generic(format!("Invalid progress template: {}", e)))?,
    );
    spinner.set_message("Loading books and authors...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    dashboard.refresh(&pipeline).await;
    spinner.finish_and_clear();

    match dashboard.status() {
        LoadStatus::Failed { message } => Err(AppError::generic(format!(
            "Failed to load page: {}",
            message
        ))),
        _ => Ok(dashboard.clone()),
    }
}

/// Print the displayed rows as a fixed-width table
fn print_table(dashboard: &Dashboard) {
    const WIDTHS: [usize; 7] = [36, 24, 6, 28, 7, 18, 24];

    let header: Vec<String> = SortColumn::ALL
        .iter()
        .zip(WIDTHS)
        .map(|(column, width)| {
            let mut label = column.label().to_string();
            if *column == dashboard.view().sort_column {
                label = format!("{} {}", label, dashboard.view().sort_direction.arrow());
            }
            fit(&label, width)
        })
        .collect();
    println!("{}", header.join(" │ "));
    println!("{}", "─".repeat(WIDTHS.iter().sum::<usize>() + 3 * (WIDTHS.len() - 1)));

    let mut shown = 0;
    for book in dashboard.displayed_rows() {
        let cells: Vec<String> = SortColumn::ALL
            .iter()
            .zip(WIDTHS)
            .map(|(column, width)| fit(&column.cell(book), width))
            .collect();
        println!("{}", cells.join(" │ "));
        shown += 1;
    }

    if shown == 0 {
        println!("(no results)");
    }
}

/// Pad or truncate `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
