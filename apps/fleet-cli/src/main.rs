//! # Fleet Rental Command Line
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging (stderr, RUST_LOG or the default filter)         │
//! │  2. Load FleetConfig (defaults → fleet.toml → FLEET_* env → flags)      │
//! │  3. Open SQLite, run pending migrations                                 │
//! │  4. Build the clock (system, or --as-of) and the rental services        │
//! │  5. Overdue sweep, when reconcile_on_startup is set                     │
//! │  6. Run the command, print JSON on stdout                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Errors are printed as `{ "code", "message" }` on stderr with a non-zero
//! exit status.

mod cli;
mod commands;
mod config;
mod error;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use fleet_core::{Clock, ManualClock, SystemClock};
use fleet_db::Database;
use fleet_rental::{RentalLifecycleManager, RentalSearchEngine};

use cli::{Cli, Command};
use commands::Context;
use config::FleetConfig;
use error::{CliError, CliResult};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let body = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{body}");
            ExitCode::from(err.code.exit_code() as u8)
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fleet_rental=trace` - Trace the rental services only
/// - Default: `info,fleet=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fleet=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = FleetConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    if let Some(dir) = config.database_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            CliError::internal(format!("Cannot create {}: {e}", dir.display()))
        })?;
    }

    let store = Arc::new(Database::new(config.db_config()).await?);
    info!(path = %config.database_path.display(), "Database ready");

    let clock: Arc<dyn Clock> = match cli.as_of {
        Some(day) => Arc::new(ManualClock::new(day)),
        None => Arc::new(SystemClock),
    };

    let manager = RentalLifecycleManager::new(Arc::clone(&store), Arc::clone(&clock))
        .with_settings(config.lifecycle_settings()?);

    let sweep_first = config.reconcile_on_startup
        && !cli.no_reconcile
        && !matches!(cli.command, Command::Reconcile);
    if sweep_first {
        let report = manager.check_and_apply_overdue_fines().await?;
        info!(
            overdue = report.overdue,
            created = report.created,
            updated = report.updated,
            "Startup overdue sweep"
        );
    }

    let ctx = Context {
        search: RentalSearchEngine::new(Arc::clone(&store)),
        store: Arc::clone(&store),
        clock,
        manager,
        config,
    };

    let result = commands::dispatch(&ctx, cli.command).await;
    store.close().await;

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}
