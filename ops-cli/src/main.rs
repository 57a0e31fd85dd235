use clap::Parser;
use colored::*;
use database_layer::SqliteSlotStore;
use error_common::{log_error, HealthWatchError};
use std::process::ExitCode;

use healthwatch::cli::ResetArgs;
use healthwatch::commands::{self, is_corrupt_slot, is_rejection};
use healthwatch::{AppConfig, AppContext, Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} [{}] {}", "error".red().bold(), err.code(), err);
            if is_rejection(&err) {
                eprintln!("  {}", "Check the code and try again, or request a new one".yellow());
            }
            if is_corrupt_slot(&err) {
                eprintln!(
                    "  {}",
                    "Device data is unreadable; run `healthwatch reset --session` or `--queue` for the slot named above".yellow()
                );
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), HealthWatchError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        config.logging.log_level = "debug".to_string();
    }

    // Dropping the guard flushes the file writer, so it lives until exit
    let _log_guard = logger_redacted::init_tracing(&config.logging)?;

    if let Command::Reset(args) = &cli.command {
        return reset(&config, args).await;
    }

    let online = config.network.assume_online && !cli.offline;
    let ctx = AppContext::init(config, online).await?;

    let result = commands::run(&ctx, cli.command).await;
    if let Err(err) = &result {
        log_error("command", err);
    }

    ctx.shutdown().await;
    result
}

async fn reset(config: &AppConfig, args: &ResetArgs) -> Result<(), HealthWatchError> {
    let store = SqliteSlotStore::open(&config.storage).await?;
    let result = commands::reset_slots(&store, args).await;
    store.close().await;

    for slot in result? {
        println!("{} Cleared {}", "✓".green(), slot);
    }
    Ok(())
}
