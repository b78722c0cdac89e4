mod cli;
mod logging;
mod reporter;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use reporter::CliReporter;
use tracing::{error, info};
use vb365_cleaner::api::RestClient;
use vb365_cleaner::config::{self as app_config, AppConfig};
use vb365_cleaner::directory::SnapshotOptions;
use vb365_cleaner::{CleanupEngine, Error, RunOptions, RunReport};

const EXIT_RUNTIME_ERROR: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match args.command {
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            ExitCode::SUCCESS
        }
        None => match run_cleanup(&config, args.dry_run, args.save) {
            Ok(report) => {
                print_summary(&report);
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("Error: {:#}", err);
                exit_code_for(&err)
            }
        },
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, Error> {
    let config = match path {
        Some(path) => app_config::load_configuration_from(path)?,
        None => app_config::load_configuration()?,
    };
    config.validate()?;
    Ok(config)
}

fn run_cleanup(config: &AppConfig, dry_run: bool, save: bool) -> anyhow::Result<RunReport> {
    let password = app_config::password_from_env()?;

    let client = RestClient::login(config, &password)
        .with_context(|| format!("logging in to {}", config.vb365_address))?;

    let options = RunOptions {
        snapshot: SnapshotOptions {
            sync_mode: config.sync_mode,
            remove_unavailable: config.remove_unavailable,
        },
        dry_run,
    };
    let mut engine = CleanupEngine::new(&client, options);
    if save {
        engine = engine.with_snapshot_dir(&config.snapshot_dir);
    }

    let reporter = CliReporter::new();
    let report = engine.run(&reporter)?;
    Ok(report)
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_config() => ExitCode::from(EXIT_CONFIG_ERROR),
        _ => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}

fn print_summary(report: &RunReport) {
    let summary = report.summary();
    if report.orphans == 0 {
        info!("{}", "Nothing to clean up".green());
        return;
    }
    if report.dry_run {
        info!(
            "{} orphaned selections: {} jobs would be disabled, {} items would be removed",
            format!("{}", report.orphans).yellow(),
            format!("{}", summary.would_disable).cyan(),
            format!("{}", summary.would_remove).cyan(),
        );
    } else {
        info!(
            "{} orphaned selections: {} jobs disabled, {} items removed, {} skipped",
            format!("{}", report.orphans).yellow(),
            format!("{}", summary.disabled_jobs).red(),
            format!("{}", summary.removed_items).red(),
            format!("{}", summary.skipped).cyan(),
        );
    }
}
