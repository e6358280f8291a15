//! Command line transport for projectdesk.
//!
//! Parses a request, runs it against the service layer, and prints one JSON
//! document `{"status": <code>, "body": <payload>}`. Exits non-zero for any
//! non-2xx status.

mod commands;

use anyhow::{anyhow, Context};
use clap::Parser;
use commands::Cli;
use log::debug;
use projectdesk_core::db::open_db;
use projectdesk_core::{core_version, init_logging, init_stderr_logging, Settings};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("projectdesk: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = cli.apply_overrides(Settings::from_env());
    start_logging(&settings)?;
    debug!(
        "event=cli_start module=cli status=ok core_version={} db_path={}",
        core_version(),
        settings.db_path.display()
    );

    let conn = open_db(&settings.db_path)
        .with_context(|| format!("failed to open database `{}`", settings.db_path.display()))?;
    let response = commands::dispatch(&conn, &settings, cli.command)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn start_logging(settings: &Settings) -> anyhow::Result<()> {
    match settings.log_dir.as_deref() {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| anyhow!("log directory `{}` is not valid UTF-8", dir.display()))?;
            init_logging(&settings.log_level, dir).map_err(anyhow::Error::msg)
        }
        None => init_stderr_logging(&settings.log_level).map_err(anyhow::Error::msg),
    }
}
