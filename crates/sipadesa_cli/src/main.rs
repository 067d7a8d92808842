//! `sipadesa` binary: HTTP server plus store administration commands.

mod cli;
mod commands;

use anyhow::{Context, Result};
use cli::Command;
use sipadesa_core::{default_log_level, init_logging, LogOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();

    let log_dir = std::env::current_dir()
        .context("resolving working directory")?
        .join(&cli.log_dir);
    let mut log_options = LogOptions::new(
        cli.log_level.as_deref().unwrap_or(default_log_level()),
        log_dir,
    );
    log_options.echo_stderr = matches!(cli.cmd, Command::Serve { .. });
    init_logging(&log_options)?;

    let db = cli.db.as_path();
    match cli.cmd {
        Command::Serve {
            bind,
            simulated_latency_ms,
            age_rule,
        } => commands::serve(db, bind, simulated_latency_ms, age_rule).await,
        Command::ImportLegacy { file } => commands::import_legacy(db, &file),
        Command::ExportLegacy { output } => commands::export_legacy(db, output.as_deref()),
        Command::Stats { hamlet, age_rule } => commands::stats(db, hamlet.as_deref(), age_rule),
        Command::Users => commands::users(db),
        Command::VerifyUser { id, area } => commands::verify_user(db, &id, area.as_deref()),
        Command::ResetPassword { id, password } => commands::reset_password(db, &id, &password),
    }
}
