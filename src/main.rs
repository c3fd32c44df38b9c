mod cli;
mod commands;
mod dispatcher;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use dispatcher::{dispatch_command, DispatchContext};
use paye::config;
use paye::error::TaxError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize logging; stderr keeps stdout clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, prefix) = classify_error(&err);
            eprintln!("{}: {:#}", prefix, err);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli::runner::to_internal_command(&cli.command)?;
    let ctx = DispatchContext {
        rules_source: config::rules_source(cli.rules.as_deref()),
        json_output: cli.json,
    };
    dispatch_command(command, &ctx)
}

/// Bad user input and bad tax rules get distinct exit codes
fn classify_error(err: &anyhow::Error) -> (u8, &'static str) {
    match err.downcast_ref::<TaxError>() {
        Some(e) if e.is_validation() => (2, "invalid input"),
        Some(e) if e.is_config() => (3, "invalid tax rules"),
        _ => (1, "error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn classify_validation_and_config_errors() {
        let validation: Result<()> =
            Err(TaxError::ValidationError("negative".into())).context("calculate");
        assert_eq!(classify_error(&validation.unwrap_err()), (2, "invalid input"));

        let config: Result<()> =
            Err(TaxError::ConfigError("bad brackets".into())).context("load rules");
        assert_eq!(classify_error(&config.unwrap_err()), (3, "invalid tax rules"));

        let other = anyhow::anyhow!("disk full");
        assert_eq!(classify_error(&other), (1, "error"));
    }
}
