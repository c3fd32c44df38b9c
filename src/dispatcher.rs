//! Command dispatcher that routes parsed commands to their handlers.
//!
//! Handlers own all I/O: reading the rule book, printing tables or JSON. The
//! tax engine itself stays pure.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use tracing::info;

use crate::cli::formatters;
use crate::commands::Command;
use paye::config::{self, RuleBook, RulesSource};
use paye::tax::{self, CalcInputs, RuleSet};

/// Settings shared by every command
pub struct DispatchContext {
    pub rules_source: Option<RulesSource>,
    pub json_output: bool,
}

/// Route a parsed command to its handler
pub fn dispatch_command(command: Command, ctx: &DispatchContext) -> Result<()> {
    match command {
        Command::Calculate { inputs, year } => dispatch_calculate(&inputs, year, ctx),
        Command::RulesShow { year } => dispatch_rules_show(year, ctx),
        Command::RulesCheck { path } => dispatch_rules_check(&path, ctx.json_output),
        Command::RulesInit { year, force } => dispatch_rules_init(year, force, ctx),
    }
}

fn dispatch_calculate(inputs: &CalcInputs, year: i32, ctx: &DispatchContext) -> Result<()> {
    info!("Calculating PAYE for {} ({} income)", year, inputs.period);

    let (rules, _) = resolve_rules(year, ctx)?;
    let outputs = tax::calculate(inputs, &rules)
        .with_context(|| format!("tax calculation for {} failed", year))?;

    if ctx.json_output {
        println!("{}", formatters::format_calculation_json(&outputs));
    } else {
        print!("{}", formatters::format_calculation_table(&outputs));
    }
    Ok(())
}

fn dispatch_rules_show(year: i32, ctx: &DispatchContext) -> Result<()> {
    let (rules, source) = resolve_rules(year, ctx)?;

    if ctx.json_output {
        println!("{}", formatters::format_rules_json(&rules));
    } else {
        print!("{}", formatters::format_rules_table(&rules, &source));
    }
    Ok(())
}

fn dispatch_rules_check(path: &Path, json_output: bool) -> Result<()> {
    info!("Validating rule book {}", path.display());

    let book = RuleBook::load(path)
        .with_context(|| format!("rule book {} is invalid", path.display()))?;

    print!(
        "{}",
        formatters::format_rule_book_check(&path.display().to_string(), &book.years(), json_output)
    );
    if json_output {
        println!();
    }
    Ok(())
}

fn dispatch_rules_init(year: i32, force: bool, ctx: &DispatchContext) -> Result<()> {
    let path = ctx
        .rules_source
        .as_ref()
        .map(|source| source.path().to_path_buf())
        .context("could not determine the config directory; pass --rules <PATH>")?;

    if path.exists() && !force {
        bail!(
            "{} already exists; use --force to overwrite it",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let book = RuleBook::with_default(year);
    std::fs::write(&path, book.to_toml_string()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote default rule book to {}", path.display());

    if ctx.json_output {
        println!(
            "{}",
            serde_json::json!({ "path": path.display().to_string(), "years": book.years() })
        );
    } else {
        println!(
            "{} Wrote the default {} rule set to {}",
            "✓".green().bold(),
            year,
            path.display()
        );
    }
    Ok(())
}

/// Rule set for `year` plus a label describing where it came from
fn resolve_rules(year: i32, ctx: &DispatchContext) -> Result<(RuleSet, String)> {
    let book = config::load_rule_book(ctx.rules_source.as_ref()).with_context(|| {
        match &ctx.rules_source {
            Some(source) => format!("failed to load rule book {}", source.path().display()),
            None => "failed to load rule book".to_string(),
        }
    })?;

    let source = match (book.for_year(year), &ctx.rules_source) {
        (Some(_), Some(source)) => source.path().display().to_string(),
        _ => "built-in default".to_string(),
    };

    Ok((book.resolve(year), source))
}
