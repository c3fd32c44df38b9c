use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "paye")]
#[command(version, about = "Personal income tax (PAYE) estimator")]
#[command(
    long_about = "Estimate annual and monthly PAYE income tax from gross income using versioned, configurable bracket and relief rules."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Rule book file (TOML); overrides the PAYE_RULES environment variable
    #[arg(long = "rules", global = true, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate tax for a gross income
    Calculate {
        /// Gross income (e.g., 3000000 or 250,000)
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Period the amount covers: monthly or annual
        #[arg(short, long, default_value = "annual")]
        period: String,

        /// Tax year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Actual annual pension contribution (defaults to the rule set's rate)
        #[arg(long, allow_hyphen_values = true)]
        pension: Option<String>,

        /// Actual annual National Housing Fund contribution (defaults to the rule set's rate)
        #[arg(long, allow_hyphen_values = true)]
        housing: Option<String>,

        /// Other annual reliefs (life assurance, gratuities, ...)
        #[arg(long, allow_hyphen_values = true)]
        other: Option<String>,
    },

    /// Tax rule book management
    Rules {
        #[command(subcommand)]
        action: RulesCommands,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Show the rule set used for a year
    Show {
        /// Tax year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Validate a rule book file
    Check {
        /// Path to the TOML rule book
        path: PathBuf,
    },

    /// Write the built-in default rule book to the rules path
    Init {
        /// Overwrite an existing rule book
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_calculate_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "paye", "calculate", "250000", "--period", "monthly", "--json", "--no-color",
        ])
        .expect("parse failed");

        assert!(cli.json);
        assert!(cli.no_color);
        match cli.command {
            Commands::Calculate { amount, period, .. } => {
                assert_eq!(amount, "250000");
                assert_eq!(period, "monthly");
            }
            _ => panic!("expected calculate"),
        }
    }

    #[test]
    fn negative_amount_reaches_validation() {
        let cli = Cli::try_parse_from(["paye", "calculate", "-5"]).expect("parse failed");
        match cli.command {
            Commands::Calculate { amount, .. } => assert_eq!(amount, "-5"),
            _ => panic!("expected calculate"),
        }
    }
}
