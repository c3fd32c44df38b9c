use anyhow::Result;
use chrono::Datelike;

use crate::cli::{Commands, RulesCommands};
use crate::commands::Command;
use paye::tax::{parse_money, CalcInputs, Period};

/// Convert clap `Commands` into the internal `commands::Command`.
/// Amounts and periods are parsed here, so bad input surfaces as a
/// validation error before any rule book is read.
pub fn to_internal_command(c: &Commands) -> Result<Command> {
    match c {
        Commands::Calculate {
            amount,
            period,
            year,
            pension,
            housing,
            other,
        } => {
            let period: Period = period.parse()?;
            let mut inputs = CalcInputs::new(parse_money(amount)?, period);
            inputs.pension_contribution = parse_optional(pension.as_deref())?;
            inputs.housing_fund_contribution = parse_optional(housing.as_deref())?;
            inputs.other_reliefs = parse_optional(other.as_deref())?;

            Ok(Command::Calculate {
                inputs,
                year: year.unwrap_or_else(current_year),
            })
        }

        Commands::Rules { action } => match action {
            RulesCommands::Show { year } => Ok(Command::RulesShow {
                year: year.unwrap_or_else(current_year),
            }),
            RulesCommands::Check { path } => Ok(Command::RulesCheck { path: path.clone() }),
            RulesCommands::Init { force } => Ok(Command::RulesInit {
                year: current_year(),
                force: *force,
            }),
        },
    }
}

fn parse_optional(value: Option<&str>) -> Result<Option<rust_decimal::Decimal>> {
    Ok(value.map(parse_money).transpose()?)
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use paye::error::TaxError;
    use rust_decimal_macros::dec;

    fn calculate(amount: &str, period: &str) -> Commands {
        Commands::Calculate {
            amount: amount.to_string(),
            period: period.to_string(),
            year: Some(2024),
            pension: None,
            housing: Some("75,000".to_string()),
            other: None,
        }
    }

    #[test]
    fn convert_calculate() {
        let converted = to_internal_command(&calculate("250,000", "monthly")).unwrap();
        match converted {
            Command::Calculate { inputs, year } => {
                assert_eq!(year, 2024);
                assert_eq!(inputs.gross_amount, dec!(250000));
                assert_eq!(inputs.period, Period::Monthly);
                assert_eq!(inputs.housing_fund_contribution, Some(dec!(75000)));
                assert_eq!(inputs.pension_contribution, None);
            }
            other => panic!("unexpected converted result: {:?}", other),
        }
    }

    #[test]
    fn bad_amount_is_validation_error() {
        let err = to_internal_command(&calculate("lots", "annual")).unwrap_err();
        let tax_err = err.downcast_ref::<TaxError>().expect("TaxError");
        assert!(tax_err.is_validation());
    }

    #[test]
    fn bad_period_is_validation_error() {
        let err = to_internal_command(&calculate("100", "fortnightly")).unwrap_err();
        assert!(err.downcast_ref::<TaxError>().unwrap().is_validation());
    }

    #[test]
    fn rules_show_defaults_to_current_year() {
        let converted = to_internal_command(&Commands::Rules {
            action: RulesCommands::Show { year: None },
        })
        .unwrap();
        assert_eq!(converted, Command::RulesShow { year: current_year() });
    }
}
