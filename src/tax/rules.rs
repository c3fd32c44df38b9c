//! Versioned tax rule sets
//!
//! A [`RuleSet`] is plain data: the graduated brackets and the relief
//! parameters for one tax year. It is validated once when loaded and then
//! shared read-only by every computation.

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::income::{money_add, money_mul};
use crate::error::{Result, TaxError};

/// Every bracket line item label starts with this
pub const BRACKET_LABEL_PREFIX: &str = "Tax @";

/// Upper limit of a bracket, in cumulative taxable income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum UpperBound {
    Bounded(Decimal),
    Unbounded,
}

impl UpperBound {
    pub fn unbounded() -> Self {
        UpperBound::Unbounded
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, UpperBound::Unbounded)
    }

    pub fn as_amount(&self) -> Option<Decimal> {
        match self {
            UpperBound::Bounded(amount) => Some(*amount),
            UpperBound::Unbounded => None,
        }
    }
}

impl From<Option<Decimal>> for UpperBound {
    fn from(value: Option<Decimal>) -> Self {
        match value {
            Some(amount) => UpperBound::Bounded(amount),
            None => UpperBound::Unbounded,
        }
    }
}

impl From<UpperBound> for Option<Decimal> {
    fn from(value: UpperBound) -> Self {
        value.as_amount()
    }
}

/// A contiguous income band taxed at a single marginal rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    #[serde(
        default = "UpperBound::unbounded",
        skip_serializing_if = "UpperBound::is_unbounded"
    )]
    pub upper_bound: UpperBound,
    /// Marginal rate as a fraction (0.07 = 7%)
    pub rate: Decimal,
}

impl Bracket {
    pub fn bounded(upper_bound: Decimal, rate: Decimal) -> Self {
        Self {
            upper_bound: UpperBound::Bounded(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: UpperBound::Unbounded,
            rate,
        }
    }

    /// Line item label, e.g. "Tax @ 7%"
    pub fn label(&self) -> String {
        format!("{} {}%", BRACKET_LABEL_PREFIX, rate_as_percent(self.rate))
    }
}

/// Consolidated relief formula:
/// `max(flat_amount, percent_of_gross × gross) + additional_percent_of_gross × gross`,
/// clamped to `cap` when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefRule {
    pub flat_amount: Decimal,
    pub percent_of_gross: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_percent_of_gross: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<Decimal>,
}

impl ReliefRule {
    /// Relief due on `gross_annual`. Assumes the rule has been validated.
    pub fn amount(&self, gross_annual: Decimal) -> Result<Decimal> {
        let base = self
            .flat_amount
            .max(money_mul(self.percent_of_gross, gross_annual)?);
        let additional = money_mul(
            self.additional_percent_of_gross.unwrap_or(Decimal::ZERO),
            gross_annual,
        )?;
        let relief = money_add(base, additional)?;

        Ok(match self.cap {
            Some(cap) => relief.min(cap),
            None => relief,
        })
    }

    pub fn validate(&self) -> Result<()> {
        check_non_negative("consolidated relief flat amount", self.flat_amount)?;
        check_rate("consolidated relief percent of gross", self.percent_of_gross)?;
        if let Some(additional) = self.additional_percent_of_gross {
            check_rate("consolidated relief additional percent of gross", additional)?;
        }
        if let Some(cap) = self.cap {
            check_non_negative("consolidated relief cap", cap)?;
        }
        Ok(())
    }
}

/// Brackets and reliefs for one tax year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub year: i32,
    pub pension_rate: Decimal,
    pub housing_fund_rate: Decimal,
    /// Ceiling on caller-declared "other" reliefs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_relief_cap: Option<Decimal>,
    pub consolidated_relief: ReliefRule,
    pub brackets: Vec<Bracket>,
}

impl RuleSet {
    /// Built-in rule set substituted when the rule book has no entry for a year.
    ///
    /// Mirrors the Nigerian PAYE structure: consolidated relief of
    /// `max(200,000, 1% of gross) + 20% of gross`, 8% pension, 2.5% National
    /// Housing Fund, and six bands from 7% to 24%.
    pub fn default_for_year(year: i32) -> Self {
        Self {
            year,
            pension_rate: Decimal::new(8, 2),
            housing_fund_rate: Decimal::new(25, 3),
            additional_relief_cap: None,
            consolidated_relief: ReliefRule {
                flat_amount: Decimal::from(200_000),
                percent_of_gross: Decimal::new(1, 2),
                additional_percent_of_gross: Some(Decimal::new(20, 2)),
                cap: None,
            },
            brackets: vec![
                Bracket::bounded(Decimal::from(300_000), Decimal::new(7, 2)),
                Bracket::bounded(Decimal::from(600_000), Decimal::new(11, 2)),
                Bracket::bounded(Decimal::from(1_100_000), Decimal::new(15, 2)),
                Bracket::bounded(Decimal::from(1_600_000), Decimal::new(19, 2)),
                Bracket::bounded(Decimal::from(3_200_000), Decimal::new(21, 2)),
                Bracket::unbounded(Decimal::new(24, 2)),
            ],
        }
    }

    /// Full load-time check of the rule set
    pub fn validate(&self) -> Result<()> {
        if self.brackets.is_empty() {
            return Err(config_error(self.year, "at least one bracket is required"));
        }

        check_bracket_order(&self.brackets).map_err(|e| with_year(self.year, e))?;

        if !self.brackets.last().is_some_and(|b| b.upper_bound.is_unbounded()) {
            return Err(config_error(self.year, "the final bracket must be unbounded"));
        }

        for bracket in &self.brackets {
            check_rate("bracket rate", bracket.rate).map_err(|e| with_year(self.year, e))?;
        }

        if let Some((lower, higher)) = self
            .brackets
            .iter()
            .tuple_windows()
            .find(|(lower, higher)| higher.rate < lower.rate)
        {
            return Err(config_error(
                self.year,
                &format!(
                    "bracket rates must not decrease ({}% followed by {}%)",
                    rate_as_percent(lower.rate),
                    rate_as_percent(higher.rate)
                ),
            ));
        }

        self.validate_reliefs().map_err(|e| with_year(self.year, e))
    }

    /// Checks only the relief parameters; run by the relief calculator on every call
    pub fn validate_reliefs(&self) -> Result<()> {
        check_rate("pension rate", self.pension_rate)?;
        check_rate("housing fund rate", self.housing_fund_rate)?;
        if let Some(cap) = self.additional_relief_cap {
            check_non_negative("additional relief cap", cap)?;
        }
        self.consolidated_relief.validate()
    }
}

/// Non-final brackets must be bounded, positive, and strictly increasing.
///
/// A malformed final bracket is left to [`RuleSet::validate`]; the bracket
/// engine simply gives it zero width.
pub fn check_bracket_order(brackets: &[Bracket]) -> Result<()> {
    let Some((_, non_final)) = brackets.split_last() else {
        return Ok(());
    };

    let mut lower_bound = Decimal::ZERO;
    for (index, bracket) in non_final.iter().enumerate() {
        match bracket.upper_bound {
            UpperBound::Unbounded => {
                return Err(TaxError::ConfigError(format!(
                    "bracket {} is unbounded but is not the last bracket",
                    index + 1
                )));
            }
            UpperBound::Bounded(upper) if upper <= lower_bound => {
                return Err(TaxError::ConfigError(format!(
                    "bracket {} upper bound {} does not exceed the previous bound {}",
                    index + 1,
                    upper,
                    lower_bound
                )));
            }
            UpperBound::Bounded(upper) => lower_bound = upper,
        }
    }

    Ok(())
}

/// Render a fractional rate as a percent without trailing zeros (0.025 -> 2.5)
pub fn rate_as_percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

pub(crate) fn check_rate(name: &str, rate: Decimal) -> Result<()> {
    if rate < Decimal::ZERO {
        return Err(TaxError::ConfigError(format!("{} must not be negative", name)));
    }
    if rate > Decimal::ONE {
        return Err(TaxError::ConfigError(format!(
            "{} of {}% exceeds 100%",
            name,
            rate_as_percent(rate)
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(TaxError::ConfigError(format!("{} must not be negative", name)));
    }
    Ok(())
}

fn config_error(year: i32, message: &str) -> TaxError {
    TaxError::ConfigError(format!("rule set {}: {}", year, message))
}

fn with_year(year: i32, err: TaxError) -> TaxError {
    match err {
        TaxError::ConfigError(message) => config_error(year, &message),
        other => other,
    }
}
