//! Income inputs and annualisation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TaxError};

/// Period the entered gross amount covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Monthly,
    Annual,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Monthly => "monthly",
            Period::Annual => "annual",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Period::Monthly),
            "annual" | "annually" | "yearly" | "year" | "a" | "y" => Ok(Period::Annual),
            other => Err(TaxError::ValidationError(format!(
                "unknown period '{}' (expected monthly or annual)",
                other
            ))),
        }
    }
}

/// Caller-supplied inputs for one computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcInputs {
    pub gross_amount: Decimal,
    pub period: Period,
    /// Actual annual pension contribution; defaults to the rule set's rate
    #[serde(default)]
    pub pension_contribution: Option<Decimal>,
    /// Actual annual housing fund contribution; defaults to the rule set's rate
    #[serde(default)]
    pub housing_fund_contribution: Option<Decimal>,
    #[serde(default)]
    pub other_reliefs: Option<Decimal>,
}

impl CalcInputs {
    pub fn new(gross_amount: Decimal, period: Period) -> Self {
        Self {
            gross_amount,
            period,
            pension_contribution: None,
            housing_fund_contribution: None,
            other_reliefs: None,
        }
    }

    pub fn with_pension(mut self, amount: Decimal) -> Self {
        self.pension_contribution = Some(amount);
        self
    }

    pub fn with_housing_fund(mut self, amount: Decimal) -> Self {
        self.housing_fund_contribution = Some(amount);
        self
    }

    pub fn with_other_reliefs(mut self, amount: Decimal) -> Self {
        self.other_reliefs = Some(amount);
        self
    }

    /// Reject negative amounts before anything is computed
    pub fn validate(&self) -> Result<()> {
        check_amount("gross amount", self.gross_amount)?;
        let optional = [
            ("pension contribution", self.pension_contribution),
            ("housing fund contribution", self.housing_fund_contribution),
            ("other reliefs", self.other_reliefs),
        ];
        for (name, amount) in optional {
            if let Some(amount) = amount {
                check_amount(name, amount)?;
            }
        }
        Ok(())
    }
}

/// Convert a period-scoped amount to annual gross income
pub fn normalize(amount: Decimal, period: Period) -> Result<Decimal> {
    check_amount("gross amount", amount)?;
    Ok(match period {
        Period::Annual => amount,
        Period::Monthly => money_mul(amount, Decimal::from(12))?,
    })
}

/// `a × b`, or a validation error when the product leaves `Decimal`'s range
pub(crate) fn money_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(amount_too_large)
}

/// `a + b`, or a validation error when the sum leaves `Decimal`'s range
pub(crate) fn money_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(amount_too_large)
}

fn amount_too_large() -> TaxError {
    TaxError::ValidationError("amount too large".to_string())
}

/// Parse a user-entered money amount such as `250,000` or `1_200_000.50`
pub fn parse_money(text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_'))
        .collect();

    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| TaxError::ValidationError(format!("'{}' is not a valid amount", text)))?;

    check_amount("amount", amount)?;
    Ok(amount)
}

fn check_amount(name: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(TaxError::ValidationError(format!(
            "{} must not be negative (got {})",
            name, amount
        )));
    }
    Ok(())
}
