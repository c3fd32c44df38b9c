//! Statutory reliefs deducted from gross income before bracket taxation

use rust_decimal::Decimal;
use tracing::debug;

use super::income::{money_add, money_mul, CalcInputs};
use super::result::LineItem;
use super::rules::RuleSet;
use crate::error::{Result, TaxError};

pub const PENSION_LABEL: &str = "Pension Contribution";
pub const HOUSING_FUND_LABEL: &str = "National Housing Fund";
pub const CONSOLIDATED_RELIEF_LABEL: &str = "Consolidated Relief Allowance";
pub const OTHER_RELIEFS_LABEL: &str = "Other Reliefs";

/// Relief line items plus their total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliefSummary {
    pub items: Vec<LineItem>,
    pub total: Decimal,
}

/// Derive reliefs in the fixed order: pension, housing fund, consolidated
/// relief, other. Zero-valued reliefs produce no line item.
pub fn compute_reliefs(
    gross_annual: Decimal,
    inputs: &CalcInputs,
    rules: &RuleSet,
) -> Result<ReliefSummary> {
    if gross_annual < Decimal::ZERO {
        return Err(TaxError::ValidationError(format!(
            "gross annual income must not be negative (got {})",
            gross_annual
        )));
    }
    inputs.validate()?;
    rules.validate_reliefs()?;

    let pension = match inputs.pension_contribution {
        Some(declared) => declared,
        None => money_mul(gross_annual, rules.pension_rate)?,
    }
    .min(gross_annual);

    let housing_fund = match inputs.housing_fund_contribution {
        Some(declared) => declared,
        None => money_mul(gross_annual, rules.housing_fund_rate)?,
    }
    .min(gross_annual);

    let consolidated = rules.consolidated_relief.amount(gross_annual)?;

    let applied = money_add(money_add(pension, housing_fund)?, consolidated)?;
    let headroom = (gross_annual - applied).max(Decimal::ZERO);

    let mut other = inputs.other_reliefs.unwrap_or(Decimal::ZERO);
    if let Some(cap) = rules.additional_relief_cap {
        other = other.min(cap);
    }
    let other = other.max(Decimal::ZERO).min(headroom);

    let items: Vec<LineItem> = [
        (PENSION_LABEL, pension),
        (HOUSING_FUND_LABEL, housing_fund),
        (CONSOLIDATED_RELIEF_LABEL, consolidated),
        (OTHER_RELIEFS_LABEL, other),
    ]
    .into_iter()
    .filter(|(_, amount)| !amount.is_zero())
    .map(|(label, amount)| LineItem::deduction(label, amount))
    .collect();

    let total = money_add(applied, other)?;
    debug!(
        "Reliefs for gross {}: pension {}, housing {}, consolidated {}, other {} (total {})",
        gross_annual, pension, housing_fund, consolidated, other, total
    );

    Ok(ReliefSummary { items, total })
}
