//! Graduated marginal-rate taxation

use rust_decimal::Decimal;
use tracing::debug;

use super::income::{money_add, money_mul};
use super::result::LineItem;
use super::rules::{check_bracket_order, Bracket, UpperBound};
use crate::error::Result;

/// Per-bracket tax line items plus total tax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSummary {
    pub items: Vec<LineItem>,
    pub total_tax: Decimal,
}

/// Apply `brackets` to `taxable_income` in a single ascending pass.
///
/// Each bracket taxes the slice of income between the previous upper bound
/// and its own. Brackets that receive no income emit no line item.
pub fn apply_brackets(taxable_income: Decimal, brackets: &[Bracket]) -> Result<BracketSummary> {
    check_bracket_order(brackets)?;

    let mut items = Vec::new();
    let mut total_tax = Decimal::ZERO;

    if taxable_income <= Decimal::ZERO {
        return Ok(BracketSummary { items, total_tax });
    }

    let mut remaining = taxable_income;
    let mut lower_bound = Decimal::ZERO;

    for bracket in brackets {
        let width = match bracket.upper_bound {
            UpperBound::Unbounded => remaining,
            UpperBound::Bounded(upper) => (upper - lower_bound).max(Decimal::ZERO),
        };
        let taxed_amount = remaining.min(width);

        if taxed_amount > Decimal::ZERO {
            let tax = money_mul(taxed_amount, bracket.rate)?;
            debug!("{} on {} = {}", bracket.label(), taxed_amount, tax);
            items.push(LineItem::entry(bracket.label(), tax));
            total_tax = money_add(total_tax, tax)?;
        }

        remaining -= taxed_amount;
        if let UpperBound::Bounded(upper) = bracket.upper_bound {
            lower_bound = upper;
        }

        if remaining.is_zero() {
            break;
        }
    }

    Ok(BracketSummary { items, total_tax })
}
