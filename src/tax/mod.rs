// Tax module - PAYE computation pipeline (income -> reliefs -> brackets -> result)

pub mod brackets;
pub mod income;
pub mod relief;
pub mod result;
pub mod rules;

pub use brackets::{apply_brackets, BracketSummary};
pub use income::{normalize, parse_money, CalcInputs, Period};
pub use relief::{compute_reliefs, ReliefSummary};
pub use result::{assemble, CalcOutputs, LineItem};
pub use rules::{Bracket, ReliefRule, RuleSet, UpperBound};

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::Result;

/// Compute the PAYE estimate for `inputs` under `rules`.
///
/// Pure and deterministic: the same inputs and rule set always produce the
/// same output. Any error aborts the whole computation.
pub fn calculate(inputs: &CalcInputs, rules: &RuleSet) -> Result<CalcOutputs> {
    let gross_annual = normalize(inputs.gross_amount, inputs.period)?;
    debug!("Gross annual income for {}: {}", rules.year, gross_annual);

    let reliefs = compute_reliefs(gross_annual, inputs, rules)?;
    let taxable_income = (gross_annual - reliefs.total).max(Decimal::ZERO);
    debug!("Taxable income: {}", taxable_income);

    let brackets = apply_brackets(taxable_income, &rules.brackets)?;
    debug!("Annual tax: {}", brackets.total_tax);

    Ok(assemble(
        rules.year,
        gross_annual,
        reliefs,
        taxable_income,
        brackets,
        inputs.period,
    ))
}
