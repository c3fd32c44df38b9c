//! Final result assembly
//!
//! Combines the relief and bracket stages into the ordered breakdown shown to
//! the user. No arithmetic beyond the monthly split and effective rate.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::brackets::BracketSummary;
use super::income::Period;
use super::relief::ReliefSummary;
use super::rules::BRACKET_LABEL_PREFIX;

pub const GROSS_INCOME_LABEL: &str = "Gross Income";
pub const TAXABLE_INCOME_LABEL: &str = "Taxable Income";

/// One row of the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: Decimal,
    pub is_deduction: bool,
}

impl LineItem {
    pub fn entry(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
            is_deduction: false,
        }
    }

    pub fn deduction(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
            is_deduction: true,
        }
    }
}

/// Output of one engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcOutputs {
    pub year: i32,
    pub gross_annual: Decimal,
    pub total_reliefs: Decimal,
    pub taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub monthly_tax: Decimal,
    /// Fraction of gross income paid as tax (0.1146 = 11.46%)
    pub effective_rate: Decimal,
    pub line_items: Vec<LineItem>,
    pub assumptions_note: String,
}

impl CalcOutputs {
    /// Line items produced by the bracket engine, in bracket order
    pub fn bracket_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items
            .iter()
            .filter(|item| !item.is_deduction && item.label.starts_with(BRACKET_LABEL_PREFIX))
    }

    pub fn relief_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| item.is_deduction)
    }
}

/// Assemble the final output from the stage results
pub fn assemble(
    year: i32,
    gross_annual: Decimal,
    reliefs: ReliefSummary,
    taxable_income: Decimal,
    brackets: BracketSummary,
    period: Period,
) -> CalcOutputs {
    let annual_tax = brackets.total_tax;
    let monthly_tax = round_to_kobo(annual_tax / Decimal::from(12));
    let effective_rate = if gross_annual.is_zero() {
        Decimal::ZERO
    } else {
        annual_tax / gross_annual
    };

    let mut line_items = Vec::with_capacity(reliefs.items.len() + brackets.items.len() + 2);
    line_items.push(LineItem::entry(GROSS_INCOME_LABEL, gross_annual));
    line_items.extend(reliefs.items);
    line_items.push(LineItem::entry(TAXABLE_INCOME_LABEL, taxable_income));
    line_items.extend(brackets.items);

    CalcOutputs {
        year,
        gross_annual,
        total_reliefs: reliefs.total,
        taxable_income,
        annual_tax,
        monthly_tax,
        effective_rate,
        line_items,
        assumptions_note: assumptions_note(year, period),
    }
}

/// Half-up rounding to the smallest currency unit
pub fn round_to_kobo(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn assumptions_note(year: i32, period: Period) -> String {
    let mut note = format!(
        "Estimate based on the {} PAYE rule set. Figures are an estimate for guidance only and are not tax advice.",
        year
    );
    if period == Period::Monthly {
        note.push_str(" Monthly income was annualised by multiplying by 12.");
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reliefs(total: Decimal) -> ReliefSummary {
        ReliefSummary {
            items: vec![LineItem::deduction("Consolidated Relief Allowance", total)],
            total,
        }
    }

    fn brackets(amounts: &[Decimal]) -> BracketSummary {
        BracketSummary {
            items: amounts
                .iter()
                .map(|a| LineItem::entry("Tax @ 7%", *a))
                .collect(),
            total_tax: amounts.iter().copied().sum(),
        }
    }

    #[test]
    fn test_line_item_order() {
        let out = assemble(
            2024,
            dec!(1000000),
            reliefs(dec!(400000)),
            dec!(600000),
            brackets(&[dec!(21000), dec!(33000)]),
            Period::Annual,
        );

        let labels: Vec<&str> = out.line_items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Gross Income",
                "Consolidated Relief Allowance",
                "Taxable Income",
                "Tax @ 7%",
                "Tax @ 7%"
            ]
        );
        assert!(!out.line_items[0].is_deduction);
        assert!(out.line_items[1].is_deduction);
        assert_eq!(out.bracket_items().count(), 2);
        assert_eq!(out.relief_items().count(), 1);
        assert_eq!(out.annual_tax, dec!(54000));
        assert_eq!(out.monthly_tax, dec!(4500));
        assert_eq!(out.effective_rate, dec!(0.054));
    }

    #[test]
    fn test_bracket_items_ignore_relief_labels() {
        let reliefs = ReliefSummary {
            items: vec![
                LineItem::deduction(TAXABLE_INCOME_LABEL, dec!(100000)),
                LineItem::deduction("Tax @ 0% relief", dec!(50000)),
            ],
            total: dec!(150000),
        };
        let out = assemble(
            2024,
            dec!(1000000),
            reliefs,
            dec!(850000),
            brackets(&[dec!(21000), dec!(33000), dec!(37500)]),
            Period::Annual,
        );

        let bracket_amounts: Vec<Decimal> = out.bracket_items().map(|i| i.amount).collect();
        assert_eq!(bracket_amounts, vec![dec!(21000), dec!(33000), dec!(37500)]);
        assert_eq!(out.relief_items().count(), 2);
    }

    #[test]
    fn test_monthly_tax_rounds_half_up() {
        assert_eq!(round_to_kobo(dec!(28641.666666)), dec!(28641.67));
        assert_eq!(round_to_kobo(dec!(10.005)), dec!(10.01));
        assert_eq!(round_to_kobo(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn test_zero_gross_has_zero_effective_rate() {
        let out = assemble(
            2024,
            Decimal::ZERO,
            ReliefSummary {
                items: vec![],
                total: Decimal::ZERO,
            },
            Decimal::ZERO,
            brackets(&[]),
            Period::Annual,
        );
        assert_eq!(out.effective_rate, Decimal::ZERO);
        assert_eq!(out.monthly_tax, Decimal::ZERO);
        assert_eq!(out.line_items.len(), 2);
    }

    #[test]
    fn test_assumptions_note() {
        let annual = assumptions_note(2023, Period::Annual);
        assert!(annual.contains("2023"));
        assert!(annual.contains("estimate"));
        assert!(!annual.contains("annualised"));

        let monthly = assumptions_note(2023, Period::Monthly);
        assert!(monthly.contains("annualised"));
    }
}
