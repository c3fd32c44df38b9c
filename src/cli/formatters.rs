//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of tax calculation from presentation.

use colored::Colorize;
use itertools::Itertools;
use paye::tax::rules::rate_as_percent;
use paye::tax::{CalcOutputs, RuleSet};
use paye::utils::{format_amount, format_currency, format_currency_aligned, format_rate};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

/// Format a calculation result for JSON output (decimals as strings)
pub fn format_calculation_json(outputs: &CalcOutputs) -> String {
    serde_json::to_string_pretty(outputs)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format a calculation result as a breakdown table plus summary
pub fn format_calculation_table(outputs: &CalcOutputs) -> String {
    let mut output = format!(
        "\n{} PAYE estimate for {}\n\n",
        "🧾".cyan().bold(),
        outputs.year
    );

    #[derive(Tabled)]
    struct BreakdownRow {
        #[tabled(rename = "Item")]
        label: String,
        #[tabled(rename = "Amount")]
        amount: String,
    }

    let rows: Vec<BreakdownRow> = outputs
        .line_items
        .iter()
        .map(|item| {
            let amount = if item.is_deduction {
                format!("-{}", format_currency(item.amount)).yellow().to_string()
            } else {
                format_currency(item.amount)
            };
            BreakdownRow {
                label: item.label.clone(),
                amount,
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    // Right-align the two tax figures against each other
    let width = [outputs.annual_tax, outputs.monthly_tax]
        .iter()
        .map(|amount| format_currency(*amount).chars().count())
        .max()
        .unwrap_or(0);

    output.push_str(&format!("\n\n{} Summary", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Annual Tax:".bold(),
        format_currency_aligned(outputs.annual_tax, width).red()
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Monthly Tax:".bold(),
        format_currency_aligned(outputs.monthly_tax, width).red()
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Effective Rate:".bold(),
        format_rate(outputs.effective_rate)
    ));
    output.push_str(&format!("\n\n{}\n", outputs.assumptions_note.bright_black()));

    output
}

/// Format a rule set for JSON output
pub fn format_rules_json(rules: &RuleSet) -> String {
    serde_json::to_string_pretty(rules)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format a rule set as a bracket table followed by relief parameters
pub fn format_rules_table(rules: &RuleSet, source: &str) -> String {
    let mut output = format!(
        "\n{} PAYE rule set {} ({})\n\n",
        "📐".cyan().bold(),
        rules.year,
        source
    );

    #[derive(Tabled)]
    struct BracketRow {
        #[tabled(rename = "Band")]
        band: String,
        #[tabled(rename = "From (₦)")]
        from: String,
        #[tabled(rename = "Up To (₦)")]
        upper: String,
        #[tabled(rename = "Width (₦)")]
        width: String,
        #[tabled(rename = "Rate")]
        rate: String,
    }

    let mut lower = Decimal::ZERO;
    let rows: Vec<BracketRow> = rules
        .brackets
        .iter()
        .enumerate()
        .map(|(i, bracket)| {
            let row = match bracket.upper_bound.as_amount() {
                Some(upper) => BracketRow {
                    band: (i + 1).to_string(),
                    from: format_amount(lower),
                    upper: format_amount(upper),
                    width: format_amount(upper - lower),
                    rate: format!("{}%", rate_as_percent(bracket.rate)),
                },
                None => BracketRow {
                    band: (i + 1).to_string(),
                    from: format_amount(lower),
                    upper: "no limit".to_string(),
                    width: "remainder".to_string(),
                    rate: format!("{}%", rate_as_percent(bracket.rate)),
                },
            };
            if let Some(upper) = bracket.upper_bound.as_amount() {
                lower = upper;
            }
            row
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    let relief = &rules.consolidated_relief;
    output.push_str(&format!("\n\n{} Reliefs", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<28} {}% of gross",
        "Pension:".bold(),
        rate_as_percent(rules.pension_rate)
    ));
    output.push_str(&format!(
        "\n{:<28} {}% of gross",
        "National Housing Fund:".bold(),
        rate_as_percent(rules.housing_fund_rate)
    ));

    let mut consolidated = format!(
        "max({}, {}% of gross)",
        format_currency(relief.flat_amount),
        rate_as_percent(relief.percent_of_gross)
    );
    if let Some(additional) = relief.additional_percent_of_gross {
        consolidated.push_str(&format!(" + {}% of gross", rate_as_percent(additional)));
    }
    if let Some(cap) = relief.cap {
        consolidated.push_str(&format!(", capped at {}", format_currency(cap)));
    }
    output.push_str(&format!(
        "\n{:<28} {}",
        "Consolidated Relief:".bold(),
        consolidated
    ));

    if let Some(cap) = rules.additional_relief_cap {
        output.push_str(&format!(
            "\n{:<28} {}",
            "Other Reliefs Cap:".bold(),
            format_currency(cap)
        ));
    }
    output.push('\n');

    output
}

/// Rule-book validation summary for `rules check`
pub fn format_rule_book_check(path: &str, years: &[i32], json_output: bool) -> String {
    if json_output {
        #[derive(Serialize)]
        struct JsonCheck<'a> {
            path: &'a str,
            valid: bool,
            years: &'a [i32],
        }
        return serde_json::to_string_pretty(&JsonCheck {
            path,
            valid: true,
            years,
        })
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e));
    }

    if years.is_empty() {
        return format!(
            "{} {} is valid but defines no rule sets\n",
            "ℹ".blue().bold(),
            path
        );
    }

    format!(
        "{} {} is valid: {} rule set(s) for {}\n",
        "✓".green().bold(),
        path,
        years.len(),
        years.iter().join(", ")
    )
}
