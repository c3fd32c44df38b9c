//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency, decimal and rate values throughout the application.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "₦" prefix (Nigerian Naira)
    Naira,
    /// No currency symbol (for table cells, calculations display)
    None,
}

/// Core formatting function with full control over output.
///
/// Rounds half-up to 2 decimal places and uses `,` as the thousands
/// separator and `.` as the decimal separator.
///
/// # Examples
/// ```
/// use paye::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::Naira),
///     "₦1,234.56"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 15, CurrencySymbol::None),
///     "       1,234.00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    // Add thousands separators (,) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Naira => "₦",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{}.{}", sign, prefix, with_separators, decimal_part);

    // Apply width padding (right-align); the symbol is multi-byte so count chars
    if width > 0 && result.chars().count() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

// ============ Convenience functions ============

/// Format as Naira with symbol: "₦1,234.56"
///
/// # Examples
/// ```
/// use paye::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "₦1,234.56");
/// assert_eq!(format_currency(dec!(-500)), "-₦500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::Naira)
}

/// Format as Naira, right-aligned to specified width.
pub fn format_currency_aligned(value: Decimal, width: usize) -> String {
    format_currency_with_width(value, width, CurrencySymbol::Naira)
}

/// Format number only (no symbol): "1,234.56"
pub fn format_amount(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::None)
}

/// Format a fractional rate as a percentage with 2 decimals: 0.114567 -> "11.46%"
///
/// # Examples
/// ```
/// use paye::utils::format_rate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_rate(dec!(0.1145666)), "11.46%");
/// ```
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", percent)
}
