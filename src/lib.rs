//! PAYE - personal income tax estimator
//!
//! This library computes progressive-bracket income tax from gross income and
//! a versioned, externally configurable rule set, producing taxable income,
//! annual and monthly tax, the effective rate, and an auditable breakdown.

pub mod config;
pub mod error;
pub mod tax;
pub mod utils;
