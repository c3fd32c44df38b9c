//! Internal command representation
//!
//! Commands carry already-parsed, typed values so the dispatcher never deals
//! with raw user strings.

use paye::tax::CalcInputs;
use std::path::PathBuf;

/// Parsed command ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `calculate <amount> [--period P] [--year Y] [--pension X] [--housing X] [--other X]`
    Calculate { inputs: CalcInputs, year: i32 },
    /// `rules show [--year Y]`
    RulesShow { year: i32 },
    /// `rules check <path>`
    RulesCheck { path: PathBuf },
    /// `rules init [--force]`; seeds the book with the default rule set for `year`
    RulesInit { year: i32, force: bool },
}
