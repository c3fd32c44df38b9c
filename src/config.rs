//! Rule book loading
//!
//! The rule book is a TOML file holding one `[[rule_sets]]` table per tax
//! year. Every rule set is validated once here, so the engine can trust what
//! it is given.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, TaxError};
use crate::tax::RuleSet;

/// Environment variable overriding the rule book location
pub const RULES_ENV_VAR: &str = "PAYE_RULES";

const RULES_FILENAME: &str = "rules.toml";

/// Collection of per-year rule sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    #[serde(default)]
    pub rule_sets: Vec<RuleSet>,
}

impl RuleBook {
    /// Read, parse and validate a rule book file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let book = Self::from_toml_str(&content)?;
        info!(
            "Loaded {} rule set(s) from {}",
            book.rule_sets.len(),
            path.display()
        );
        Ok(book)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let book: RuleBook =
            toml::from_str(content).map_err(|e| TaxError::ParseError(e.to_string()))?;
        book.validate()?;
        Ok(book)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for rules in &self.rule_sets {
            if !seen.insert(rules.year) {
                return Err(TaxError::ConfigError(format!(
                    "duplicate rule set for year {}",
                    rules.year
                )));
            }
            rules.validate()?;
        }
        Ok(())
    }

    /// Rule book containing only the built-in default for `year`
    pub fn with_default(year: i32) -> Self {
        Self {
            rule_sets: vec![RuleSet::default_for_year(year)],
        }
    }

    pub fn for_year(&self, year: i32) -> Option<&RuleSet> {
        self.rule_sets.iter().find(|rules| rules.year == year)
    }

    /// Rule set for `year`, falling back to the built-in default
    pub fn resolve(&self, year: i32) -> RuleSet {
        match self.for_year(year) {
            Some(rules) => rules.clone(),
            None => {
                warn!(
                    "No rule set configured for {}; using the built-in default",
                    year
                );
                RuleSet::default_for_year(year)
            }
        }
    }

    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rule_sets.iter().map(|rules| rules.year).collect();
        years.sort_unstable();
        years
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TaxError::ParseError(e.to_string()))
    }
}

/// Where the rule book was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    /// Named with `--rules` or `PAYE_RULES`; must exist
    Explicit(PathBuf),
    /// Per-user config location; may be absent
    UserConfig(PathBuf),
}

impl RulesSource {
    pub fn path(&self) -> &Path {
        match self {
            RulesSource::Explicit(path) | RulesSource::UserConfig(path) => path,
        }
    }
}

/// Resolve the rule book path: flag, then environment, then user config dir
pub fn rules_source(flag: Option<&Path>) -> Option<RulesSource> {
    if let Some(path) = flag {
        return Some(RulesSource::Explicit(path.to_path_buf()));
    }
    if let Some(path) = std::env::var_os(RULES_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(RulesSource::Explicit(PathBuf::from(path)));
    }
    default_rules_path().map(RulesSource::UserConfig)
}

pub fn default_rules_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("paye").join(RULES_FILENAME))
}

/// Load the rule book from `source`. A missing user-config file yields an
/// empty book; a missing explicit file is an error.
pub fn load_rule_book(source: Option<&RulesSource>) -> Result<RuleBook> {
    match source {
        Some(RulesSource::Explicit(path)) => RuleBook::load(path),
        Some(RulesSource::UserConfig(path)) if path.exists() => RuleBook::load(path),
        _ => Ok(RuleBook::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[[rule_sets]]
year = 2023
pension_rate = "0.08"
housing_fund_rate = "0.025"

[rule_sets.consolidated_relief]
flat_amount = "200000"
percent_of_gross = "0.01"
additional_percent_of_gross = "0.20"

[[rule_sets.brackets]]
upper_bound = "300000"
rate = "0.07"

[[rule_sets.brackets]]
upper_bound = "600000"
rate = "0.11"

[[rule_sets.brackets]]
rate = "0.24"
"#;

    #[test]
    fn test_parse_rule_book() {
        let book = RuleBook::from_toml_str(SAMPLE).unwrap();
        let rules = book.for_year(2023).unwrap();

        assert_eq!(rules.brackets.len(), 3);
        assert!(rules.brackets[2].upper_bound.is_unbounded());
        assert_eq!(rules.brackets[0].upper_bound.as_amount(), Some(dec!(300000)));
        assert_eq!(rules.consolidated_relief.cap, None);
        assert_eq!(rules.additional_relief_cap, None);
        assert!(book.for_year(2024).is_none());
    }

    #[test]
    fn test_numeric_values_accepted() {
        let content = SAMPLE.replace("rate = \"0.07\"", "rate = 0.07");
        let book = RuleBook::from_toml_str(&content).unwrap();
        assert_eq!(book.rule_sets[0].brackets[0].rate, dec!(0.07));
    }

    #[test]
    fn test_invalid_rule_set_rejected_at_load() {
        let content = SAMPLE.replace("upper_bound = \"600000\"", "upper_bound = \"100000\"");
        let err = RuleBook::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, TaxError::ConfigError(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = RuleBook::from_toml_str("[[rule_sets]\nyear = ").unwrap_err();
        assert!(matches!(err, TaxError::ParseError(_)));
        assert!(err.is_config());
    }

    #[test]
    fn test_duplicate_years_rejected() {
        let mut book = RuleBook::with_default(2024);
        book.rule_sets.push(RuleSet::default_for_year(2024));
        let err = book.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let book = RuleBook::from_toml_str(SAMPLE).unwrap();
        assert_eq!(book.resolve(2023).brackets.len(), 3);
        assert_eq!(book.resolve(2030), RuleSet::default_for_year(2030));
    }

    #[test]
    fn test_toml_round_trip_of_default_book() {
        let book = RuleBook::with_default(2024);
        let text = book.to_toml_string().unwrap();
        assert!(text.contains("[[rule_sets]]"));
        assert_eq!(RuleBook::from_toml_str(&text).unwrap(), book);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let source = RulesSource::Explicit(path.clone());
        let book = load_rule_book(Some(&source)).unwrap();
        assert_eq!(book.years(), vec![2023]);
    }

    #[test]
    fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let user = RulesSource::UserConfig(path.clone());
        assert_eq!(load_rule_book(Some(&user)).unwrap(), RuleBook::default());

        let explicit = RulesSource::Explicit(path);
        let err = load_rule_book(Some(&explicit)).unwrap_err();
        assert!(matches!(err, TaxError::Io(_)));
    }

    #[test]
    fn test_flag_takes_precedence() {
        let source = rules_source(Some(Path::new("/tmp/custom.toml"))).unwrap();
        assert_eq!(source, RulesSource::Explicit(PathBuf::from("/tmp/custom.toml")));
        assert_eq!(source.path(), Path::new("/tmp/custom.toml"));
    }
}
