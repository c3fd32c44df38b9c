#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Rule book with the reference bands and no pension/NHF defaults
pub const REFERENCE_RULES: &str = r#"
[[rule_sets]]
year = 2024
pension_rate = "0"
housing_fund_rate = "0"

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
upper_bound = "1100000"
rate = "0.15"

[[rule_sets.brackets]]
upper_bound = "1600000"
rate = "0.19"

[[rule_sets.brackets]]
upper_bound = "3200000"
rate = "0.21"

[[rule_sets.brackets]]
rate = "0.24"
"#;

pub fn config_home(home: &TempDir) -> PathBuf {
    home.path().join(".config")
}

/// Command isolated from the user's real config and rules
pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("paye"));
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", config_home(home));
    cmd.env_remove("PAYE_RULES");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn write_rules(home: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = home.path().join(name);
    std::fs::write(&path, content).expect("failed to write rule book");
    path
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let output = run_cmd(home, args)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

pub fn calculate_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let mut full = vec!["--json", "calculate"];
    full.extend_from_slice(args);
    run_cmd_json(home, &full)
}
