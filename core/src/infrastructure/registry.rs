//! Registry command builder, output parser, and the production policy store.
//!
//! `RegCommandBuilder` builds `reg.exe` command strings without executing
//! them; `RegistryStore` implements `PolicyStore` by running those commands
//! through a `CommandRunner` and parsing the query output.

use super::runner::CommandRunner;
use super::PolicyStore;
use crate::types::policy::PolicyValue;

/// The managed policy namespace.
pub const POLICY_ROOT: &str = r"HKLM\SOFTWARE\Policies\Microsoft\Windows\WindowsUpdate";

// ---------------------------------------------------------------------------
// Command builder
// ---------------------------------------------------------------------------

/// Builds `reg.exe` command strings for one registry key path.
pub struct RegCommandBuilder {
    root: String,
}

impl RegCommandBuilder {
    pub fn new(root: &str) -> Self {
        RegCommandBuilder { root: root.to_string() }
    }

    /// `reg add "<root>" /v <name> /t <type> /d "<data>" /f`
    pub fn add(&self, name: &str, value: &PolicyValue) -> String {
        format!(
            "reg add \"{}\" /v {} /t {} /d \"{}\" /f",
            self.root,
            name,
            value.type_name(),
            value.render()
        )
    }

    /// `reg query "<root>" /v <name>`
    pub fn query(&self, name: &str) -> String {
        format!("reg query \"{}\" /v {}", self.root, name)
    }
}

// ---------------------------------------------------------------------------
// Output parser
// ---------------------------------------------------------------------------

/// Parse the output of `reg query ... /v <name>` into a typed value.
///
/// Expected data line: `    <name>    REG_SZ|REG_DWORD    <data>`. DWORD data
/// is rendered by reg.exe as hex (`0x1`).
pub fn parse_reg_value(output: &str, name: &str) -> Option<PolicyValue> {
    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (first, kind) = match (parts.next(), parts.next()) {
            (Some(f), Some(k)) => (f, k),
            _ => continue,
        };
        if !first.eq_ignore_ascii_case(name) {
            continue;
        }
        let data = parts.collect::<Vec<_>>().join(" ");
        return match kind {
            "REG_SZ" | "REG_EXPAND_SZ" => {
                if data.is_empty() {
                    None
                } else {
                    Some(PolicyValue::Text(data))
                }
            }
            "REG_DWORD" => parse_dword(&data).map(PolicyValue::Number),
            _ => None,
        };
    }
    None
}

fn parse_dword(data: &str) -> Option<u32> {
    let d = data.trim();
    if let Some(hex) = d.strip_prefix("0x").or_else(|| d.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        d.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// RegistryStore (PolicyStore implementation)
// ---------------------------------------------------------------------------

/// Production policy store over `reg.exe` and `gpupdate.exe`.
pub struct RegistryStore {
    builder: RegCommandBuilder,
    runner: Box<dyn CommandRunner>,
}

impl RegistryStore {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self::with_root(POLICY_ROOT, runner)
    }

    pub fn with_root(root: &str, runner: Box<dyn CommandRunner>) -> Self {
        RegistryStore {
            builder: RegCommandBuilder::new(root),
            runner,
        }
    }
}

impl PolicyStore for RegistryStore {
    fn read_value(&self, key: &str) -> Option<PolicyValue> {
        // reg.exe reports a missing value as a command failure; both map to
        // "absent" here.
        self.runner
            .run(&self.builder.query(key))
            .ok()
            .and_then(|out| parse_reg_value(&out, key))
    }

    fn write_value(&mut self, key: &str, value: &PolicyValue) -> Result<(), String> {
        self.runner.run(&self.builder.add(key, value)).map(|_| ())
    }

    fn refresh(&mut self) -> Result<(), String> {
        self.runner.run("gpupdate /target:computer /force").map(|_| ())
    }
}
