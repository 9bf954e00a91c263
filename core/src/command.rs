//! Command — the typed interface for every relpin operation.
//!
//! Each variant corresponds to exactly one operation in `Sys::execute()`.
//! The serde `tag = "command"` attribute produces internally-tagged JSON,
//! which doubles as the machine-readable form of an invocation:
//!
//! ```json
//! {"command": "apply", "silent": true}
//! {"command": "status", "format": "json"}
//! ```

use serde::{Deserialize, Serialize};

/// A typed relpin command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    /// Converge the policy namespace toward the desired values now.
    #[serde(rename = "apply")]
    Apply {
        #[serde(default)]
        silent: bool,
    },

    /// Run the drift check; arms a deferred apply when drift is found.
    #[serde(rename = "check")]
    Check {
        #[serde(default)]
        silent: bool,
    },

    /// First-install path: apply immediately, then register the recurring
    /// drift-check triggers (startup + weekly).
    #[serde(rename = "bootstrap")]
    Bootstrap {
        #[serde(default)]
        silent: bool,
    },

    /// Show stored vs. desired values and the stamp age. Read-only.
    #[serde(rename = "status")]
    Status {
        /// Output format: "json" for JSON, omit for a table.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },

    /// Show usage help.
    #[serde(rename = "help")]
    Help {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },
}

impl Command {
    /// Whether this command mutates system state and therefore requires an
    /// elevated process.
    pub fn requires_elevation(&self) -> bool {
        matches!(
            self,
            Command::Apply { .. } | Command::Check { .. } | Command::Bootstrap { .. }
        )
    }

    /// Whether diagnostic narration is suppressed. Suppression changes
    /// nothing but verbosity.
    pub fn is_silent(&self) -> bool {
        match self {
            Command::Apply { silent } | Command::Check { silent } | Command::Bootstrap { silent } => {
                *silent
            }
            Command::Status { .. } | Command::Help { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_scope() {
        assert!(Command::Apply { silent: false }.requires_elevation());
        assert!(Command::Check { silent: true }.requires_elevation());
        assert!(Command::Bootstrap { silent: false }.requires_elevation());
        assert!(!Command::Status { format: None }.requires_elevation());
        assert!(!Command::Help { topic: None }.requires_elevation());
    }

    #[test]
    fn silent_flag_carries() {
        assert!(Command::Apply { silent: true }.is_silent());
        assert!(!Command::Apply { silent: false }.is_silent());
        assert!(!Command::Status { format: None }.is_silent());
    }

    #[test]
    fn wire_format_round_trip() {
        let cmd = Command::Check { silent: true };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"check\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn silent_defaults_to_false_on_the_wire() {
        let cmd: Command = serde_json::from_str("{\"command\":\"apply\"}").unwrap();
        assert_eq!(cmd, Command::Apply { silent: false });
    }
}
