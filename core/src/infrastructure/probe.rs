//! Production release sources — registry and OS-info queries through a
//! `CommandRunner`.

use super::registry::{parse_reg_value, RegCommandBuilder};
use super::runner::CommandRunner;
use crate::resolver::sources::ReleaseSources;
use crate::types::policy::PolicyValue;
use crate::types::release::OsVersion;

/// The OS version registry key the detection sources read from.
pub const VERSION_ROOT: &str = r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion";

const OS_INFO_COMMAND: &str =
    "powershell -NoProfile -Command \"(Get-ComputerInfo -Property OsDisplayVersion).OsDisplayVersion\"";

/// Live `ReleaseSources` over the version registry key and a broader OS-info
/// query. Every accessor degrades to absent on failure.
pub struct SystemProbe {
    version_reg: RegCommandBuilder,
    runner: Box<dyn CommandRunner>,
}

impl SystemProbe {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        SystemProbe {
            version_reg: RegCommandBuilder::new(VERSION_ROOT),
            runner,
        }
    }

    fn reg_value(&self, name: &str) -> Option<PolicyValue> {
        self.runner
            .run(&self.version_reg.query(name))
            .ok()
            .and_then(|out| parse_reg_value(&out, name))
    }

    fn reg_text(&self, name: &str) -> Option<String> {
        match self.reg_value(name) {
            Some(PolicyValue::Text(s)) => Some(s),
            Some(PolicyValue::Number(n)) => Some(n.to_string()),
            None => None,
        }
    }
}

impl ReleaseSources for SystemProbe {
    fn os_version(&self) -> OsVersion {
        let major = match self.reg_value("CurrentMajorVersionNumber") {
            Some(PolicyValue::Number(n)) => n,
            _ => 0,
        };
        // CurrentBuildNumber is stored as text.
        let build = self
            .reg_text("CurrentBuildNumber")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0);
        OsVersion { major, build }
    }

    fn display_version(&self) -> Option<String> {
        self.reg_text("DisplayVersion")
    }

    fn os_info_text(&self) -> Option<String> {
        self.runner
            .run(OS_INFO_COMMAND)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn release_id(&self) -> Option<String> {
        self.reg_text("ReleaseId")
    }
}
