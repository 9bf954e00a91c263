//! Privilege gate — mutating commands must run elevated.
//!
//! A non-elevated invocation does no work in-process: the binary builds an
//! elevated re-launch of itself and exits. Only the probe and the re-launch
//! command builder live here; the gating itself is in the CLI entry point.

use crate::infrastructure::runner::CommandRunner;

/// Whether the current process holds the required privilege.
pub trait PrivilegeProbe {
    fn is_elevated(&self) -> bool;
}

/// Probes the live system. On Windows `net session` only succeeds in an
/// elevated shell; elsewhere effective uid 0 is the equivalent.
pub struct SystemPrivilegeProbe {
    runner: Box<dyn CommandRunner>,
}

impl SystemPrivilegeProbe {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        SystemPrivilegeProbe { runner }
    }
}

impl PrivilegeProbe for SystemPrivilegeProbe {
    fn is_elevated(&self) -> bool {
        system_elevated(self.runner.as_ref())
    }
}

#[cfg(windows)]
fn system_elevated(runner: &dyn CommandRunner) -> bool {
    runner.run("net session").is_ok()
}

#[cfg(not(windows))]
fn system_elevated(_runner: &dyn CommandRunner) -> bool {
    // SAFETY: geteuid has no failure modes.
    unsafe { libc::geteuid() == 0 }
}

/// A probe with a fixed answer, for tests.
pub struct FixedProbe(pub bool);

impl PrivilegeProbe for FixedProbe {
    fn is_elevated(&self) -> bool {
        self.0
    }
}

/// Build the command that re-launches the given invocation elevated.
pub fn elevated_relaunch_command(exe: &str, args: &[String]) -> String {
    let arg_list = args.join(" ");
    if arg_list.is_empty() {
        format!(
            "powershell -NoProfile -Command \"Start-Process -FilePath '{}' -Verb RunAs\"",
            exe
        )
    } else {
        format!(
            "powershell -NoProfile -Command \"Start-Process -FilePath '{}' -ArgumentList '{}' -Verb RunAs\"",
            exe, arg_list
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_probe_answers() {
        assert!(FixedProbe(true).is_elevated());
        assert!(!FixedProbe(false).is_elevated());
    }

    #[test]
    fn relaunch_command_with_args() {
        let cmd = elevated_relaunch_command(
            "C:\\tools\\relpin.exe",
            &["apply".to_string(), "--silent".to_string()],
        );
        assert!(cmd.contains("Start-Process"));
        assert!(cmd.contains("-Verb RunAs"));
        assert!(cmd.contains("-FilePath 'C:\\tools\\relpin.exe'"));
        assert!(cmd.contains("-ArgumentList 'apply --silent'"));
    }

    #[test]
    fn relaunch_command_without_args() {
        let cmd = elevated_relaunch_command("relpin", &[]);
        assert!(cmd.contains("-Verb RunAs"));
        assert!(!cmd.contains("-ArgumentList"));
    }
}
