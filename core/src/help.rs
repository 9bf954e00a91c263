//! Help text for the CLI.

/// Return help text, optionally narrowed to a topic.
pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => general_help(),
        Some("apply") => APPLY_HELP.trim_start().to_string(),
        Some("check") => CHECK_HELP.trim_start().to_string(),
        Some("bootstrap") => BOOTSTRAP_HELP.trim_start().to_string(),
        Some("status") => STATUS_HELP.trim_start().to_string(),
        Some(other) => format!("No help for '{}'. Run 'relpin help' for the command list.", other),
    }
}

fn general_help() -> String {
    "\
relpin — pins Windows Update to security-only updates for the detected feature release

Usage:
  relpin apply [--silent]       write the desired policy values now
  relpin check [--silent]       drift check; arms a deferred apply on drift
  relpin bootstrap [--silent]   first install: apply + register recurring checks
  relpin status [--format json] show stored vs. desired values
  relpin help [topic]           this text, or details per command

apply, check and bootstrap require elevation; a non-elevated run re-launches
itself elevated. --silent suppresses diagnostic output only."
        .to_string()
}

const APPLY_HELP: &str = "
relpin apply [--silent]

Resolves the desired policy values from the running system (display version,
OS info, legacy release id, in that order, with 24H2 as the fixed fallback)
and writes all five policy keys. Each key is written independently; one
failure does not stop the rest. Ends with a policy refresh and an
unconditional overwrite of the convergence stamp.";

const CHECK_HELP: &str = "
relpin check [--silent]

Reads the convergence stamp and returns immediately when it is missing,
unreadable, or younger than the staleness threshold (364 days, inclusive).
Otherwise compares ProductVersion and TargetReleaseVersionInfo against the
freshly resolved desired values and, on mismatch or absence, force-creates a
one-shot task that runs 'relpin apply --silent' one minute later.";

const BOOTSTRAP_HELP: &str = "
relpin bootstrap [--silent]

First-install path: runs an apply immediately, then registers the recurring
drift-check tasks (at startup and weekly).";

const STATUS_HELP: &str = "
relpin status [--format json]

Read-only. Shows each managed key's stored and desired value, the resolved
release, and the age of the convergence stamp.";
