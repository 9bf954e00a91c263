//! Release identity types — OS edition, feature release, and the validation
//! rules for feature-release strings.
//!
//! A feature release is the short tag for an incremental update wave
//! (two-digit year, "H", half-year digit — e.g. `24H2`). Values that do not
//! match that shape are treated as absent wherever they are sourced; they
//! never propagate into the desired policy set.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The literal used when every detection source comes up empty.
pub const FALLBACK_RELEASE: &str = "24H2";

/// Windows product line, derived from the OS major version and build number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edition {
    Win10,
    Win11,
    Unknown,
}

impl Edition {
    /// The `ProductVersion` policy string for this edition.
    ///
    /// Unknown editions pin as "Windows 10"; the pin is inert on OS majors
    /// where neither product name applies.
    pub fn product_name(&self) -> &'static str {
        match self {
            Edition::Win10 => "Windows 10",
            Edition::Win11 => "Windows 11",
            Edition::Unknown => "Windows 10",
        }
    }
}

/// Which cascade level produced the resolved feature release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseSource {
    Primary,
    Secondary,
    Tertiary,
    Fallback,
}

/// A resolved view of the running system, produced fresh on every invocation
/// and never cached across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRelease {
    pub edition: Edition,
    pub feature_release: String,
    pub source: ReleaseSource,
}

/// OS major version and build number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OsVersion {
    pub major: u32,
    pub build: u32,
}

/// Classify the edition from the version numbers: major 10 with build 22000
/// or later is Windows 11, major 10 below that is Windows 10, anything else
/// is unknown.
pub fn classify_edition(version: OsVersion) -> Edition {
    if version.major == 10 && version.build >= 22000 {
        Edition::Win11
    } else if version.major == 10 {
        Edition::Win10
    } else {
        Edition::Unknown
    }
}

fn exact_release_regex() -> Regex {
    Regex::new(r"^\d{2}H\d$").expect("static release regex")
}

fn embedded_release_regex() -> Regex {
    Regex::new(r"\d{2}H\d").expect("static release regex")
}

/// Whether a candidate string is a well-formed feature release.
pub fn is_valid_release(candidate: &str) -> bool {
    exact_release_regex().is_match(candidate.trim())
}

/// Trim and pattern-check a candidate; malformed values become `None`.
pub fn validated_release(candidate: Option<String>) -> Option<String> {
    candidate
        .map(|c| c.trim().to_string())
        .filter(|c| is_valid_release(c))
}

/// Extract the first feature-release-shaped substring from free text.
pub fn extract_release(text: &str) -> Option<String> {
    embedded_release_regex()
        .find(text)
        .map(|m| m.as_str().to_string())
}
