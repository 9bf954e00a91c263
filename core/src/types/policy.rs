//! The managed policy set — key names, typed values, and the fixed desired
//! set derived from a resolved release.

use serde::{Deserialize, Serialize};

use super::release::SystemRelease;

pub const PRODUCT_VERSION: &str = "ProductVersion";
pub const TARGET_RELEASE_VERSION: &str = "TargetReleaseVersion";
pub const TARGET_RELEASE_VERSION_INFO: &str = "TargetReleaseVersionInfo";
pub const DEFER_QUALITY_UPDATES: &str = "DeferQualityUpdates";
pub const DEFER_QUALITY_UPDATES_PERIOD: &str = "DeferQualityUpdatesPeriodInDays";

/// The keys the drift check compares. The three constant keys are outside
/// the comparison scope: an external reset of only those goes undetected
/// until the next apply run.
pub const COMPARED_KEYS: [&str; 2] = [PRODUCT_VERSION, TARGET_RELEASE_VERSION_INFO];

/// A typed policy value, mirroring the two registry value types in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyValue {
    Text(String),
    Number(u32),
}

impl PolicyValue {
    /// The registry type tag used when the value is created.
    pub fn type_name(&self) -> &'static str {
        match self {
            PolicyValue::Text(_) => "REG_SZ",
            PolicyValue::Number(_) => "REG_DWORD",
        }
    }

    /// The value as command-line data.
    pub fn render(&self) -> String {
        match self {
            PolicyValue::Text(s) => s.clone(),
            PolicyValue::Number(n) => n.to_string(),
        }
    }
}

/// One key/value pair of the desired set.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyEntry {
    pub key: &'static str,
    pub value: PolicyValue,
}

/// Build the fixed desired policy set for a resolved release, in write order.
///
/// `ProductVersion` and `TargetReleaseVersionInfo` come from the resolved
/// release; the remaining three are constants.
pub fn desired_policy_set(release: &SystemRelease) -> Vec<PolicyEntry> {
    vec![
        PolicyEntry {
            key: PRODUCT_VERSION,
            value: PolicyValue::Text(release.edition.product_name().to_string()),
        },
        PolicyEntry {
            key: TARGET_RELEASE_VERSION,
            value: PolicyValue::Number(1),
        },
        PolicyEntry {
            key: TARGET_RELEASE_VERSION_INFO,
            value: PolicyValue::Text(release.feature_release.clone()),
        },
        PolicyEntry {
            key: DEFER_QUALITY_UPDATES,
            value: PolicyValue::Number(1),
        },
        PolicyEntry {
            key: DEFER_QUALITY_UPDATES_PERIOD,
            value: PolicyValue::Number(4),
        },
    ]
}
