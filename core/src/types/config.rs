//! Runtime settings.

use serde::{Deserialize, Serialize};

/// Tunables loaded from `settings.yaml` in the config directory. The managed
/// policy keys and their values are fixed in code; settings only cover the
/// loop's timing and the names of its artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: String,
    /// Age of the convergence stamp, in days, at which the drift check runs
    /// its comparison. The threshold is inclusive.
    pub staleness_days: f64,
    /// Delay, in minutes, before a scheduled reconciliation fires.
    pub reconcile_delay_minutes: i64,
    /// Filename of the convergence stamp inside the config directory.
    pub stamp_file: String,
    /// Name of the one-shot reconciliation task.
    pub reconcile_task: String,
    /// Name of the on-startup drift-check task.
    pub startup_task: String,
    /// Name of the weekly drift-check task.
    pub weekly_task: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: "0.1.0".into(),
            staleness_days: 364.0,
            reconcile_delay_minutes: 1,
            stamp_file: "last_applied.txt".into(),
            reconcile_task: "RelpinReconcile".into(),
            startup_task: "RelpinCheckStartup".into(),
            weekly_task: "RelpinCheckWeekly".into(),
        }
    }
}
