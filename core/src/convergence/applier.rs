//! The apply pass — converges the stored policy set toward the desired set.
//!
//! Every step is attempted regardless of earlier failures: a failed key
//! write never stops the sibling keys, a failed refresh never stops the
//! stamp, and the stamp is advanced even after partial failure. The report
//! carries what actually happened; nothing here escalates to the caller.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::data::state;
use crate::infrastructure::{PolicyStore, TaskScheduler};
use crate::resolver::cascade;
use crate::resolver::sources::ReleaseSources;
use crate::types::policy::{desired_policy_set, PolicyEntry};
use crate::types::release::SystemRelease;

/// Outcome of one apply pass.
#[derive(Debug, Clone)]
pub struct ApplyReport {
    /// The release the desired set was derived from.
    pub release: SystemRelease,
    /// Keys written successfully, in write order.
    pub written: Vec<String>,
    /// Keys that failed, with the per-key error.
    pub failed: Vec<(String, String)>,
    /// Whether the policy refresh succeeded.
    pub refreshed: bool,
    /// Whether the convergence stamp was written.
    pub stamped: bool,
}

impl ApplyReport {
    /// Every key written, refresh succeeded, stamp written.
    pub fn fully_converged(&self) -> bool {
        self.failed.is_empty() && self.refreshed && self.stamped
    }
}

/// Run one apply pass at instant `now`.
///
/// Steps: clear any pending reconciliation task, resolve the desired set
/// with the full cascade, write each key independently, refresh policy, and
/// unconditionally overwrite the convergence stamp.
pub fn apply(
    sources: &dyn ReleaseSources,
    store: &mut dyn PolicyStore,
    scheduler: &mut dyn TaskScheduler,
    reconcile_task: &str,
    stamp_path: &Path,
    now: DateTime<Utc>,
) -> ApplyReport {
    // A pending reconciliation is consumed by running; clear it first so an
    // armed one-shot does not fire after a manual apply.
    if let Err(e) = scheduler.delete(reconcile_task) {
        warn!(task = reconcile_task, error = %e, "pending reconciliation cleanup failed");
    }

    let release = cascade::resolve(sources);
    info!(
        edition = ?release.edition,
        release = %release.feature_release,
        source = ?release.source,
        "resolved desired policy"
    );

    let mut written = Vec::new();
    let mut failed = Vec::new();
    for PolicyEntry { key, value } in desired_policy_set(&release) {
        let existing = store.read_value(key);
        match store.write_value(key, &value) {
            Ok(()) => {
                let action = if existing.is_none() { "created" } else { "overwritten" };
                info!(key, value = %value.render(), kind = value.type_name(), action, "policy value written");
                written.push(key.to_string());
            }
            Err(e) => {
                warn!(key, error = %e, "policy value write failed");
                failed.push((key.to_string(), e));
            }
        }
    }

    let refreshed = match store.refresh() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "policy refresh failed");
            false
        }
    };

    // The stamp advances even after partial failure: it records the last
    // attempt, not the last clean convergence.
    let stamped = match state::write_last_applied(stamp_path, now) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "convergence stamp write failed");
            false
        }
    };

    ApplyReport { release, written, failed, refreshed, stamped }
}
