//! The drift check — staleness gate, narrow comparison, and the re-arm.
//!
//! One invocation is a single linear pass: read the convergence stamp,
//! bail out if it is missing or unreadable, skip if it is younger than the
//! staleness threshold, otherwise resolve the desired values with the brief
//! cascade and compare the two release-bearing keys against the store. On
//! mismatch or absence a deferred apply is force-armed.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::data::state::{self, StateError};
use crate::infrastructure::{PolicyStore, TaskScheduler};
use crate::resolver::cascade;
use crate::resolver::sources::ReleaseSources;
use crate::types::policy::{desired_policy_set, COMPARED_KEYS};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// What a single drift-check invocation concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum DriftOutcome {
    /// No stamp to compare against; nothing was scheduled.
    NoStamp,
    /// The stamp exists but is not a readable timestamp; nothing was
    /// scheduled.
    BadStamp,
    /// The stamp is younger than the staleness threshold.
    Fresh { elapsed_days: f64 },
    /// Stale, but the compared keys already match the desired values.
    InSync { elapsed_days: f64 },
    /// Stale and drifted; a deferred apply has been armed.
    Scheduled { elapsed_days: f64, start: DateTime<Utc> },
}

/// Parameters of one drift check.
pub struct DriftCheck<'a> {
    /// Inclusive staleness threshold in days.
    pub staleness_days: f64,
    /// Delay before the armed apply fires.
    pub reconcile_delay_minutes: i64,
    /// Name of the one-shot reconciliation task.
    pub reconcile_task: &'a str,
    /// Command line the armed task runs.
    pub apply_command: &'a str,
}

impl<'a> DriftCheck<'a> {
    /// Run the check at instant `now`.
    pub fn run(
        &self,
        sources: &dyn ReleaseSources,
        store: &dyn PolicyStore,
        scheduler: &mut dyn TaskScheduler,
        stamp_path: &Path,
        now: DateTime<Utc>,
    ) -> DriftOutcome {
        let last_applied = match state::read_last_applied(stamp_path) {
            Ok(t) => t,
            Err(StateError::Missing(_)) => {
                warn!("no convergence stamp; skipping drift check");
                return DriftOutcome::NoStamp;
            }
            Err(e) => {
                warn!(error = %e, "unreadable convergence stamp; skipping drift check");
                return DriftOutcome::BadStamp;
            }
        };

        let elapsed_days = (now - last_applied).num_seconds() as f64 / SECONDS_PER_DAY;
        if elapsed_days < self.staleness_days {
            debug!(elapsed_days, threshold = self.staleness_days, "policy stamp still fresh");
            return DriftOutcome::Fresh { elapsed_days };
        }

        let release = cascade::resolve_brief(sources);
        // Only the release-bearing keys are compared.
        let drifted = desired_policy_set(&release)
            .into_iter()
            .filter(|entry| COMPARED_KEYS.contains(&entry.key))
            .any(|entry| match store.read_value(entry.key) {
                Some(have) => have != entry.value,
                None => true,
            });

        if !drifted {
            info!(elapsed_days, "stored policy matches desired values");
            return DriftOutcome::InSync { elapsed_days };
        }

        let start = now + Duration::minutes(self.reconcile_delay_minutes);
        // Force-replace: an already-armed task just has its start pushed out.
        // The outcome is not verified; scheduling failure is logged only.
        if let Err(e) = scheduler.create_one_shot(self.reconcile_task, self.apply_command, start) {
            warn!(task = self.reconcile_task, error = %e, "failed to arm reconciliation");
        }
        info!(elapsed_days, start = %start, "drift detected, reconciliation armed");
        DriftOutcome::Scheduled { elapsed_days, start }
    }
}
