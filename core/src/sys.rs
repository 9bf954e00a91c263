//! Central runtime. Owns the data layer and the system backends and
//! dispatches commands.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::command::Command;
use crate::convergence::applier::{self, ApplyReport};
use crate::convergence::drift::{DriftCheck, DriftOutcome};
use crate::data::{state, Data};
use crate::infrastructure::probe::SystemProbe;
use crate::infrastructure::registry::RegistryStore;
use crate::infrastructure::runner::ShellRunner;
use crate::infrastructure::schtasks::SchtasksScheduler;
use crate::infrastructure::{PolicyStore, TaskScheduler};
use crate::resolver::cascade;
use crate::resolver::sources::ReleaseSources;
use crate::types::policy::desired_policy_set;
use crate::types::response::Response;

/// Runtime for one invocation. Wraps the `Data` layer plus the three
/// injected backends so every command handler can be exercised against
/// in-memory doubles.
pub struct Sys {
    data: Data,
    sources: Box<dyn ReleaseSources>,
    store: Box<dyn PolicyStore>,
    scheduler: Box<dyn TaskScheduler>,
}

impl Sys {
    /// Production constructor: shell-backed adapters against the live system.
    pub fn new(config_dir: &Path) -> Result<Sys, String> {
        let data = Data::new(config_dir)?;
        Ok(Sys {
            data,
            sources: Box::new(SystemProbe::new(Box::new(ShellRunner))),
            store: Box::new(RegistryStore::new(Box::new(ShellRunner))),
            scheduler: Box::new(SchtasksScheduler::new(Box::new(ShellRunner))),
        })
    }

    /// Constructor with injected backends. Useful for testing.
    pub fn with_backends(
        data: Data,
        sources: Box<dyn ReleaseSources>,
        store: Box<dyn PolicyStore>,
        scheduler: Box<dyn TaskScheduler>,
    ) -> Sys {
        Sys { data, sources, store, scheduler }
    }

    /// Borrow the data layer (for inspection in tests / external code).
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// The single dispatch method. Every command enters here.
    pub fn execute(&mut self, cmd: Command) -> Response {
        match cmd {
            Command::Apply { .. } => self.cmd_apply(),
            Command::Check { .. } => self.cmd_check(),
            Command::Bootstrap { .. } => self.cmd_bootstrap(),
            Command::Status { format } => self.cmd_status(format),
            Command::Help { topic } => Response::Ok {
                output: crate::help::help_text(topic.as_deref()),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    fn cmd_apply(&mut self) -> Response {
        let report = self.run_apply(Utc::now());
        Response::Ok { output: render_apply_report(&report) }
    }

    fn run_apply(&mut self, now: DateTime<Utc>) -> ApplyReport {
        let reconcile_task = self.data.settings().reconcile_task.clone();
        let stamp_path = self.data.stamp_path();
        applier::apply(
            &*self.sources,
            &mut *self.store,
            &mut *self.scheduler,
            &reconcile_task,
            &stamp_path,
            now,
        )
    }

    fn cmd_check(&mut self) -> Response {
        let settings = self.data.settings().clone();
        let stamp_path = self.data.stamp_path();
        let apply_command = self_command("apply");
        let check = DriftCheck {
            staleness_days: settings.staleness_days,
            reconcile_delay_minutes: settings.reconcile_delay_minutes,
            reconcile_task: &settings.reconcile_task,
            apply_command: &apply_command,
        };
        let outcome = check.run(
            &*self.sources,
            &*self.store,
            &mut *self.scheduler,
            &stamp_path,
            Utc::now(),
        );

        let output = match outcome {
            DriftOutcome::NoStamp => "No convergence stamp found; nothing to compare against.".into(),
            DriftOutcome::BadStamp => "Convergence stamp is unreadable; drift check skipped.".into(),
            DriftOutcome::Fresh { elapsed_days } => format!(
                "Policy applied {:.1} days ago (threshold {} days); no check needed.",
                elapsed_days, settings.staleness_days
            ),
            DriftOutcome::InSync { elapsed_days } => format!(
                "Stamp is {:.1} days old but stored policy matches desired values.",
                elapsed_days
            ),
            DriftOutcome::Scheduled { elapsed_days, start } => format!(
                "Drift detected after {:.1} days; reconciliation scheduled for {}.",
                elapsed_days, start
            ),
        };
        Response::Ok { output }
    }

    fn cmd_bootstrap(&mut self) -> Response {
        let report = self.run_apply(Utc::now());
        let mut lines = vec![render_apply_report(&report)];

        let settings = self.data.settings().clone();
        let check_command = self_command("check");
        match self.scheduler.create_on_startup(&settings.startup_task, &check_command) {
            Ok(()) => lines.push(format!("Registered startup drift check '{}'.", settings.startup_task)),
            Err(e) => lines.push(format!(
                "Startup drift check '{}' registration failed: {}",
                settings.startup_task, e
            )),
        }
        match self.scheduler.create_weekly(&settings.weekly_task, &check_command) {
            Ok(()) => lines.push(format!("Registered weekly drift check '{}'.", settings.weekly_task)),
            Err(e) => lines.push(format!(
                "Weekly drift check '{}' registration failed: {}",
                settings.weekly_task, e
            )),
        }
        Response::Ok { output: lines.join("\n") }
    }

    fn cmd_status(&self, format: Option<String>) -> Response {
        let release = cascade::resolve(&*self.sources);
        let desired = desired_policy_set(&release);
        let last_applied = state::read_last_applied(&self.data.stamp_path()).ok();
        let now = Utc::now();

        if format.as_deref() == Some("json") {
            let keys: Vec<serde_json::Value> = desired
                .iter()
                .map(|entry| {
                    let stored = self.store.read_value(entry.key);
                    serde_json::json!({
                        "key": entry.key,
                        "desired": entry.value.render(),
                        "stored": stored.as_ref().map(|v| v.render()),
                        "in_sync": stored.as_ref() == Some(&entry.value),
                    })
                })
                .collect();
            let obj = serde_json::json!({
                "edition": format!("{:?}", release.edition).to_lowercase(),
                "feature_release": release.feature_release,
                "release_source": format!("{:?}", release.source).to_lowercase(),
                "last_applied": last_applied.map(|t| t.to_rfc3339()),
                "keys": keys,
            });
            return Response::Ok {
                output: serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".into()),
            };
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "Resolved release: {} {} ({:?})",
            release.edition.product_name(),
            release.feature_release,
            release.source
        ));
        match last_applied {
            Some(t) => {
                let age_days = (now - t).num_seconds() as f64 / 86_400.0;
                lines.push(format!("Last applied: {} ({:.1} days ago)", t.to_rfc3339(), age_days));
            }
            None => lines.push("Last applied: never".into()),
        }
        lines.push(format!("{:<34} {:<16} {:<16} {}", "Key", "Desired", "Stored", "State"));
        for entry in &desired {
            let stored = self.store.read_value(entry.key);
            let state = if stored.as_ref() == Some(&entry.value) { "ok" } else { "drift" };
            lines.push(format!(
                "{:<34} {:<16} {:<16} {}",
                entry.key,
                entry.value.render(),
                stored.map(|v| v.render()).unwrap_or_else(|| "<absent>".into()),
                state
            ));
        }
        Response::Ok { output: lines.join("\n") }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The command line a scheduled task uses to re-invoke this binary.
fn self_command(subcommand: &str) -> String {
    let exe = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "relpin".into());
    format!("\"{}\" {} --silent", exe, subcommand)
}

fn render_apply_report(report: &ApplyReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Desired policy: {} / {} (source: {:?})",
        report.release.edition.product_name(),
        report.release.feature_release,
        report.release.source
    ));
    for key in &report.written {
        lines.push(format!("  {:<34} written", key));
    }
    for (key, error) in &report.failed {
        lines.push(format!("  {:<34} FAILED: {}", key, error));
    }
    lines.push(format!(
        "Policy refresh: {}",
        if report.refreshed { "ok" } else { "failed (best-effort)" }
    ));
    lines.push(format!(
        "Convergence stamp: {}",
        if report.stamped { "written" } else { "NOT written" }
    ));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::{MockScheduler, MockStore};
    use crate::resolver::sources::MockSources;
    use crate::types::config::Settings;
    use crate::types::policy::PolicyValue;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("relpin_test_sys").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn test_sys(dir: &Path) -> Sys {
        let mut sources = MockSources::new();
        sources.display_version = Some("24H2".into());
        sources.os_info_text = Some("24H2".into());
        Sys::with_backends(
            Data::from_settings(Settings::default(), dir),
            Box::new(sources),
            Box::new(MockStore::new()),
            Box::new(MockScheduler::new()),
        )
    }

    fn output(r: &Response) -> &str {
        match r {
            Response::Ok { output } => output,
            Response::Error { message } => message,
        }
    }

    #[test]
    fn apply_narrates_all_keys_and_writes_stamp() {
        let dir = test_dir("apply");
        let mut sys = test_sys(&dir);

        let r = sys.execute(Command::Apply { silent: false });
        let text = output(&r);
        for key in [
            "ProductVersion",
            "TargetReleaseVersion",
            "TargetReleaseVersionInfo",
            "DeferQualityUpdates",
            "DeferQualityUpdatesPeriodInDays",
        ] {
            assert!(text.contains(key), "missing {} in: {}", key, text);
        }
        assert!(text.contains("Policy refresh: ok"));
        assert!(sys.data().stamp_path().exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bootstrap_applies_and_registers_recurring_checks() {
        // First-install scenario: no stamp, empty store.
        let dir = test_dir("bootstrap");
        let mut sys = test_sys(&dir);
        assert!(!sys.data().stamp_path().exists());

        let r = sys.execute(Command::Bootstrap { silent: false });
        let text = output(&r);
        assert!(text.contains("RelpinCheckStartup"));
        assert!(text.contains("RelpinCheckWeekly"));
        assert!(sys.data().stamp_path().exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn check_without_stamp_is_a_no_op() {
        let dir = test_dir("check_no_stamp");
        let mut sys = test_sys(&dir);

        let r = sys.execute(Command::Check { silent: false });
        assert!(output(&r).contains("No convergence stamp"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn check_after_apply_reports_fresh() {
        let dir = test_dir("check_fresh");
        let mut sys = test_sys(&dir);
        sys.execute(Command::Apply { silent: false });

        let r = sys.execute(Command::Check { silent: false });
        assert!(output(&r).contains("no check needed"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn status_reports_absent_store_as_drift() {
        let dir = test_dir("status_drift");
        let mut sys = test_sys(&dir);

        let r = sys.execute(Command::Status { format: None });
        let text = output(&r);
        assert!(text.contains("Resolved release: Windows 11 24H2"));
        assert!(text.contains("Last applied: never"));
        assert!(text.contains("<absent>"));
        assert!(text.contains("drift"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn status_json_shape() {
        let dir = test_dir("status_json");
        let mut store = MockStore::new();
        store.set_value("ProductVersion", PolicyValue::Text("Windows 11".into()));
        let mut sources = MockSources::new();
        sources.display_version = Some("24H2".into());
        let mut sys = Sys::with_backends(
            Data::from_settings(Settings::default(), &dir),
            Box::new(sources),
            Box::new(store),
            Box::new(MockScheduler::new()),
        );

        let r = sys.execute(Command::Status { format: Some("json".into()) });
        let parsed: serde_json::Value = serde_json::from_str(output(&r)).unwrap();
        assert_eq!(parsed["feature_release"], "24H2");
        assert_eq!(parsed["keys"].as_array().unwrap().len(), 5);
        assert_eq!(parsed["keys"][0]["in_sync"], true);
        assert_eq!(parsed["keys"][2]["in_sync"], false);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn help_dispatches() {
        let dir = test_dir("help");
        let mut sys = test_sys(&dir);
        let r = sys.execute(Command::Help { topic: None });
        assert!(output(&r).contains("relpin"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn self_command_is_silent() {
        let cmd = self_command("apply");
        assert!(cmd.ends_with("apply --silent"));
    }
}
