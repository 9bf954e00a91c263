//! Scheduled-task command builder and the production scheduler.
//!
//! `SchtasksCommandBuilder` builds `schtasks.exe` command strings without
//! executing them; `SchtasksScheduler` implements `TaskScheduler` by running
//! them through a `CommandRunner`. All create commands carry `/F`, so an
//! existing task of the same name is replaced rather than duplicated.

use chrono::{DateTime, Local, Utc};
use tracing::debug;

use super::runner::CommandRunner;
use super::TaskScheduler;

// ---------------------------------------------------------------------------
// Command builder
// ---------------------------------------------------------------------------

/// Builds `schtasks.exe` command strings.
pub struct SchtasksCommandBuilder;

impl SchtasksCommandBuilder {
    pub fn new() -> Self {
        SchtasksCommandBuilder
    }

    /// `schtasks /Create /TN <name> /TR "<command>" /SC ONCE /SD <date> /ST <time> /RL HIGHEST /RU SYSTEM /F`
    pub fn create_once(&self, name: &str, command: &str, date: &str, time: &str) -> String {
        format!(
            "schtasks /Create /TN {} /TR \"{}\" /SC ONCE /SD {} /ST {} /RL HIGHEST /RU SYSTEM /F",
            name, command, date, time
        )
    }

    /// `schtasks /Create /TN <name> /TR "<command>" /SC ONSTART /RL HIGHEST /RU SYSTEM /F`
    pub fn create_on_startup(&self, name: &str, command: &str) -> String {
        format!(
            "schtasks /Create /TN {} /TR \"{}\" /SC ONSTART /RL HIGHEST /RU SYSTEM /F",
            name, command
        )
    }

    /// `schtasks /Create /TN <name> /TR "<command>" /SC WEEKLY /D <day> /ST <time> /RL HIGHEST /RU SYSTEM /F`
    pub fn create_weekly(&self, name: &str, command: &str, day: &str, time: &str) -> String {
        format!(
            "schtasks /Create /TN {} /TR \"{}\" /SC WEEKLY /D {} /ST {} /RL HIGHEST /RU SYSTEM /F",
            name, command, day, time
        )
    }

    /// `schtasks /Delete /TN <name> /F`
    pub fn delete(&self, name: &str) -> String {
        format!("schtasks /Delete /TN {} /F", name)
    }
}

impl Default for SchtasksCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SchtasksScheduler (TaskScheduler implementation)
// ---------------------------------------------------------------------------

const WEEKLY_DAY: &str = "SUN";
const WEEKLY_TIME: &str = "03:00";

/// Production scheduler over `schtasks.exe`.
pub struct SchtasksScheduler {
    builder: SchtasksCommandBuilder,
    runner: Box<dyn CommandRunner>,
}

impl SchtasksScheduler {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        SchtasksScheduler {
            builder: SchtasksCommandBuilder::new(),
            runner,
        }
    }
}

impl TaskScheduler for SchtasksScheduler {
    fn create_one_shot(
        &mut self,
        name: &str,
        command: &str,
        start: DateTime<Utc>,
    ) -> Result<(), String> {
        let local = start.with_timezone(&Local);
        let cmd = self.builder.create_once(
            name,
            command,
            &local.format("%m/%d/%Y").to_string(),
            &local.format("%H:%M").to_string(),
        );
        self.runner.run(&cmd).map(|_| ())
    }

    fn create_on_startup(&mut self, name: &str, command: &str) -> Result<(), String> {
        self.runner
            .run(&self.builder.create_on_startup(name, command))
            .map(|_| ())
    }

    fn create_weekly(&mut self, name: &str, command: &str) -> Result<(), String> {
        self.runner
            .run(&self.builder.create_weekly(name, command, WEEKLY_DAY, WEEKLY_TIME))
            .map(|_| ())
    }

    fn delete(&mut self, name: &str) -> Result<(), String> {
        // schtasks reports a missing task as a failure with a localized
        // message; absence is not an error here, so delete failures are
        // swallowed.
        if let Err(e) = self.runner.run(&self.builder.delete(name)) {
            debug!(task = name, error = %e, "task delete skipped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::runner::MockRunner;

    // -- Builder tests --

    #[test]
    fn cmd_create_once() {
        let b = SchtasksCommandBuilder::new();
        let cmd = b.create_once("RelpinReconcile", "relpin apply --silent", "03/14/2026", "09:27");
        assert_eq!(
            cmd,
            "schtasks /Create /TN RelpinReconcile /TR \"relpin apply --silent\" /SC ONCE /SD 03/14/2026 /ST 09:27 /RL HIGHEST /RU SYSTEM /F"
        );
    }

    #[test]
    fn cmd_create_on_startup() {
        let b = SchtasksCommandBuilder::new();
        let cmd = b.create_on_startup("RelpinCheckStartup", "relpin check --silent");
        assert!(cmd.contains("/SC ONSTART"));
        assert!(cmd.ends_with("/F"));
    }

    #[test]
    fn cmd_create_weekly() {
        let b = SchtasksCommandBuilder::new();
        let cmd = b.create_weekly("RelpinCheckWeekly", "relpin check --silent", "SUN", "03:00");
        assert!(cmd.contains("/SC WEEKLY /D SUN /ST 03:00"));
        assert!(cmd.contains("/RL HIGHEST"));
    }

    #[test]
    fn cmd_delete() {
        let b = SchtasksCommandBuilder::new();
        assert_eq!(b.delete("RelpinReconcile"), "schtasks /Delete /TN RelpinReconcile /F");
    }

    #[test]
    fn create_commands_force_replace() {
        let b = SchtasksCommandBuilder::new();
        for cmd in [
            b.create_once("t", "c", "01/01/2026", "00:00"),
            b.create_on_startup("t", "c"),
            b.create_weekly("t", "c", "SUN", "03:00"),
        ] {
            assert!(cmd.contains(" /F"), "missing force flag: {}", cmd);
        }
    }

    // -- Scheduler tests --

    #[test]
    fn scheduler_one_shot_succeeds() {
        let runner = MockRunner::with_responses(vec![Ok("SUCCESS".into())]);
        let mut scheduler = SchtasksScheduler::new(Box::new(runner));
        let start = chrono::Utc::now();
        assert!(scheduler
            .create_one_shot("RelpinReconcile", "relpin apply --silent", start)
            .is_ok());
    }

    #[test]
    fn scheduler_one_shot_propagates_failure() {
        let runner = MockRunner::with_responses(vec![Err("ERROR: Access is denied.".into())]);
        let mut scheduler = SchtasksScheduler::new(Box::new(runner));
        let start = chrono::Utc::now();
        assert!(scheduler
            .create_one_shot("RelpinReconcile", "relpin apply --silent", start)
            .is_err());
    }

    #[test]
    fn scheduler_delete_swallows_missing_task() {
        let runner = MockRunner::with_responses(vec![Err(
            "ERROR: The system cannot find the file specified.".into(),
        )]);
        let mut scheduler = SchtasksScheduler::new(Box::new(runner));
        assert!(scheduler.delete("RelpinReconcile").is_ok());
    }
}
