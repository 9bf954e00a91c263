//! Infrastructure backends for the policy store and the task scheduler.
//!
//! Provides the `PolicyStore` and `TaskScheduler` traits and implementations
//! for the live system (production) and in-memory doubles (testing). The
//! production backends build `reg.exe` / `schtasks.exe` command strings and
//! hand them to a `CommandRunner`, keeping command construction separately
//! testable from execution.

pub mod mock;
pub mod probe;
pub mod registry;
pub mod runner;
pub mod schtasks;

use chrono::{DateTime, Utc};

use crate::types::policy::PolicyValue;

/// A flat key → typed-value configuration namespace with independent
/// create/read/overwrite per key.
pub trait PolicyStore {
    /// Read one key. `None` covers both an absent key and an unreadable
    /// namespace — the callers treat those identically.
    fn read_value(&self, key: &str) -> Option<PolicyValue>;

    /// Create or overwrite one key with its typed value.
    fn write_value(&mut self, key: &str, value: &PolicyValue) -> Result<(), String>;

    /// Ask the system to re-read policy. Best-effort.
    fn refresh(&mut self) -> Result<(), String>;
}

/// Registration of externally-managed triggers.
pub trait TaskScheduler {
    /// Create a one-shot task starting at `start`, force-replacing any
    /// existing task of the same name.
    fn create_one_shot(&mut self, name: &str, command: &str, start: DateTime<Utc>)
        -> Result<(), String>;

    /// Create a task that runs at every system startup (force-replace).
    fn create_on_startup(&mut self, name: &str, command: &str) -> Result<(), String>;

    /// Create a weekly task (force-replace).
    fn create_weekly(&mut self, name: &str, command: &str) -> Result<(), String>;

    /// Remove a task. Absence is not an error.
    fn delete(&mut self, name: &str) -> Result<(), String>;
}
