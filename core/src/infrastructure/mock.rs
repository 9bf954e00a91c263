//! Mock policy store and scheduler for testing.
//!
//! Record every write and task operation and serve pre-configured values,
//! making higher-level convergence tests deterministic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{PolicyStore, TaskScheduler};
use crate::types::policy::PolicyValue;

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// In-memory policy namespace. Individual keys can be made to refuse writes.
pub struct MockStore {
    /// Current contents of the namespace.
    pub values: HashMap<String, PolicyValue>,
    /// Every write accepted, in order.
    pub writes: Vec<(String, PolicyValue)>,
    /// Number of refresh attempts.
    pub refreshes: u32,
    fail_keys: Vec<String>,
    fail_refresh: bool,
}

impl MockStore {
    pub fn new() -> Self {
        MockStore {
            values: HashMap::new(),
            writes: Vec::new(),
            refreshes: 0,
            fail_keys: Vec::new(),
            fail_refresh: false,
        }
    }

    /// Pre-load a stored value.
    pub fn set_value(&mut self, key: &str, value: PolicyValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Make writes to one key fail.
    pub fn fail_key(&mut self, key: &str) {
        self.fail_keys.push(key.to_string());
    }

    /// Make refresh attempts fail.
    pub fn fail_refresh(&mut self) {
        self.fail_refresh = true;
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyStore for MockStore {
    fn read_value(&self, key: &str) -> Option<PolicyValue> {
        self.values.get(key).cloned()
    }

    fn write_value(&mut self, key: &str, value: &PolicyValue) -> Result<(), String> {
        if self.fail_keys.iter().any(|k| k == key) {
            return Err(format!("mock: write refused for '{}'", key));
        }
        self.values.insert(key.to_string(), value.clone());
        self.writes.push((key.to_string(), value.clone()));
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), String> {
        self.refreshes += 1;
        if self.fail_refresh {
            Err("mock: refresh failed".into())
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// MockScheduler
// ---------------------------------------------------------------------------

/// How a mock task is triggered.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskTrigger {
    Once(DateTime<Utc>),
    OnStartup,
    Weekly,
}

/// A task registered with the mock scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub command: String,
    pub trigger: TaskTrigger,
}

/// In-memory scheduler. Creates force-replace (insert), deletes tolerate
/// absence, and every operation is logged in order.
pub struct MockScheduler {
    /// Currently registered tasks by name.
    pub tasks: HashMap<String, ScheduledTask>,
    /// Names passed to create calls, in order.
    pub created: Vec<String>,
    /// Names passed to delete calls, in order.
    pub deleted: Vec<String>,
    fail_create: bool,
}

impl MockScheduler {
    pub fn new() -> Self {
        MockScheduler {
            tasks: HashMap::new(),
            created: Vec::new(),
            deleted: Vec::new(),
            fail_create: false,
        }
    }

    /// Make every create call fail.
    pub fn fail_creates(&mut self) {
        self.fail_create = true;
    }

    fn create(&mut self, name: &str, command: &str, trigger: TaskTrigger) -> Result<(), String> {
        if self.fail_create {
            return Err("mock: create refused".into());
        }
        self.tasks.insert(
            name.to_string(),
            ScheduledTask { command: command.to_string(), trigger },
        );
        self.created.push(name.to_string());
        Ok(())
    }
}

impl Default for MockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler for MockScheduler {
    fn create_one_shot(
        &mut self,
        name: &str,
        command: &str,
        start: DateTime<Utc>,
    ) -> Result<(), String> {
        self.create(name, command, TaskTrigger::Once(start))
    }

    fn create_on_startup(&mut self, name: &str, command: &str) -> Result<(), String> {
        self.create(name, command, TaskTrigger::OnStartup)
    }

    fn create_weekly(&mut self, name: &str, command: &str) -> Result<(), String> {
        self.create(name, command, TaskTrigger::Weekly)
    }

    fn delete(&mut self, name: &str) -> Result<(), String> {
        self.tasks.remove(name);
        self.deleted.push(name.to_string());
        Ok(())
    }
}
