//! Command runner abstraction for executing shell commands.
//!
//! `CommandRunner` is the trait the backends use to execute system commands.
//! `ShellRunner` is the production implementation (`cmd /C` on Windows,
//! `sh -c` elsewhere). `MockRunner` is the test double that records calls
//! and returns preset responses.

use std::cell::RefCell;
use std::process::Command;

/// Trait for executing shell command strings.
pub trait CommandRunner: Send {
    fn run(&self, cmd: &str) -> Result<String, String>;
}

/// Production runner that spawns the platform shell.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, cmd: &str) -> Result<String, String> {
        let output = if cfg!(windows) {
            Command::new("cmd").arg("/C").arg(cmd).output()
        } else {
            Command::new("sh").arg("-c").arg(cmd).output()
        }
        .map_err(|e| format!("Failed to execute: {}", e))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }
}

/// Test-double runner that records commands and returns pre-configured
/// responses in order, defaulting to empty success.
pub struct MockRunner {
    responses: RefCell<Vec<Result<String, String>>>,
    commands: RefCell<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner {
            responses: RefCell::new(Vec::new()),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<Result<String, String>>) -> Self {
        let mut reversed = responses;
        reversed.reverse();
        MockRunner {
            responses: RefCell::new(reversed),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &str) -> Result<String, String> {
        self.commands.borrow_mut().push(cmd.to_string());
        let mut responses = self.responses.borrow_mut();
        if let Some(response) = responses.pop() {
            response
        } else {
            Ok(String::new())
        }
    }
}
