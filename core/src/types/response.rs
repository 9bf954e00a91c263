//! Response — the result of dispatching a command through `Sys::execute()`.

use serde::{Deserialize, Serialize};

/// Outcome of a dispatched command: human-readable output, or an error
/// message. Internal step failures are narrated and swallowed; only failures
/// that prevent the invocation from running at all surface as `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok { output: String },
    Error { message: String },
}
