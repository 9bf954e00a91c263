//! Convergence stamp — a single text file holding the instant of the last
//! apply attempt.
//!
//! The stamp is written unconditionally at the end of every apply run, even
//! a partially failed one: it records the last attempt, not the last clean
//! convergence. The drift check reads it and aborts when it is missing or
//! unparsable rather than forcing a reconciliation.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StateError {
    /// The stamp file does not exist.
    Missing(PathBuf),
    /// The stamp file exists but could not be read.
    Unreadable { path: PathBuf, error: std::io::Error },
    /// The stamp file content is not an RFC 3339 timestamp.
    Unparsable { path: PathBuf, content: String },
    /// The stamp file could not be written.
    WriteFailed { path: PathBuf, error: std::io::Error },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Missing(path) => {
                write!(f, "convergence stamp not found: {}", path.display())
            }
            StateError::Unreadable { path, error } => {
                write!(f, "cannot read convergence stamp {}: {}", path.display(), error)
            }
            StateError::Unparsable { path, content } => {
                write!(f, "convergence stamp {} is not a timestamp: '{}'", path.display(), content)
            }
            StateError::WriteFailed { path, error } => {
                write!(f, "cannot write convergence stamp {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for StateError {}

// ---------------------------------------------------------------------------
// Read / write
// ---------------------------------------------------------------------------

/// Read the instant of the last apply attempt.
pub fn read_last_applied(path: &Path) -> Result<DateTime<Utc>, StateError> {
    if !path.exists() {
        return Err(StateError::Missing(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|error| StateError::Unreadable {
        path: path.to_path_buf(),
        error,
    })?;
    let trimmed = content.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StateError::Unparsable {
            path: path.to_path_buf(),
            content: trimmed.to_string(),
        })
}

/// Overwrite the stamp with the given instant.
pub fn write_last_applied(path: &Path, when: DateTime<Utc>) -> Result<(), StateError> {
    let text = when.to_rfc3339_opts(SecondsFormat::Secs, true);
    std::fs::write(path, text).map_err(|error| StateError::WriteFailed {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_stamp(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("relpin_test_state");
        let _ = std::fs::create_dir_all(&dir);
        dir.join(name)
    }

    #[test]
    fn round_trip() {
        let path = temp_stamp("round_trip.txt");
        let when = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        write_last_applied(&path, when).unwrap();
        assert_eq!(read_last_applied(&path).unwrap(), when);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn stamp_is_rfc3339_text() {
        let path = temp_stamp("format.txt");
        let when = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        write_last_applied(&path, when).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "2026-01-02T03:04:05Z");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_stamp_is_distinguished() {
        let path = temp_stamp("never_written.txt");
        let _ = std::fs::remove_file(&path);
        match read_last_applied(&path) {
            Err(StateError::Missing(_)) => {}
            other => panic!("expected Missing, got {:?}", other),
        }
    }

    #[test]
    fn garbage_stamp_is_unparsable() {
        let path = temp_stamp("garbage.txt");
        std::fs::write(&path, "three weeks ago").unwrap();
        match read_last_applied(&path) {
            Err(StateError::Unparsable { content, .. }) => {
                assert_eq!(content, "three weeks ago");
            }
            other => panic!("expected Unparsable, got {:?}", other),
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let path = temp_stamp("whitespace.txt");
        std::fs::write(&path, "2026-01-02T03:04:05Z\n").unwrap();
        let when = read_last_applied(&path).unwrap();
        assert_eq!(when, Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn overwrite_replaces_previous_stamp() {
        let path = temp_stamp("overwrite.txt");
        let first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        write_last_applied(&path, first).unwrap();
        write_last_applied(&path, second).unwrap();
        assert_eq!(read_last_applied(&path).unwrap(), second);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn offset_timestamps_normalize_to_utc() {
        let path = temp_stamp("offset.txt");
        std::fs::write(&path, "2026-01-02T05:04:05+02:00").unwrap();
        let when = read_last_applied(&path).unwrap();
        assert_eq!(when, Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
        let _ = std::fs::remove_file(&path);
    }
}
