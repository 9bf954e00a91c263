//! Detection sources — read access to the independent, fallible places a
//! feature release can be discovered.
//!
//! Provides the `ReleaseSources` trait and a mock implementation for tests.
//! The production adapter lives in `infrastructure::probe`.

use crate::types::release::OsVersion;

/// Read-only access to the system facts the resolver cascades over. Each
/// accessor is independently fallible; `None` means unavailable, and the
/// cascade treats a malformed value the same way.
pub trait ReleaseSources {
    /// OS major version and build number. Treated as always available;
    /// adapters fall back to a zero version when the underlying query fails,
    /// which classifies as an unknown edition.
    fn os_version(&self) -> OsVersion;

    /// Primary: the display-version field of the OS version registry key.
    fn display_version(&self) -> Option<String>;

    /// Secondary: free-text OS information from a broader query, independent
    /// of the registry field.
    fn os_info_text(&self) -> Option<String>;

    /// Tertiary: the legacy release-id field.
    fn release_id(&self) -> Option<String>;
}

/// A test-double with preset answers for every source.
#[derive(Debug, Clone)]
pub struct MockSources {
    pub version: OsVersion,
    pub display_version: Option<String>,
    pub os_info_text: Option<String>,
    pub release_id: Option<String>,
}

impl MockSources {
    /// A current Windows 11 build with every release source empty.
    pub fn new() -> Self {
        MockSources {
            version: OsVersion { major: 10, build: 26100 },
            display_version: None,
            os_info_text: None,
            release_id: None,
        }
    }
}

impl Default for MockSources {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseSources for MockSources {
    fn os_version(&self) -> OsVersion {
        self.version
    }

    fn display_version(&self) -> Option<String> {
        self.display_version.clone()
    }

    fn os_info_text(&self) -> Option<String> {
        self.os_info_text.clone()
    }

    fn release_id(&self) -> Option<String> {
        self.release_id.clone()
    }
}
