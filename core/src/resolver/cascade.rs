//! The resolution cascades.
//!
//! Two distinct cascades exist on purpose. The apply path resolves through
//! four levels (edition, then primary / secondary / tertiary release
//! sources); the drift check resolves through two (extracted OS-info text,
//! then the legacy release id). They are kept as separate functions because
//! merging them would change which drifts the check can observe.

use tracing::debug;

use super::sources::ReleaseSources;
use crate::types::release::{
    classify_edition, extract_release, validated_release, ReleaseSource, SystemRelease,
    FALLBACK_RELEASE,
};

/// Resolve the desired release with the full cascade.
///
/// Priority: the primary display-version field wins if well-formed; the
/// broader OS-info text is always consulted next; the legacy release id is
/// consulted only when the primary field yielded nothing; the fixed fallback
/// closes the cascade. Each level tolerates its own source being absent or
/// malformed.
pub fn resolve(sources: &dyn ReleaseSources) -> SystemRelease {
    let edition = classify_edition(sources.os_version());

    let primary = validated_release(sources.display_version());
    // The broader query runs regardless of the primary outcome.
    let secondary = sources.os_info_text().as_deref().and_then(extract_release);
    // The legacy field is consulted only when the primary field was empty or
    // malformed.
    let tertiary = if primary.is_none() {
        validated_release(sources.release_id())
    } else {
        None
    };

    let (feature_release, source) = match (primary, secondary, tertiary) {
        (Some(p), _, _) => (p, ReleaseSource::Primary),
        (None, Some(s), _) => (s, ReleaseSource::Secondary),
        (None, None, Some(t)) => (t, ReleaseSource::Tertiary),
        (None, None, None) => (FALLBACK_RELEASE.to_string(), ReleaseSource::Fallback),
    };

    debug!(release = %feature_release, source = ?source, edition = ?edition, "resolved release");
    SystemRelease { edition, feature_release, source }
}

/// Resolve with the drift check's two-level cascade: the extracted OS-info
/// match, then the legacy release id, then the fallback. The primary
/// display-version field is not consulted on this path.
pub fn resolve_brief(sources: &dyn ReleaseSources) -> SystemRelease {
    let edition = classify_edition(sources.os_version());

    let (feature_release, source) =
        if let Some(s) = sources.os_info_text().as_deref().and_then(extract_release) {
            (s, ReleaseSource::Secondary)
        } else if let Some(t) = validated_release(sources.release_id()) {
            (t, ReleaseSource::Tertiary)
        } else {
            (FALLBACK_RELEASE.to_string(), ReleaseSource::Fallback)
        };

    debug!(release = %feature_release, source = ?source, "resolved release (brief)");
    SystemRelease { edition, feature_release, source }
}
