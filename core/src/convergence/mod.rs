//! Convergence engine — the apply pass that writes the desired policy set
//! and the drift check that re-arms it.
//!
//! The `applier` module converges the stored policy toward the resolved
//! desired values, best-effort and key-by-key. The `drift` module decides,
//! on a long period, whether a deferred apply needs to be scheduled.

pub mod applier;
pub mod drift;
