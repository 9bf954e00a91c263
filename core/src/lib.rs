//! relpin-core — Windows Update release pinning.
//!
//! Keeps a fixed Windows Update policy set (security-only updates, pinned to
//! the detected feature release) converged against drift: the resolver
//! derives desired values from the live system through a fault-tolerant
//! cascade, the applier writes them idempotently and stamps the attempt, and
//! the drift check periodically compares the store against a fresh
//! resolution and re-arms the applier when they diverge.
//!
//! There is no persistent process; each phase is one batch invocation,
//! triggered externally (startup, weekly, or a deferred one-shot).

pub mod cli;
pub mod command;
pub mod convergence;
pub mod data;
pub mod elevation;
pub mod help;
pub mod infrastructure;
pub mod install;
pub mod resolver;
pub mod sys;
pub mod types;
