//! Batch lifecycle of language packs
//!
//! Install, uninstall, update, activate and is-installed for one category
//! at a time. Each run produces per-item [`OperationResult`]s and a
//! [`BatchTally`] whose counters always add up to the number of requested
//! (target, locale) pairs.

mod executor;
mod outcome;

pub use executor::{Collaborators, LifecycleExecutor, TargetScope, TargetSet};
pub use outcome::{
    Activation, BatchReport, BatchTally, OperationResult, Outcome, OutcomeKind, RunStatus,
    UninstallRun, UpdateResult, UpdateRun,
};
