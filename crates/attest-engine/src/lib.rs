//! Check orchestration (no IO).
//!
//! Input: a [`Registry`] of [`ChecksGroup`]s and a label filter.
//! Output: a [`RunContext`] holding one record per selected check, which
//! reconciles into claim results against a catalog.

#![forbid(unsafe_code)]

pub mod check;
pub mod context;
pub mod error;
pub mod group;
pub mod reconcile;
pub mod registry;
pub mod run;
pub mod sanitize;

mod engine;

pub use check::{Check, CheckBuilder, Runnable, SkipMode, SkipPredicate};
pub use context::CheckContext;
pub use engine::{run_checks, run_selected};
pub use error::{CheckError, RegistryError};
pub use group::{ChecksGroup, GroupHook};
pub use registry::Registry;
pub use run::{CheckRecord, RunContext, RunOptions};
pub use sanitize::sanitize_claim;

#[cfg(test)]
mod test_support;


#[cfg(test)]
mod proptests;
