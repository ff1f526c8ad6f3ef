//! Use case orchestration for attest.
//!
//! This crate provides the application layer: use cases that coordinate the engine, settings and
//! render layers, plus the claim file IO. The CLI crate depends on this; it only handles argument
//! parsing and logging setup.

#![forbid(unsafe_code)]

mod claim;
mod io;
mod post;
mod run;

pub use claim::{ClaimBuilder, to_junit_xml};
pub use io::{read_claim, serialize_claim, write_claim, write_text};
pub use post::{SanitizeOutput, run_junit, run_sanitize, run_summary};
pub use run::{CLAIM_FILE, JUNIT_FILE, RunOutput, SUMMARY_FILE, load_config, run_suites};
