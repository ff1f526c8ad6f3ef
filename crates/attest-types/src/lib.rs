//! Stable DTOs and IDs used across the attest workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted claim document
//! - stable state strings, tags and scenario names
//! - the check catalog (metadata snapshot source)
//! - the timestamp codec shared by the claim writer and the JUnit projection

#![forbid(unsafe_code)]

pub mod catalog;
pub mod claim;
pub mod ids;
pub mod report_object;
pub mod summary;
pub mod timefmt;

pub use catalog::{Catalog, CatalogEntry, labels_for};
pub use claim::{
    CLAIM_FORMAT_VERSION, CatalogInfo, CategoryClassification, CheckState, Claim, ClaimResult,
    ClaimRoot, Identifier, Metadata, Versions,
};
pub use report_object::{ReportObject, ResultObjectsOut};
pub use summary::{RunSummary, SuiteCounts};
