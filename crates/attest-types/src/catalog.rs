//! Check catalog: identity, labels and descriptive metadata for every known check.
//!
//! The engine copies entries out of the catalog when it reconciles results, so a
//! claim never observes later catalog mutations.

use crate::claim::{CatalogInfo, CategoryClassification, Identifier};
use crate::ids;
use std::collections::BTreeMap;

/// Catalog entry for a single check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub identifier: Identifier,
    pub description: String,
    pub remediation: String,
    pub exception_process: String,
    pub best_practice_reference: String,
    pub category_classification: CategoryClassification,
}

impl CatalogEntry {
    pub fn catalog_info(&self) -> CatalogInfo {
        CatalogInfo {
            best_practice_reference: self.best_practice_reference.clone(),
            description: self.description.clone(),
            exception_process: self.exception_process.clone(),
            remediation: self.remediation.clone(),
        }
    }

    /// Labels used for selection (see [`labels_for`]).
    pub fn labels(&self) -> Vec<String> {
        labels_for(&self.identifier)
    }
}

/// Ordered map from check id to catalog entry.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, filling the documented defaults, and return its identifier.
    ///
    /// Defaults:
    /// - blank exception process -> [`ids::NO_DOCUMENTED_PROCESS`]
    /// - blank best practice reference -> [`ids::NO_REFERENCE_DOCUMENT`]
    /// - no tags -> `common`
    pub fn add(&mut self, mut entry: CatalogEntry) -> Identifier {
        if entry.exception_process.trim().is_empty() {
            entry.exception_process = ids::NO_DOCUMENTED_PROCESS.to_string();
        }
        if entry.best_practice_reference.trim().is_empty() {
            entry.best_practice_reference = ids::NO_REFERENCE_DOCUMENT.to_string();
        }
        if entry.identifier.tags.trim().is_empty() {
            entry.identifier.tags = ids::TAG_COMMON.to_string();
        }

        let identifier = entry.identifier.clone();
        self.entries.insert(identifier.id.clone(), entry);
        identifier
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Id plus selection labels, ready for check construction.
    pub fn test_id_and_labels(&self, id: &str) -> Option<(String, Vec<String>)> {
        self.get(id)
            .map(|e| (e.identifier.id.clone(), labels_for(&e.identifier)))
    }
}

/// Derive the selection labels of a check from its identifier.
///
/// Labels are the comma-separated tags followed by the check id and its suite.
/// Registration and claim sanitization must agree on this mapping.
pub fn labels_for(identifier: &Identifier) -> Vec<String> {
    let mut labels: Vec<String> = identifier
        .tags
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    labels.push(identifier.id.clone());
    labels.push(identifier.suite.clone());
    labels
}
