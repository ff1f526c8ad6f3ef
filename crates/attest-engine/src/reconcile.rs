//! Projection of run records into claim results.
//!
//! Catalog metadata is copied into each result, so a claim never changes when
//! the catalog does. The `testID` is built from the labels the check was
//! registered with, so re-filtering a claim sees the same labels the run did.

use crate::run::{CheckRecord, RunContext};
use attest_types::timefmt::format_result_time;
use attest_types::{Catalog, CatalogInfo, CategoryClassification, CheckState, ClaimResult, Identifier};
use std::collections::BTreeMap;

impl RunContext {
    /// One result per attempted check, keyed by check id.
    pub fn reconciled_results(&self, catalog: &Catalog) -> BTreeMap<String, ClaimResult> {
        self.records
            .iter()
            .map(|record| (record.id.clone(), reconcile(record, catalog)))
            .collect()
    }
}

pub fn reconcile(record: &CheckRecord, catalog: &Catalog) -> ClaimResult {
    let (catalog_info, category_classification) = match catalog.get(&record.id) {
        Some(entry) => (entry.catalog_info(), entry.category_classification.clone()),
        None => {
            tracing::debug!(check = %record.id, "check has no catalog entry");
            (CatalogInfo::default(), CategoryClassification::default())
        }
    };

    let failed = matches!(
        record.state,
        CheckState::Failed | CheckState::Error | CheckState::Aborted
    );
    let failure_line_content = if failed {
        record.failure_reason.lines().next().unwrap_or_default().to_string()
    } else {
        String::new()
    };

    ClaimResult {
        captured_test_output: record.captured_output.clone(),
        catalog_info,
        category_classification,
        check_details: record.details.clone(),
        duration: i64::try_from(record.duration.as_nanos()).unwrap_or(i64::MAX),
        end_time: format_result_time(record.ended_at),
        failure_line_content,
        failure_location: record.failure_location.clone(),
        failure_reason: record.failure_reason.clone(),
        skip_reason: record.skip_reason.clone(),
        start_time: format_result_time(record.started_at),
        state: record.state,
        test_id: registered_identifier(record),
    }
}

/// Identifier whose derived labels are exactly the labels the check was
/// selected with: id and group become `id` and `suite`, the rest are tags.
fn registered_identifier(record: &CheckRecord) -> Identifier {
    let tags: Vec<&str> = record
        .labels
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && *l != record.id && *l != record.group)
        .collect();
    Identifier {
        id: record.id.clone(),
        suite: record.group.clone(),
        tags: tags.join(","),
    }
}
