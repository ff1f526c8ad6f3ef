//! Property-based tests for the JUnit projection.

use crate::junit::tests::result;
use crate::{project_junit, render_junit};
use attest_types::{CheckState, ClaimResult};
use proptest::prelude::*;
use std::collections::BTreeMap;
use time::Duration;
use time::macros::datetime;

// ============================================================================
// Strategies
// ============================================================================

fn arb_state() -> impl Strategy<Value = CheckState> {
    prop_oneof![
        Just(CheckState::Passed),
        Just(CheckState::Failed),
        Just(CheckState::Skipped),
        Just(CheckState::Error),
        Just(CheckState::Aborted),
    ]
}

/// Results keyed by generated ids, each lasting up to 10 seconds.
fn arb_results() -> impl Strategy<Value = BTreeMap<String, ClaimResult>> {
    prop::collection::btree_map("[a-z]{1,6}-[a-z0-9]{1,6}", (arb_state(), 0i64..10_000), 0..40)
        .prop_map(|entries| {
            let t0 = datetime!(2024-05-01 10:00:00 UTC);
            entries
                .into_iter()
                .map(|(id, (state, millis))| {
                    let r = result(&id, state, t0, t0 + Duration::milliseconds(millis));
                    (id, r)
                })
                .collect()
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn aggregates_are_consistent(results in arb_results()) {
        let t0 = datetime!(2024-05-01 10:00:00 UTC);
        let report = project_junit(&results, t0, t0 + Duration::minutes(5));

        let passed = results.values().filter(|r| r.state == CheckState::Passed).count();
        prop_assert_eq!(report.failures + report.disabled + passed, report.tests);
        prop_assert!(report.errors <= report.failures);
        prop_assert_eq!(report.suite.cases.len(), report.tests);
    }

    #[test]
    fn cases_are_sorted_and_children_match_state(results in arb_results()) {
        let t0 = datetime!(2024-05-01 10:00:00 UTC);
        let report = project_junit(&results, t0, t0);

        let names: Vec<&str> = report.suite.cases.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        prop_assert_eq!(names, sorted);

        for case in &report.suite.cases {
            prop_assert_eq!(case.skipped.is_some(), case.status == CheckState::Skipped);
            prop_assert_eq!(case.failure.is_some(), case.status == CheckState::Failed);
            prop_assert!(case.time >= 0.0 && case.time <= 10.0);
        }

        let xml = render_junit(&report);
        let failed = results.values().filter(|r| r.state == CheckState::Failed).count();
        prop_assert_eq!(xml.matches("<failure ").count(), failed);
    }
}
