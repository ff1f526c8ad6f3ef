//! Property-based tests for selection, recording and sanitization.

use crate::check::CheckBuilder;
use crate::error::CheckError;
use crate::run::RunOptions;
use crate::test_support::{catalog_for, compliant, group, non_compliant, registry};
use crate::{run_checks, sanitize_claim};
use attest_types::Claim;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Clone, Copy, Debug)]
enum Outcome {
    Pass,
    Fail,
    Error,
    Skip,
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Pass),
        Just(Outcome::Fail),
        Just(Outcome::Error),
        Just(Outcome::Skip),
    ]
}

fn arb_tag() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("common"), Just("extended"), Just("telco")]
}

/// Groups of `(tag, outcome)` checks.
fn arb_layout() -> impl Strategy<Value = Vec<Vec<(&'static str, Outcome)>>> {
    prop::collection::vec(
        prop::collection::vec((arb_tag(), arb_outcome()), 1..5),
        1..4,
    )
}

fn arb_filter() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("common"),
        Just("extended"),
        Just("common,telco"),
        Just("!telco"),
        Just("all"),
    ]
}

fn build_registry(layout: &[Vec<(&'static str, Outcome)>]) -> crate::Registry {
    let groups = layout
        .iter()
        .enumerate()
        .map(|(g, checks)| {
            let name = format!("suite{g}");
            let checks = checks
                .iter()
                .enumerate()
                .map(|(c, (tag, outcome))| {
                    let builder = CheckBuilder::new(format!("{name}-check{c}")).label(*tag);
                    let builder = match outcome {
                        Outcome::Pass => builder.check_fn(compliant),
                        Outcome::Fail => builder.check_fn(non_compliant),
                        Outcome::Error => builder.check_fn(|_| Err(CheckError::failed("boom"))),
                        Outcome::Skip => builder
                            .skip_if(|| Some("not applicable".to_string()))
                            .check_fn(compliant),
                    };
                    builder.build().expect("build")
                })
                .collect();
            group(&name, checks)
        })
        .collect();
    registry(groups)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn exactly_one_record_per_selected_check(layout in arb_layout(), filter in arb_filter()) {
        let registry = build_registry(&layout);
        let evaluator = attest_labels::compile(&attest_labels::expand_filter(filter)).unwrap();
        let expected: Vec<String> = registry
            .filter_check_ids(&evaluator)
            .into_iter()
            .map(str::to_string)
            .collect();

        let ctx = run_checks(&registry, filter, &RunOptions::default()).unwrap();
        let recorded: Vec<String> = ctx.records().iter().map(|r| r.id.clone()).collect();
        prop_assert_eq!(recorded, expected);
    }

    #[test]
    fn sanitizing_with_the_run_filter_keeps_everything(
        layout in arb_layout(),
        filter in arb_filter(),
    ) {
        let registry = build_registry(&layout);
        // Catalog tags disagree with the registered labels on purpose.
        let catalog = catalog_for(&registry);
        let expanded = attest_labels::expand_filter(filter);

        let ctx = run_checks(&registry, &expanded, &RunOptions::default()).unwrap();
        let original = Claim { results: ctx.reconciled_results(&catalog), ..Claim::default() };

        let mut claim = original.clone();
        let removed = sanitize_claim(&mut claim, &attest_labels::compile(&expanded).unwrap());
        prop_assert!(removed.is_empty());
        prop_assert_eq!(&claim, &original);
    }

    #[test]
    fn sanitizing_only_removes(layout in arb_layout(), stricter in arb_filter()) {
        let registry = build_registry(&layout);
        let catalog = catalog_for(&registry);

        let ctx = run_checks(&registry, "all", &RunOptions::default()).unwrap();
        let original = Claim { results: ctx.reconciled_results(&catalog), ..Claim::default() };

        let mut same = original.clone();
        sanitize_claim(&mut same, &attest_labels::compile("common,extended,telco").unwrap());
        prop_assert_eq!(&same, &original);

        let mut claim = original.clone();
        let evaluator = attest_labels::compile(&attest_labels::expand_filter(stricter)).unwrap();
        let removed = sanitize_claim(&mut claim, &evaluator);

        prop_assert_eq!(claim.results.len() + removed.len(), original.results.len());
        for (id, result) in &claim.results {
            prop_assert_eq!(Some(result), original.results.get(id));
        }
    }
}
