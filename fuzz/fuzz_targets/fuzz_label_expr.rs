//! Fuzz target for label expression compilation and evaluation.
//!
//! Goal: compiling and evaluating **never panics**, and a compiled expression
//! printed back out evaluates the same way. Printing adds parentheses, so a
//! long chain may exceed the nesting limit when reparsed; that is not a failure.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_label_expr
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    expr: &'a str,
    labels: Vec<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    let expanded = attest_labels::expand_filter(input.expr);
    let Ok(evaluator) = attest_labels::compile(&expanded) else {
        return;
    };

    let verdict = evaluator.eval(&input.labels);
    match attest_labels::compile(&evaluator.expr().to_string()) {
        Ok(reparsed) => assert_eq!(reparsed.eval(&input.labels), verdict),
        Err(attest_labels::ParseError::TooDeep { .. }) => {}
        Err(e) => panic!("printed expression failed to compile: {e}"),
    }
});
