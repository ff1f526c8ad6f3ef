//! Property-based tests for the label expression language.

use crate::{Expr, compile, parse};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_label() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,5}(-[a-z0-9]{1,4}){0,2}").unwrap()
}

fn arb_labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_label(), 0..6)
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = arb_label().prop_map(|l| Expr::Ident(l.replace('-', "_")));
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Expr::Not(Box::new(e))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::And(Box::new(a), Box::new(b))),
            (inner.clone(), inner).prop_map(|(a, b)| Expr::Or(Box::new(a), Box::new(b))),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn eval_is_pure(expr in arb_expr(), labels in arb_labels()) {
        let eval = compile(&expr.to_string()).unwrap();
        let first = eval.eval(&labels);
        for _ in 0..3 {
            prop_assert_eq!(eval.eval(&labels), first);
        }
        prop_assert_eq!(compile(&expr.to_string()).unwrap().eval(&labels), first);
    }

    #[test]
    fn rendering_reparses_to_same_tree(expr in arb_expr()) {
        prop_assert_eq!(parse(&expr.to_string()).unwrap(), expr);
    }

    #[test]
    fn dashes_and_underscores_are_interchangeable(expr in arb_expr(), labels in arb_labels()) {
        let eval = compile(&expr.to_string()).unwrap();
        let underscored: Vec<String> = labels.iter().map(|l| l.replace('-', "_")).collect();
        prop_assert_eq!(eval.eval(&labels), eval.eval(&underscored));

        let dashed = compile(&expr.to_string().replace('_', "-")).unwrap();
        prop_assert_eq!(dashed.eval(&labels), eval.eval(&labels));
    }

    #[test]
    fn comma_is_or(a in arb_expr(), b in arb_expr(), labels in arb_labels()) {
        let comma = compile(&format!("{a},{b}")).unwrap();
        let or = compile(&format!("{a} || {b}")).unwrap();
        prop_assert_eq!(comma.eval(&labels), or.eval(&labels));
        prop_assert_eq!(comma.eval(&labels), a.eval(&labels) || b.eval(&labels));
    }

    #[test]
    fn single_label_selects_itself(label in arb_label(), others in arb_labels()) {
        let eval = compile(&label).unwrap();
        let mut labels = others;
        labels.push(label);
        prop_assert!(eval.eval(&labels));
    }

    #[test]
    fn compile_never_panics(src in ".{0,64}") {
        let _ = compile(&src);
    }
}
