//! Label expression language used to select checks.
//!
//! An expression is compiled once and evaluated against many label sets.
//! Compilation is the only fallible step; evaluation is pure.

#![forbid(unsafe_code)]

mod expr;
mod lexer;
mod parser;

pub use expr::Expr;
pub use parser::{MAX_DEPTH, parse};

use attest_types::ids;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty label expression")]
    Empty,

    #[error("unexpected character {ch:?} at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected token {found:?} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression at position {pos}")]
    UnexpectedEnd { pos: usize },

    #[error("unclosed parenthesis opened at position {pos}")]
    UnclosedParen { pos: usize },

    #[error("expression nested too deeply at position {pos}")]
    TooDeep { pos: usize },
}

impl ParseError {
    /// Byte offset the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Empty => None,
            ParseError::UnexpectedChar { pos, .. }
            | ParseError::UnexpectedToken { pos, .. }
            | ParseError::UnexpectedEnd { pos }
            | ParseError::UnclosedParen { pos }
            | ParseError::TooDeep { pos } => Some(*pos),
        }
    }
}

/// A compiled label expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluator {
    source: String,
    expr: Expr,
}

impl Evaluator {
    /// True when the (normalized) labels satisfy the expression.
    pub fn eval<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        self.expr.eval(labels)
    }

    /// The expression text as given to [`compile`].
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Evaluator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

/// Compile a label expression.
///
/// `-` inside tokens is treated as `_` and `,` as `||`.
pub fn compile(expr: &str) -> Result<Evaluator, ParseError> {
    Ok(Evaluator {
        source: expr.to_string(),
        expr: parse(expr)?,
    })
}

/// Expand the `all` keyword into the filter selecting every tagged check.
/// Any other filter is returned unchanged.
pub fn expand_filter(filter: &str) -> String {
    if filter.trim() == ids::FILTER_ALL {
        ids::ALL_TAGS.join(",")
    } else {
        filter.to_string()
    }
}

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_requires_both_labels() {
        let eval = compile("a&&b").expect("compile");
        assert!(!eval.eval(&["a"]));
        assert!(eval.eval(&["a", "b"]));
    }

    #[test]
    fn comma_means_or() {
        let eval = compile("a,b").expect("compile");
        assert!(eval.eval(&["b"]));
        assert!(!eval.eval(&["c"]));
    }

    #[test]
    fn negation_of_missing_label() {
        let eval = compile("!a").expect("compile");
        let empty: [&str; 0] = [];
        assert!(eval.eval(&empty));
        assert!(!eval.eval(&["a"]));
    }

    #[test]
    fn very_long_label_lists_are_rejected_not_evaluated() {
        let huge = vec!["a"; 300_000].join(",");
        assert!(matches!(compile(&huge), Err(ParseError::TooDeep { .. })));

        let labels: Vec<String> = (0..100).map(|i| format!("label{i}")).collect();
        let eval = compile(&labels.join(",")).expect("compile");
        assert!(eval.eval(&["label99"]));
        assert!(!eval.eval(&["label100"]));
        assert_eq!(parse(&eval.expr().to_string()).as_ref(), Ok(eval.expr()));
    }

    #[test]
    fn dash_and_underscore_are_equivalent() {
        assert!(compile("my-label").expect("compile").eval(&["my_label"]));
        assert!(compile("my_label").expect("compile").eval(&["my-label"]));
        assert!(compile("my-label").expect("compile").eval(&["my-label"]));
    }

    #[test]
    fn check_ids_and_suites_select() {
        let labels = ["common", "access-control-sys-admin", "access-control"];
        assert!(compile("access-control").expect("compile").eval(&labels));
        assert!(
            compile("access-control-sys-admin && !telco")
                .expect("compile")
                .eval(&labels)
        );
        assert!(!compile("networking").expect("compile").eval(&labels));
    }

    #[test]
    fn empty_expression_is_an_error() {
        assert_eq!(compile(""), Err(ParseError::Empty));
        assert_eq!(ParseError::Empty.position(), None);
    }

    #[test]
    fn error_messages_name_the_position() {
        let err = compile("a &&& b").expect_err("malformed");
        assert_eq!(err.to_string(), "unexpected character '&' at position 4");
        assert_eq!(err.position(), Some(4));
    }

    #[test]
    fn expand_all_keyword() {
        assert_eq!(expand_filter("all"), "common,extended,faredge,telco");
        assert_eq!(expand_filter("common"), "common");

        let eval = compile(&expand_filter("all")).expect("compile");
        assert!(eval.eval(&["faredge"]));
        assert!(!eval.eval(&["untagged"]));
    }

    #[test]
    fn evaluator_parses_from_str() {
        let eval: Evaluator = "x || y".parse().expect("parse");
        assert_eq!(eval.source(), "x || y");
        assert!(eval.eval(&["y"]));
    }
}
