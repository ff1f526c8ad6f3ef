use std::fmt;

/// Parsed label expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Normalized label token.
    Ident(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate against a label set. Both operands of a binary node are evaluated.
    pub fn eval<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        match self {
            Expr::Ident(name) => labels.iter().any(|l| label_matches(name, l.as_ref())),
            Expr::Not(inner) => !inner.eval(labels),
            Expr::And(lhs, rhs) => {
                let l = lhs.eval(labels);
                let r = rhs.eval(labels);
                l && r
            }
            Expr::Or(lhs, rhs) => {
                let l = lhs.eval(labels);
                let r = rhs.eval(labels);
                l || r
            }
        }
    }

    /// Identifiers referenced by the expression, in source order.
    pub fn idents(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_idents(&mut out);
        out
    }

    fn collect_idents<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Ident(name) => out.push(name),
            Expr::Not(inner) => inner.collect_idents(out),
            Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                lhs.collect_idents(out);
                rhs.collect_idents(out);
            }
        }
    }
}

/// `ident` is already normalized; `label` may still contain dashes.
fn label_matches(ident: &str, label: &str) -> bool {
    ident.len() == label.len()
        && ident
            .bytes()
            .zip(label.bytes())
            .all(|(i, l)| i == l || (i == b'_' && l == b'-'))
}

/// Fully parenthesized rendering; re-parses to an equal tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => f.write_str(name),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::And(lhs, rhs) => write!(f, "({lhs} && {rhs})"),
            Expr::Or(lhs, rhs) => write!(f, "({lhs} || {rhs})"),
        }
    }
}
