//! The network expression tree: tagged operators, a reverse-polish hot-path
//! representation, and canonical simplification/display.

use std::fmt;

use crate::format::{format_value, NumberStyle};

/// The two binary combination rules a network can use. Deliberately a plain
/// tag rather than a function pointer: the evaluator dispatches on the tag
/// instead of calling through an operator value, so there is no
/// identity-equality hazard when two `Node`s need to compare operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Series,
    Parallel,
}

impl Operator {
    fn symbol(self) -> &'static str {
        match self {
            Operator::Series => " + ",
            Operator::Parallel => " ∥ ",
        }
    }
}

/// One element of a reverse-polish sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Value(f64),
    Op(Operator),
}

/// A two-terminal network: a single component, or an operator applied to
/// two or more sub-networks.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Leaf(f64),
    Node(Operator, Vec<Expression>),
}

impl Expression {
    /// Builds an `Expression` from a reverse-polish token sequence (scanned
    /// right to left), then simplifies it once.
    ///
    /// Mirrors [`crate::polish::evaluate`]'s scan direction: well-formedness
    /// (operator count is exactly one less than value count) is a
    /// precondition, checked with `debug_assert!` rather than propagated as
    /// an error, since callers only ever pass sequences they built
    /// themselves (§4.3).
    pub fn from_reverse_polish(tokens: &[Token]) -> Expression {
        let mut stack: Vec<Expression> = Vec::new();
        for tok in tokens.iter().rev() {
            match *tok {
                Token::Value(v) => stack.push(Expression::Leaf(v)),
                Token::Op(op) => {
                    let b = stack.pop().expect("malformed reverse-polish sequence");
                    let a = stack.pop().expect("malformed reverse-polish sequence");
                    stack.push(Expression::Node(op, vec![a, b]));
                }
            }
        }
        debug_assert_eq!(stack.len(), 1, "reverse-polish sequence did not reduce to one value");
        let mut expr = stack.pop().expect("empty reverse-polish sequence");
        expr.simplify();
        expr
    }

    /// Reduces the tree to its equivalent resistance.
    pub fn evaluate(&self) -> f64 {
        match self {
            Expression::Leaf(v) => *v,
            Expression::Node(Operator::Series, children) => {
                children.iter().map(Expression::evaluate).sum()
            }
            Expression::Node(Operator::Parallel, children) => {
                children.iter().map(Expression::evaluate).fold(f64::INFINITY, parallel_combine)
            }
        }
    }

    /// Number of leaves (components) in the network.
    pub fn size(&self) -> usize {
        match self {
            Expression::Leaf(_) => 1,
            Expression::Node(_, children) => children.iter().map(Expression::size).sum(),
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Expression::Leaf(_))
    }

    /// Simplifies in place: recursively simplifies children, absorbs any
    /// child whose operator matches the parent's (flattening invariant),
    /// then sorts children by subtree size ascending (canonical form).
    /// Idempotent.
    pub fn simplify(&mut self) {
        if let Expression::Node(operator, children) = self {
            let mut flattened = Vec::with_capacity(children.len());
            for mut child in children.drain(..) {
                child.simplify();
                match child {
                    Expression::Node(child_op, grandchildren) if child_op == *operator => {
                        flattened.extend(grandchildren);
                    }
                    other => flattened.push(other),
                }
            }
            // Sort by subtree size first (canonical form per §3); break ties
            // by realized value so that equal-size children of the same
            // multiset always land in the same order, giving the
            // byte-identical `Display` output required by §8.
            flattened.sort_by(|a, b| {
                a.size()
                    .cmp(&b.size())
                    .then_with(|| a.evaluate().total_cmp(&b.evaluate()))
            });
            *children = flattened;
        }
    }
}

/// Combines two resistances in parallel: `a∥b = ab/(a+b)`.
///
/// Degenerate cases (§3, §8): `0` shorts the branch (`parallel(a, 0) = 0`);
/// `∞` is the identity (`parallel(a, ∞) = a`).
pub fn parallel_combine(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else if a.is_infinite() {
        b
    } else if b.is_infinite() {
        a
    } else {
        a * b / (a + b)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Leaf(v) => write!(f, "{}", format_value(*v, 3, NumberStyle::Metric)),
            Expression::Node(op, children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", op.symbol())?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(v: f64) -> Expression {
        Expression::Leaf(v)
    }

    #[test]
    fn parallel_combine_identities() {
        assert_eq!(parallel_combine(10.0, 10.0), 5.0);
        assert_eq!(parallel_combine(10.0, f64::INFINITY), 10.0);
        assert_eq!(parallel_combine(10.0, 0.0), 0.0);
    }

    #[test]
    fn parallel_combine_is_commutative_and_associative() {
        let (a, b, c) = (10.0, 15.0, 22.0);
        assert_eq!(parallel_combine(a, b), parallel_combine(b, a));
        let lhs = parallel_combine(a, parallel_combine(b, c));
        let rhs = parallel_combine(parallel_combine(a, b), c);
        assert!((lhs - rhs).abs() < 1e-9);
    }

    #[test]
    fn simplify_flattens_same_operator_children() {
        let mut expr = Expression::Node(
            Operator::Series,
            vec![
                leaf(10.0),
                Expression::Node(Operator::Series, vec![leaf(20.0), leaf(30.0)]),
            ],
        );
        expr.simplify();
        match &expr {
            Expression::Node(Operator::Series, children) => assert_eq!(children.len(), 3),
            _ => panic!("expected a flattened Series node"),
        }
    }

    #[test]
    fn simplify_sorts_children_by_subtree_size() {
        let mut expr = Expression::Node(
            Operator::Parallel,
            vec![
                Expression::Node(Operator::Series, vec![leaf(1.0), leaf(2.0), leaf(3.0)]),
                leaf(10.0),
            ],
        );
        expr.simplify();
        match &expr {
            Expression::Node(Operator::Parallel, children) => {
                assert!(children[0].is_leaf());
                assert_eq!(children[1].size(), 3);
            }
            _ => panic!("expected Parallel node"),
        }
    }

    #[test]
    fn simplify_is_idempotent() {
        let mut expr = Expression::Node(
            Operator::Series,
            vec![
                leaf(10.0),
                Expression::Node(Operator::Parallel, vec![leaf(20.0), leaf(30.0)]),
            ],
        );
        expr.simplify();
        let once = expr.clone();
        expr.simplify();
        assert_eq!(expr, once);
    }

    #[test]
    fn simplify_preserves_value() {
        let mut expr = Expression::Node(
            Operator::Series,
            vec![
                leaf(10.0),
                Expression::Node(Operator::Series, vec![leaf(20.0), leaf(30.0)]),
            ],
        );
        let before = expr.evaluate();
        expr.simplify();
        let after = expr.evaluate();
        assert!((before - after).abs() / before < 1e-12);
    }

    #[test]
    fn display_matches_for_commutative_reorderings() {
        let mut a = Expression::Node(Operator::Series, vec![leaf(10.0), leaf(20.0)]);
        let mut b = Expression::Node(Operator::Series, vec![leaf(20.0), leaf(10.0)]);
        a.simplify();
        b.simplify();
        // Same multiset of leaves, built with children in opposite order:
        // canonical sorting must converge on the same `Display` output.
        assert_eq!(a.to_string(), b.to_string());
    }
}
