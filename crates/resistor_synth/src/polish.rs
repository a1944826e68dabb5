//! Stack-machine reduction of a reverse-polish token sequence (§4.3).
//!
//! Used in the engine's hot loop instead of materializing an [`Expression`]
//! tree at every recursive step; the tree is only built once, at the root,
//! for display (see [`Expression::from_reverse_polish`]).

use crate::expr::{parallel_combine, Operator, Token};

/// Evaluates a reverse-polish sequence by scanning right to left, handling
/// the degenerate zero/infinity cases of §3/§8.
///
/// Caller guarantees well-formedness: operator count is exactly one less
/// than value count, in valid reverse-polish order. Malformed input is a
/// programming error, checked with `debug_assert!`.
pub fn evaluate(tokens: &[Token]) -> f64 {
    let mut stack: Vec<f64> = Vec::new();
    for tok in tokens.iter().rev() {
        match *tok {
            Token::Value(v) => stack.push(v),
            Token::Op(Operator::Series) => {
                let b = stack.pop().expect("malformed reverse-polish sequence");
                let a = stack.pop().expect("malformed reverse-polish sequence");
                stack.push(a + b);
            }
            Token::Op(Operator::Parallel) => {
                let b = stack.pop().expect("malformed reverse-polish sequence");
                let a = stack.pop().expect("malformed reverse-polish sequence");
                stack.push(parallel_combine(a, b));
            }
        }
    }
    debug_assert_eq!(stack.len(), 1, "reverse-polish sequence did not reduce to one value");
    stack.pop().expect("empty reverse-polish sequence")
}

/// Non-strict variant for the engine's hot loop: specializes to series-add
/// and the non-degenerate parallel formula `ab/(a+b)`, with no branches for
/// zero or infinity. Valid only when the engine guarantees every value
/// along the way is strictly positive and finite (§4.3); that precondition
/// is debug-checked, never re-validated in release builds.
pub fn evaluate_fast(tokens: &[Token]) -> f64 {
    let mut stack: Vec<f64> = Vec::new();
    for tok in tokens.iter().rev() {
        match *tok {
            Token::Value(v) => {
                debug_assert!(v.is_finite() && v > 0.0, "evaluate_fast requires finite, positive values");
                stack.push(v);
            }
            Token::Op(Operator::Series) => {
                let b = stack.pop().expect("malformed reverse-polish sequence");
                let a = stack.pop().expect("malformed reverse-polish sequence");
                stack.push(a + b);
            }
            Token::Op(Operator::Parallel) => {
                let b = stack.pop().expect("malformed reverse-polish sequence");
                let a = stack.pop().expect("malformed reverse-polish sequence");
                debug_assert!(a + b != 0.0, "evaluate_fast precondition violated: a + b == 0");
                stack.push(a * b / (a + b));
            }
        }
    }
    debug_assert_eq!(stack.len(), 1, "reverse-polish sequence did not reduce to one value");
    stack.pop().expect("empty reverse-polish sequence")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_a_simple_series_pair() {
        // Reverse-polish for (10 + 20): scanned right-to-left, the operator
        // comes first in the slice.
        let tokens = [Token::Op(Operator::Series), Token::Value(20.0), Token::Value(10.0)];
        assert_eq!(evaluate(&tokens), 30.0);
    }

    #[test]
    fn evaluates_a_simple_parallel_pair() {
        let tokens = [Token::Op(Operator::Parallel), Token::Value(10.0), Token::Value(10.0)];
        assert_eq!(evaluate(&tokens), 5.0);
    }

    #[test]
    fn strict_and_fast_variants_agree_on_finite_positive_input() {
        let tokens = [
            Token::Op(Operator::Series),
            Token::Value(10.0),
            Token::Op(Operator::Parallel),
            Token::Value(22.0),
            Token::Value(15.0),
        ];
        assert_eq!(evaluate(&tokens), evaluate_fast(&tokens));
    }

    #[test]
    fn strict_variant_handles_zero_and_infinity() {
        let zero_parallel = [Token::Op(Operator::Parallel), Token::Value(10.0), Token::Value(0.0)];
        assert_eq!(evaluate(&zero_parallel), 0.0);

        let inf_series = [
            Token::Op(Operator::Series),
            Token::Value(10.0),
            Token::Value(f64::INFINITY),
        ];
        assert_eq!(evaluate(&inf_series), f64::INFINITY);
    }
}
