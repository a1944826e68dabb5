use thiserror::Error;

use crate::expr::Expression;

/// Failure modes of catalogue generation and network synthesis.
///
/// Argument-validation variants (`InvalidTarget`, `InvalidRange`,
/// `InvalidConfiguration`) are produced before any search begins.
/// `NoSolution` is produced only after `max_components` is exhausted and
/// still carries the best-effort network found, so callers can choose to
/// treat it as a warning rather than a hard failure. `InternalInvariantViolation`
/// is always a bug, never a user error.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    /// `target` was zero, negative, or non-finite.
    #[error("target must be a finite, strictly positive number (got {0})")]
    InvalidTarget(f64),

    /// The requested `[min_value, max_value]` band is empty or inverted.
    #[error("invalid catalogue range: min ({min}) > max ({max})")]
    InvalidRange { min: f64, max: f64 },

    /// Both absolute and relative tolerances were supplied, or an unknown
    /// series/topology name was given.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `max_components` was exhausted without meeting `tolerance`. The best
    /// network found is still attached so the caller can use it anyway.
    #[error(
        "no network within tolerance using at most {max_components} component(s); \
         best effort is {value} with absolute error {achieved_error:e}"
    )]
    NoSolution {
        best: Box<Expression>,
        value: f64,
        achieved_error: f64,
        max_components: usize,
    },

    /// A memo or expression invariant was violated. Indicates a bug in the
    /// engine, not bad input.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}
