//! The recursive branch-and-bound synthesis engine (§4.5).

use std::time::Instant;

use crate::error::SynthesisError;
use crate::expr::{Expression, Operator, Token};
use crate::memo::MemoStore;
use crate::polish::evaluate_fast;

/// Which operators the engine is allowed to compose with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    SeriesOnly,
    ParallelOnly,
    Mixed,
}

impl Topology {
    /// Parses `mixed | series | parallel` (case-insensitive), per §6.
    pub fn parse(name: &str) -> Result<Self, SynthesisError> {
        match name.to_ascii_lowercase().as_str() {
            "mixed" => Ok(Topology::Mixed),
            "series" => Ok(Topology::SeriesOnly),
            "parallel" => Ok(Topology::ParallelOnly),
            other => Err(SynthesisError::InvalidConfiguration(format!(
                "unknown topology '{other}'"
            ))),
        }
    }

    fn allows_series(self) -> bool {
        matches!(self, Topology::SeriesOnly | Topology::Mixed)
    }

    fn allows_parallel(self) -> bool {
        matches!(self, Topology::ParallelOnly | Topology::Mixed)
    }
}

/// A sink for the engine's leveled log messages, injected explicitly rather
/// than read from a process-global (§9 design note: "no globals").
pub trait LogSink {
    fn log(&self, level: u8, msg: &str);
}

/// Default sink: routes the legacy numeric log levels onto `tracing`
/// (1 -> info, 2 -> debug, 3 -> trace), all under the `resistor_synth::engine`
/// target.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: u8, msg: &str) {
        match level {
            1 => tracing::info!(target: "resistor_synth::engine", "{msg}"),
            2 => tracing::debug!(target: "resistor_synth::engine", "{msg}"),
            _ => tracing::trace!(target: "resistor_synth::engine", "{msg}"),
        }
    }
}

/// The result of a successful (or best-effort) synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutcome {
    pub expression: Expression,
    pub value: f64,
    pub absolute_error: f64,
    pub relative_error: f64,
    pub tolerance_met: bool,
}

/// Synthesizes a network approximating `target` from `catalogue`, within
/// `tolerance` (relative) or `max_components`, whichever the search hits
/// first. See §4.5 for the full algorithm.
///
/// `target` must be strictly positive and finite, else `InvalidTarget`. An
/// empty `catalogue` is rejected as `InvalidConfiguration`: generating one
/// (§4.1) can legitimately return an empty list for a degenerate band, and
/// the caller is expected to treat that case as `NoSolution` before ever
/// reaching the engine.
pub fn synthesize(
    target: f64,
    catalogue: &[f64],
    tolerance: f64,
    max_components: usize,
    topology: Topology,
    sink: &dyn LogSink,
) -> Result<SynthesisOutcome, SynthesisError> {
    synthesize_with_deadline(target, catalogue, tolerance, max_components, topology, sink, None)
}

/// As [`synthesize`], but stops early (returning the best effort found as
/// `NoSolution`) once `deadline` has passed, checked at the top of each
/// outer-loop iteration (§5). There is no preemption mid-recursion.
pub fn synthesize_with_deadline(
    target: f64,
    catalogue: &[f64],
    tolerance: f64,
    max_components: usize,
    topology: Topology,
    sink: &dyn LogSink,
    deadline: Option<Instant>,
) -> Result<SynthesisOutcome, SynthesisError> {
    if !target.is_finite() || target <= 0.0 {
        return Err(SynthesisError::InvalidTarget(target));
    }
    if catalogue.is_empty() {
        return Err(SynthesisError::InvalidConfiguration(
            "catalogue is empty: no candidate values in range".to_string(),
        ));
    }
    if max_components == 0 {
        return Err(SynthesisError::InvalidConfiguration(
            "max_components must be at least 1".to_string(),
        ));
    }

    let abs_tolerance = tolerance * target;
    let mut memo = MemoStore::new(catalogue, max_components);

    let mut best_value = f64::NAN;
    let mut best_tokens: Vec<Token> = Vec::new();
    let mut have_best = false;

    for n in 1..=max_components {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        sink.log(
            1,
            &format!("starting search with {n} component{}", if n == 1 { "" } else { "s" }),
        );

        let (value, tokens) = search(target, n, catalogue, topology, abs_tolerance, &mut memo);
        let error = (value - target).abs();
        let improved = !have_best || error < (best_value - target).abs();
        if improved {
            best_value = value;
            best_tokens = tokens;
            have_best = true;
        }

        if error <= abs_tolerance {
            break;
        }

        let signed_relative_error = (best_value - target) / target;
        sink.log(2, &format!("best relative error so far: {:.6}%", signed_relative_error * 100.0));
        let expr = Expression::from_reverse_polish(&best_tokens);
        sink.log(3, &format!("best network so far: {expr}"));
    }

    let expression = Expression::from_reverse_polish(&best_tokens);
    let value = expression.evaluate();
    let absolute_error = (value - target).abs();
    let relative_error = absolute_error / target;
    let tolerance_met = absolute_error <= abs_tolerance;

    if !tolerance_met {
        return Err(SynthesisError::NoSolution {
            best: Box::new(expression),
            value,
            achieved_error: absolute_error,
            max_components,
        });
    }

    Ok(SynthesisOutcome {
        expression,
        value,
        absolute_error,
        relative_error,
        tolerance_met,
    })
}

/// The recursive branch-and-bound helper of §4.5. Returns the best
/// `(value, reverse_polish_expression)` found for `sub_target` under
/// `remaining_budget` components.
fn search(
    sub_target: f64,
    remaining_budget: usize,
    catalogue: &[f64],
    topology: Topology,
    abs_tolerance: f64,
    memo: &mut MemoStore,
) -> (f64, Vec<Token>) {
    // Step 1: memo probe across every level up to the remaining budget.
    let (mut best_value, mut best_tokens) = probe(memo, sub_target, remaining_budget);

    // Step 2: early exit.
    if remaining_budget <= 1 || (best_value - sub_target).abs() <= abs_tolerance {
        return (best_value, best_tokens);
    }

    // Step 3: extension step.
    for &v in catalogue {
        if v == sub_target {
            return (v, vec![Token::Value(v)]);
        }

        if v < sub_target && topology.allows_series() {
            let needed = sub_target - v;
            let (_, rec_tokens) =
                search(needed, remaining_budget - 1, catalogue, topology, abs_tolerance, memo);
            let new_tokens = combine(Operator::Series, v, &rec_tokens);
            let new_value = evaluate_fast(&new_tokens);
            memo.insert(new_tokens_level(&new_tokens), new_value, new_tokens.clone());
            if (new_value - sub_target).abs() < (best_value - sub_target).abs() {
                best_value = new_value;
                best_tokens = new_tokens;
            }
        } else if v > sub_target && topology.allows_parallel() {
            let needed = v * sub_target / (v - sub_target);
            let (_, rec_tokens) =
                search(needed, remaining_budget - 1, catalogue, topology, abs_tolerance, memo);
            let new_tokens = combine(Operator::Parallel, v, &rec_tokens);
            let new_value = evaluate_fast(&new_tokens);
            memo.insert(new_tokens_level(&new_tokens), new_value, new_tokens.clone());
            if (new_value - sub_target).abs() < (best_value - sub_target).abs() {
                best_value = new_value;
                best_tokens = new_tokens;
            }
        }
    }

    (best_value, best_tokens)
}

/// Queries every memo level from 1 up to `remaining_budget` for the entries
/// bracketing `sub_target`, returning the closest (ties broken by lower
/// component count, then lower value).
fn probe(memo: &MemoStore, sub_target: f64, remaining_budget: usize) -> (f64, Vec<Token>) {
    let mut best: Option<(f64, usize, Vec<Token>)> = None;
    for level in 1..=remaining_budget {
        let keys = memo.level_keys(level);
        for value in bracket(&keys, sub_target) {
            let Some(tokens) = memo.get(level, value) else {
                continue;
            };
            let error = (value - sub_target).abs();
            let replace = match &best {
                None => true,
                Some((bv, bl, _)) => {
                    let best_error = (*bv - sub_target).abs();
                    error < best_error
                        || (error == best_error && level < *bl)
                        || (error == best_error && level == *bl && value < *bv)
                }
            };
            if replace {
                best = Some((value, level, tokens.clone()));
            }
        }
    }
    best.map(|(v, _, t)| (v, t))
        .expect("memo store must contain at least the seeded catalogue at level 1")
}

/// The floor and ceiling entries of a sorted slice bracketing `target`.
fn bracket(sorted_keys: &[f64], target: f64) -> Vec<f64> {
    let idx = sorted_keys.partition_point(|&v| v < target);
    let mut out = Vec::with_capacity(2);
    if idx > 0 {
        out.push(sorted_keys[idx - 1]);
    }
    if idx < sorted_keys.len() {
        out.push(sorted_keys[idx]);
    }
    out
}

/// Builds the reverse-polish sequence for `operator(v, rec)`, in the same
/// right-scanned convention as [`crate::polish::evaluate`].
fn combine(operator: Operator, v: f64, rec_tokens: &[Token]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(rec_tokens.len() + 2);
    tokens.push(Token::Op(operator));
    tokens.extend_from_slice(rec_tokens);
    tokens.push(Token::Value(v));
    tokens
}

/// Component count of a reverse-polish sequence: the number of `Value` tokens.
fn new_tokens_level(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| matches!(t, Token::Value(_))).count()
}
