//! End-to-end tests exercising the public API across catalogue generation,
//! synthesis and display together, rather than any one module in isolation.

use resistor_synth::catalogue::{generate, Series};
use resistor_synth::engine::{synthesize, Topology, TracingSink};
use resistor_synth::SynthesisError;

fn e6_band(min: f64, max: f64) -> Vec<f64> {
    generate(&Series::E6, min, max).unwrap()
}

#[test]
fn exact_target_round_trips_through_display() {
    let catalogue = e6_band(10.0, 1e7);
    let outcome = synthesize(15.0, &catalogue, 0.0, 1, Topology::Mixed, &TracingSink).unwrap();
    assert_eq!(outcome.expression.to_string(), "15.0");
    assert_eq!(outcome.value, 15.0);
    assert!(outcome.tolerance_met);
}

#[test]
fn a_tighter_tolerance_never_decreases_the_component_count_needed() {
    let catalogue = e6_band(10.0, 1e7);
    let loose = synthesize(88_120.0, &catalogue, 0.05, 8, Topology::Mixed, &TracingSink).unwrap();
    let tight = synthesize(88_120.0, &catalogue, 0.001, 8, Topology::Mixed, &TracingSink).unwrap();
    assert!(tight.expression.size() >= loose.expression.size());
}

#[test]
fn out_of_band_target_is_a_best_effort_no_solution() {
    // One ohm is well below the E6 catalogue's 10-ohm floor: no single- or
    // few-component network built from it can land within a tight tolerance.
    let catalogue = e6_band(10.0, 1e7);
    let err = synthesize(1.0, &catalogue, 0.001, 2, Topology::Mixed, &TracingSink).unwrap_err();
    match err {
        SynthesisError::NoSolution { max_components, .. } => assert_eq!(max_components, 2),
        other => panic!("expected NoSolution, got {other:?}"),
    }
}

#[test]
fn every_component_in_the_result_is_drawn_from_the_requested_catalogue() {
    use resistor_synth::expr::Expression;

    fn leaves(expr: &Expression, out: &mut Vec<f64>) {
        match expr {
            Expression::Leaf(v) => out.push(*v),
            Expression::Node(_, children) => children.iter().for_each(|c| leaves(c, out)),
        }
    }

    let catalogue = e6_band(10.0, 1e7);
    let outcome = synthesize(16_800.0, &catalogue, 0.0, 3, Topology::Mixed, &TracingSink).unwrap();
    let mut used = Vec::new();
    leaves(&outcome.expression, &mut used);
    for v in used {
        assert!(catalogue.contains(&v), "{v} is not in the requested E6 catalogue");
    }
}

#[test]
fn series_only_and_parallel_only_agree_with_mixed_when_one_suffices() {
    // 20 MOhm is a clean sum of two 10 MOhm resistors: series-only,
    // parallel-only (which can't reach it within a loose tolerance) and
    // mixed topologies should all find the series answer when it's legal.
    let catalogue = e6_band(10.0, 1e7);
    let mixed = synthesize(20_000_000.0, &catalogue, 0.0, 2, Topology::Mixed, &TracingSink).unwrap();
    let series_only =
        synthesize(20_000_000.0, &catalogue, 0.0, 2, Topology::SeriesOnly, &TracingSink).unwrap();
    assert_eq!(mixed.expression, series_only.expression);
}

#[test]
fn parallel_only_topology_cannot_use_series_even_when_series_would_be_exact() {
    let catalogue = e6_band(10.0, 1e7);
    let result = synthesize(20_000_000.0, &catalogue, 0.0, 2, Topology::ParallelOnly, &TracingSink);
    // A parallel-only search cannot reach 20 MOhm exactly from this
    // catalogue (parallel combination only ever decreases resistance), so
    // this must fail to meet the zero tolerance rather than silently
    // returning the series answer.
    assert!(result.is_err());
}

#[test]
fn unknown_series_name_is_rejected_before_any_search_runs() {
    let err = Series::parse("E7").unwrap_err();
    assert!(matches!(err, SynthesisError::InvalidConfiguration(_)));
}

#[test]
fn unknown_topology_name_is_rejected_before_any_search_runs() {
    let err = Topology::parse("perpendicular").unwrap_err();
    assert!(matches!(err, SynthesisError::InvalidConfiguration(_)));
}
