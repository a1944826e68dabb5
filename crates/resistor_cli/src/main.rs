//! `resistor_cli` binary: parses arguments, drives `resistor_synth::synthesize`,
//! and prints the resulting network.

use clap::Parser;
use colored::Colorize;
use resistor_synth::engine::{synthesize, Topology, TracingSink};
use resistor_synth::{catalogue, SynthesisError};
use tracing_subscriber::EnvFilter;

/// A pragmatic ceiling for `--num-components` when the user leaves it
/// unbounded: the search is exponential in component count, so "unbounded"
/// is capped rather than taken literally.
const UNBOUNDED_MAX_COMPONENTS: usize = 12;

/// Synthesize a target resistance from a preferred-number (E-series) catalogue.
#[derive(Parser, Debug)]
#[command(name = "resistor_cli", version, about)]
struct Args {
    /// The target resistance, in ohms.
    target: f64,

    /// Relative tolerance (e.g. 0.01 for 1%).
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,

    /// Maximum number of components to use. Negative means unbounded.
    #[arg(long, default_value_t = -1)]
    num_components: i64,

    /// E-series to draw components from.
    #[arg(long, default_value = "E6")]
    series: String,

    /// Smallest catalogue value to consider, in ohms.
    #[arg(long, default_value_t = 10.0)]
    min_resistance: f64,

    /// Largest catalogue value to consider, in ohms.
    #[arg(long, default_value_t = 10_000_000.0)]
    max_resistance: f64,

    /// Which combination rules the search may use.
    #[arg(long, default_value = "mixed")]
    topology: String,

    /// Print the achieved relative error alongside the result.
    #[arg(long)]
    print_error: bool,

    /// Suppress printing the resulting network.
    #[arg(long)]
    omit_result: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("{}: {err}", "error".red().bold());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SynthesisError> {
    let series = catalogue::Series::parse(&args.series)?;
    let topology = Topology::parse(&args.topology)?;
    let max_components = if args.num_components < 0 {
        UNBOUNDED_MAX_COMPONENTS
    } else {
        args.num_components as usize
    };

    let components = catalogue::generate(&series, args.min_resistance, args.max_resistance)?;
    if components.is_empty() {
        return Err(SynthesisError::InvalidRange {
            min: args.min_resistance,
            max: args.max_resistance,
        });
    }

    let outcome = synthesize(args.target, &components, args.tolerance, max_components, topology, &TracingSink);

    let (expression, value, relative_error) = match &outcome {
        Ok(out) => (out.expression.clone(), out.value, out.relative_error),
        Err(SynthesisError::NoSolution { best, value, achieved_error, .. }) => {
            ((**best).clone(), *value, achieved_error / args.target)
        }
        Err(_) => return outcome.map(|_| ()),
    };

    if !args.omit_result {
        println!("{expression}");
    }
    if args.print_error {
        println!("value: {value} (relative error {:.4}%)", relative_error * 100.0);
    }

    outcome.map(|_| ())
}
