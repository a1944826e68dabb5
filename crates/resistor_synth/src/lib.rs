//! Two-terminal resistor network synthesis from preferred-number catalogues.
//!
//! This crate exposes:
//! - E-series catalogue generation: `catalogue::{Series, generate}`
//! - The network expression tree: `expr::{Expression, Operator, Token}`
//! - The synthesis engine: `engine::{synthesize, synthesize_with_deadline, Topology, SynthesisOutcome}`
//! - Number formatting: `format::{format_value, NumberStyle}`
//! - The error taxonomy: `error::SynthesisError`

pub mod catalogue;
pub mod engine;
pub mod error;
pub mod expr;
pub mod format;
pub mod memo;
pub mod polish;

pub use catalogue::Series;
pub use engine::{synthesize, synthesize_with_deadline, LogSink, SynthesisOutcome, Topology, TracingSink};
pub use error::SynthesisError;
pub use expr::{Expression, Operator, Token};
pub use format::{format_value, NumberStyle};
