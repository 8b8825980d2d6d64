//! Fairness audit command line support.
//!
//! The engine lives in `fa-core`; this crate adds what a standalone tool
//! needs around it:
//! - A seeded synthetic case generator with an injected requester bias
//! - The sample evaluation (requester parity, bootstrap interval, finding)
//! - Logging setup, output rendering, and stable exit codes

pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod scenario;
pub mod synth;

pub use exit_codes::ExitCode;
pub use output::OutputFormat;
pub use scenario::{run_sample_evaluation, Finding, SampleEvaluation};
pub use synth::generate_fairness_data;
