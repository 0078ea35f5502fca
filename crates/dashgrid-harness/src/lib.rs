#![forbid(unsafe_code)]

//! The `dashgrid` command-line tool.
//!
//! Three subcommands sit on top of `dashgrid-layout`:
//!
//! - `place`: add components with first-fit and print the document.
//! - `validate`: parse a layout document and check its geometry.
//! - `replay`: run a scripted interaction [`trace`] against the engine.
//!
//! Errors map to exit codes through [`HarnessError::exit_code`]: 1 for I/O
//! and malformed JSON, 2 for inputs that parsed but were rejected.

pub mod cli;
pub mod error;
pub mod trace;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{HarnessError, Result};
pub use trace::{ReplayReport, StepOutcome, StepRecord, Trace, TraceStep, replay};
