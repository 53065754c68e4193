//! Pipeline specification, execution, and results.
//!
//! This module provides:
//! - Validated pipeline specifications
//! - The sequential runner with accumulating bindings
//! - Run results that survive failures partially populated

mod result;
mod runner;
mod spec;

pub use result::{PipelineFailure, PipelineResult, StageOutput};
pub use runner::PipelineRunner;
pub use spec::Pipeline;

#[cfg(test)]
mod integration_tests;
