//! # Promptflow
//!
//! Sequential prompt-refinement pipelines over chat-completion APIs.
//!
//! Promptflow runs an ordered list of declarative stages. Each stage renders
//! a system instruction and a user instruction template against the run's
//! accumulated bindings, sends them as a single chat-completion request, and
//! merges the generated text back into the bindings under the stage id for
//! later stages to reference:
//!
//! - **Stage definitions**: instruction text plus `{name}` placeholders,
//!   nothing else varies between stages
//! - **Context passing**: every stage output becomes a binding for the
//!   stages after it
//! - **Typed failures**: auth, transport, malformed response, missing
//!   binding, cancellation - no retries, partial results preserved
//! - **Cancellation handling**: a cooperative token that aborts in-flight
//!   completion calls
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use promptflow::prelude::*;
//! use std::sync::Arc;
//!
//! let client = Arc::new(HttpCompletionClient::from_env()?);
//! let runner = PipelineRunner::new(client);
//!
//! let result = runner
//!     .run(
//!         &presets::prompt_refinement(),
//!         Bindings::from_pairs([
//!             ("user_prompt", "write a haiku about borrow checking"),
//!             ("target_model", "llama-3.1-8b-instant"),
//!         ]),
//!     )
//!     .await?;
//!
//! println!("{}", result.final_output().unwrap_or_default());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod client;
pub mod context;
pub mod errors;
pub mod events;
pub mod pipeline;
pub mod presets;
pub mod stage;
pub mod template;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::client::{
        CompletionClient, CompletionConfig, HttpCompletionClient,
    };
    pub use crate::context::Bindings;
    pub use crate::errors::{
        AuthError, MalformedResponseError, MissingBindingError, PromptflowError,
        TransportError, ValidationError,
    };
    pub use crate::events::{
        CollectingRunObserver, LoggingRunObserver, NoOpRunObserver, RunObserver,
    };
    pub use crate::pipeline::{
        Pipeline, PipelineFailure, PipelineResult, PipelineRunner, StageOutput,
    };
    pub use crate::presets;
    pub use crate::stage::StageDefinition;
    pub use crate::template::{placeholders, render};
}

#[cfg(test)]
mod tests {
    #[test]
    fn library_compiles() {
        assert!(true);
    }
}
