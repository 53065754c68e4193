//! Pipeline run results.

use crate::errors::PromptflowError;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The output of one completed stage.
///
/// Written once when the stage completes, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutput {
    /// The id of the stage that produced this output.
    pub stage_id: String,
    /// The raw generated text.
    pub text: String,
}

/// The outputs of a pipeline run, in declared stage order.
///
/// Created empty at run start and populated incrementally; on failure the
/// partially populated result travels inside [`PipelineFailure`] so the
/// outputs of stages that succeeded stay accessible for debugging.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// The unique id of this run.
    pub run_id: Uuid,
    /// Per-stage outputs, in execution order.
    outputs: Vec<StageOutput>,
    /// Total run time in milliseconds.
    pub duration_ms: f64,
}

impl PipelineResult {
    /// Creates an empty result for a new run.
    #[must_use]
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            outputs: Vec::new(),
            duration_ms: 0.0,
        }
    }

    /// Records a completed stage's output. Outputs arrive in execution
    /// order and are never overwritten.
    pub(crate) fn record(&mut self, stage_id: impl Into<String>, text: impl Into<String>) {
        self.outputs.push(StageOutput {
            stage_id: stage_id.into(),
            text: text.into(),
        });
    }

    pub(crate) fn set_duration_ms(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
    }

    /// Gets the output text of a stage by id.
    #[must_use]
    pub fn get(&self, stage_id: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|o| o.stage_id == stage_id)
            .map(|o| o.text.as_str())
    }

    /// Returns the recorded outputs, in execution order.
    #[must_use]
    pub fn outputs(&self) -> &[StageOutput] {
        &self.outputs
    }

    /// Returns the stage ids, in execution order.
    #[must_use]
    pub fn stage_ids(&self) -> Vec<&str> {
        self.outputs.iter().map(|o| o.stage_id.as_str()).collect()
    }

    /// Returns the last completed stage's output - the externally surfaced
    /// "final" answer once every stage has run.
    #[must_use]
    pub fn final_output(&self) -> Option<&str> {
        self.outputs.last().map(|o| o.text.as_str())
    }

    /// Returns the id of the last completed stage.
    #[must_use]
    pub fn final_stage_id(&self) -> Option<&str> {
        self.outputs.last().map(|o| o.stage_id.as_str())
    }

    /// Returns the number of completed stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns true if no stage has completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// A failed pipeline run: the typed cause plus whatever the run produced
/// before failing.
#[derive(Debug, Error)]
#[error("pipeline run failed at stage '{failed_stage}': {cause}")]
pub struct PipelineFailure {
    /// The id of the stage that was executing (or about to execute) when
    /// the run aborted.
    pub failed_stage: String,
    /// Outputs of the stages that completed before the failure.
    pub partial: PipelineResult,
    /// The triggering failure, propagated without wrapping.
    #[source]
    pub cause: PromptflowError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportError;

    #[test]
    fn test_result_records_in_order() {
        let mut result = PipelineResult::new(Uuid::new_v4());
        result.record("structure", "STRUCTURED");
        result.record("optimize", "FINAL");

        assert_eq!(result.stage_ids(), vec!["structure", "optimize"]);
        assert_eq!(result.get("structure"), Some("STRUCTURED"));
        assert_eq!(result.get("optimize"), Some("FINAL"));
        assert_eq!(result.final_output(), Some("FINAL"));
        assert_eq!(result.final_stage_id(), Some("optimize"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_empty_result_has_no_final_output() {
        let result = PipelineResult::new(Uuid::new_v4());
        assert!(result.is_empty());
        assert_eq!(result.final_output(), None);
        assert_eq!(result.get("anything"), None);
    }

    #[test]
    fn test_failure_carries_partial_and_cause() {
        let mut partial = PipelineResult::new(Uuid::new_v4());
        partial.record("structure", "STRUCTURED");

        let failure = PipelineFailure {
            failed_stage: "optimize".to_string(),
            partial,
            cause: TransportError::http(500, "boom").into(),
        };

        assert_eq!(failure.partial.get("structure"), Some("STRUCTURED"));
        assert!(matches!(failure.cause, PromptflowError::Transport(_)));
        assert!(failure.to_string().contains("optimize"));
    }

    #[test]
    fn test_result_serializes_for_adapters() {
        let mut result = PipelineResult::new(Uuid::new_v4());
        result.record("content", "a post");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outputs"][0]["stage_id"], "content");
        assert_eq!(json["outputs"][0]["text"], "a post");
    }
}
