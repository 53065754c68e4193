//! Sequential pipeline execution.

use super::result::{PipelineFailure, PipelineResult};
use super::spec::Pipeline;
use crate::cancellation::CancellationToken;
use crate::client::CompletionClient;
use crate::context::Bindings;
use crate::errors::{PromptflowError, ValidationError};
use crate::events::{NoOpRunObserver, RunObserver};
use crate::template::render;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Executes pipelines against a completion client.
///
/// Stages run strictly in declared order; stage N+1 begins only after stage
/// N's completion call has returned. Each run owns its bindings and result,
/// so a single runner can serve concurrent runs without shared mutable
/// state.
pub struct PipelineRunner {
    client: Arc<dyn CompletionClient>,
    observer: Arc<dyn RunObserver>,
}

impl PipelineRunner {
    /// Creates a runner with no observer.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            observer: Arc::new(NoOpRunObserver),
        }
    }

    /// Sets the observer notified of run progress.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs a pipeline to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineFailure`] carrying the partially populated result
    /// and the typed cause of the first failure. There are no retries.
    pub async fn run(
        &self,
        pipeline: &Pipeline,
        initial: Bindings,
    ) -> Result<PipelineResult, PipelineFailure> {
        self.run_with_cancellation(pipeline, initial, &CancellationToken::new())
            .await
    }

    /// Runs a pipeline under a caller-supplied cancellation token.
    ///
    /// Triggering the token between stages fails the run before the next
    /// stage dispatches; triggering it mid-stage abandons the in-flight
    /// completion call. Either way the partial result is preserved.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineFailure`] carrying the partially populated result
    /// and the typed cause of the first failure.
    pub async fn run_with_cancellation(
        &self,
        pipeline: &Pipeline,
        initial: Bindings,
        token: &CancellationToken,
    ) -> Result<PipelineResult, PipelineFailure> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        let mut result = PipelineResult::new(run_id);
        let mut bindings = initial;

        info!(
            %run_id,
            pipeline = %pipeline.name(),
            stages = pipeline.stage_count(),
            model = %self.client.model(),
            "pipeline run started"
        );

        // Stage ids become binding names when outputs merge; a collision
        // with caller-supplied input must fail before any network call.
        for stage in pipeline.stages() {
            if bindings.contains(stage.id()) {
                let cause = ValidationError::new(format!(
                    "initial input already binds '{}', which is a stage id",
                    stage.id()
                ))
                .with_stages(vec![stage.id().to_string()]);
                return Err(self.fail(result, started, stage.id(), cause.into()));
            }
        }

        for stage in pipeline.stages() {
            if token.is_cancelled() {
                let reason = token.reason().unwrap_or_else(|| "cancelled".to_string());
                self.observer.on_stage_failed(stage.id(), &reason);
                return Err(self.fail(
                    result,
                    started,
                    stage.id(),
                    PromptflowError::cancelled(reason),
                ));
            }

            self.observer.on_stage_started(stage.id());

            let system_instruction = match render(stage.system_instruction(), &bindings) {
                Ok(rendered) => rendered,
                Err(e) => {
                    self.observer.on_stage_failed(stage.id(), &e.to_string());
                    return Err(self.fail(result, started, stage.id(), e.into()));
                }
            };
            let user_message = match render(stage.user_template(), &bindings) {
                Ok(rendered) => rendered,
                Err(e) => {
                    self.observer.on_stage_failed(stage.id(), &e.to_string());
                    return Err(self.fail(result, started, stage.id(), e.into()));
                }
            };

            debug!(%run_id, stage = stage.id(), "dispatching completion request");
            let stage_started = Instant::now();

            let outcome = tokio::select! {
                () = token.cancelled() => {
                    let reason = token.reason().unwrap_or_else(|| "cancelled".to_string());
                    self.observer.on_stage_failed(stage.id(), &reason);
                    return Err(self.fail(
                        result,
                        started,
                        stage.id(),
                        PromptflowError::cancelled(reason),
                    ));
                }
                outcome = self.client.complete(&system_instruction, &user_message) => outcome,
            };

            let text = match outcome {
                Ok(text) => text,
                Err(e) => {
                    self.observer.on_stage_failed(stage.id(), &e.to_string());
                    return Err(self.fail(result, started, stage.id(), e));
                }
            };

            info!(
                %run_id,
                stage = stage.id(),
                duration_ms = stage_started.elapsed().as_secs_f64() * 1000.0,
                chars = text.len(),
                "stage completed"
            );
            self.observer.on_stage_completed(stage.id(), &text);

            // Checked above; kept as a guard so a conflict can never
            // silently overwrite an earlier output.
            if let Err(e) = bindings.insert(stage.id(), text.clone()) {
                return Err(self.fail(result, started, stage.id(), e.into()));
            }
            result.record(stage.id(), text);
        }

        result.set_duration_ms(started.elapsed().as_secs_f64() * 1000.0);
        self.observer
            .on_run_completed(pipeline.final_stage_id(), result.duration_ms);
        info!(%run_id, duration_ms = result.duration_ms, "pipeline run completed");

        Ok(result)
    }

    fn fail(
        &self,
        mut partial: PipelineResult,
        started: Instant,
        failed_stage: &str,
        cause: PromptflowError,
    ) -> PipelineFailure {
        partial.set_duration_ms(started.elapsed().as_secs_f64() * 1000.0);
        info!(
            run_id = %partial.run_id,
            stage = failed_stage,
            error = %cause,
            completed_stages = partial.len(),
            "pipeline run failed"
        );
        PipelineFailure {
            failed_stage: failed_stage.to_string(),
            partial,
            cause,
        }
    }
}
