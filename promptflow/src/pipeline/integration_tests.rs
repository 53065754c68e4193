//! End-to-end runner scenarios against the scripted client.

use super::{Pipeline, PipelineRunner};
use crate::cancellation::CancellationToken;
use crate::context::Bindings;
use crate::errors::{MissingBindingError, PromptflowError, TransportError};
use crate::events::{CollectingRunObserver, RunObserver};
use crate::stage::StageDefinition;
use crate::testing::ScriptedClient;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn refinement_pipeline() -> Pipeline {
    Pipeline::new(
        "prompt-refinement",
        vec![
            StageDefinition::new("stage1", "S1", "Improve: {user_prompt}"),
            StageDefinition::new("stage2", "S2", "Optimize: {stage1}"),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn two_stage_run_chains_outputs() {
    // Scenario A: stage 2's template embeds stage 1's full output.
    let client = Arc::new(
        ScriptedClient::new()
            .with_text("STRUCTURED")
            .with_text("FINAL"),
    );
    let runner = PipelineRunner::new(client.clone());

    let result = runner
        .run(
            &refinement_pipeline(),
            Bindings::from_pairs([("user_prompt", "hello")]),
        )
        .await
        .unwrap();

    assert_eq!(result.get("stage1"), Some("STRUCTURED"));
    assert_eq!(result.get("stage2"), Some("FINAL"));
    assert_eq!(result.final_output(), Some("FINAL"));

    let calls = client.recorded_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].system_instruction, "S1");
    assert_eq!(calls[0].user_message, "Improve: hello");
    assert_eq!(calls[1].user_message, "Optimize: STRUCTURED");
}

#[tokio::test]
async fn stage_order_is_declared_order() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_text("one")
            .with_text("two")
            .with_text("three"),
    );
    let runner = PipelineRunner::new(client);

    let pipeline = Pipeline::new(
        "three-stage",
        vec![
            StageDefinition::new("alpha", "s", "{seed}"),
            StageDefinition::new("beta", "s", "{alpha}"),
            StageDefinition::new("gamma", "s", "{beta}"),
        ],
    )
    .unwrap();

    let result = runner
        .run(&pipeline, Bindings::from_pairs([("seed", "x")]))
        .await
        .unwrap();

    assert_eq!(result.stage_ids(), vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn transport_failure_on_stage_two_preserves_stage_one() {
    // Scenario B: the partial result contains exactly stage 1's output.
    let client = Arc::new(
        ScriptedClient::new()
            .with_text("STRUCTURED")
            .with_failure(TransportError::http(503, "overloaded")),
    );
    let runner = PipelineRunner::new(client);

    let failure = runner
        .run(
            &refinement_pipeline(),
            Bindings::from_pairs([("user_prompt", "hello")]),
        )
        .await
        .unwrap_err();

    assert_eq!(failure.failed_stage, "stage2");
    assert_eq!(failure.partial.stage_ids(), vec!["stage1"]);
    assert_eq!(failure.partial.get("stage1"), Some("STRUCTURED"));
    assert_eq!(failure.partial.get("stage2"), None);

    match &failure.cause {
        PromptflowError::Transport(e) => {
            assert_eq!(e.status, Some(503));
            assert!(e.body.contains("overloaded"));
        }
        other => panic!("expected transport cause, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_binding_fails_before_any_network_call() {
    // Scenario C: {missing} has no binding; no completion call happens.
    let client = Arc::new(ScriptedClient::new().with_text("never used"));
    let runner = PipelineRunner::new(client.clone());

    let pipeline = Pipeline::new(
        "broken",
        vec![StageDefinition::new("stage1", "s", "echo {missing}")],
    )
    .unwrap();

    let failure = runner.run(&pipeline, Bindings::new()).await.unwrap_err();

    assert!(matches!(
        failure.cause,
        PromptflowError::MissingBinding(MissingBindingError { ref key }) if key == "missing"
    ));
    assert!(failure.partial.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn moderation_shape_is_an_ordinary_two_stage_pipeline() {
    // The create-then-moderate shape needs no special runner logic.
    let client = Arc::new(
        ScriptedClient::new()
            .with_text("a generated post")
            .with_text("a generated post"),
    );
    let runner = PipelineRunner::new(client);

    let pipeline = Pipeline::new(
        "social-content",
        vec![
            StageDefinition::new("content", "creator", "Post about {topic} on {platform}"),
            StageDefinition::new("moderation", "moderator", "Review:\n\n{content}"),
        ],
    )
    .unwrap();

    let result = runner
        .run(
            &pipeline,
            Bindings::from_pairs([("topic", "rust"), ("platform", "LinkedIn")]),
        )
        .await
        .unwrap();

    // The moderator returned the text unchanged.
    assert_eq!(result.get("content"), result.get("moderation"));
    assert_eq!(result.final_output(), Some("a generated post"));
}

#[tokio::test]
async fn pre_cancelled_token_aborts_with_empty_partial() {
    let client = Arc::new(ScriptedClient::new().with_text("never used"));
    let runner = PipelineRunner::new(client.clone());

    let token = CancellationToken::new();
    token.cancel("caller gave up");

    let failure = runner
        .run_with_cancellation(
            &refinement_pipeline(),
            Bindings::from_pairs([("user_prompt", "hello")]),
            &token,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        failure.cause,
        PromptflowError::Cancelled(ref reason) if reason == "caller gave up"
    ));
    assert!(failure.partial.is_empty());
    assert_eq!(client.call_count(), 0);
}

/// Completes the first call immediately, then hangs until cancelled.
#[derive(Debug, Default)]
struct HangingSecondCallClient {
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait::async_trait]
impl crate::client::CompletionClient for HangingSecondCallClient {
    async fn complete(
        &self,
        _system_instruction: &str,
        _user_message: &str,
    ) -> Result<String, PromptflowError> {
        let call = self
            .calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if call == 0 {
            return Ok("STRUCTURED".to_string());
        }
        tokio::time::sleep(std::time::Duration::from_secs(600)).await;
        Ok("never returned".to_string())
    }

    fn model(&self) -> &str {
        "hanging"
    }
}

#[tokio::test]
async fn mid_stage_cancellation_abandons_in_flight_call() {
    let runner = PipelineRunner::new(Arc::new(HangingSecondCallClient::default()));
    let token = Arc::new(CancellationToken::new());

    {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            token.cancel("operator interrupt");
        });
    }

    let failure = runner
        .run_with_cancellation(
            &refinement_pipeline(),
            Bindings::from_pairs([("user_prompt", "hello")]),
            &token,
        )
        .await
        .unwrap_err();

    // Stage 1 completed before the cancel; its output survives intact.
    assert_eq!(failure.failed_stage, "stage2");
    assert_eq!(failure.partial.stage_ids(), vec!["stage1"]);
    assert!(matches!(
        failure.cause,
        PromptflowError::Cancelled(ref reason) if reason == "operator interrupt"
    ));
}

#[tokio::test]
async fn observer_sees_progress_in_order() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_text("STRUCTURED")
            .with_text("FINAL"),
    );
    let observer = Arc::new(CollectingRunObserver::new());
    let runner = PipelineRunner::new(client)
        .with_observer(observer.clone() as Arc<dyn RunObserver>);

    runner
        .run(
            &refinement_pipeline(),
            Bindings::from_pairs([("user_prompt", "hello")]),
        )
        .await
        .unwrap();

    assert_eq!(
        observer.events(),
        vec![
            "started:stage1".to_string(),
            "completed:stage1".to_string(),
            "started:stage2".to_string(),
            "completed:stage2".to_string(),
            "run:stage2".to_string(),
        ]
    );
}

#[tokio::test]
async fn observer_sees_failure() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_text("STRUCTURED")
            .with_failure(TransportError::network("timed out")),
    );
    let observer = Arc::new(CollectingRunObserver::new());
    let runner = PipelineRunner::new(client)
        .with_observer(observer.clone() as Arc<dyn RunObserver>);

    let _ = runner
        .run(
            &refinement_pipeline(),
            Bindings::from_pairs([("user_prompt", "hello")]),
        )
        .await
        .unwrap_err();

    assert_eq!(
        observer.events(),
        vec![
            "started:stage1".to_string(),
            "completed:stage1".to_string(),
            "started:stage2".to_string(),
            "failed:stage2".to_string(),
        ]
    );
}

#[tokio::test]
async fn initial_input_colliding_with_stage_id_fails_preflight() {
    let client = Arc::new(ScriptedClient::new().with_text("never used"));
    let runner = PipelineRunner::new(client.clone());

    let failure = runner
        .run(
            &refinement_pipeline(),
            Bindings::from_pairs([("user_prompt", "hello"), ("stage2", "poisoned")]),
        )
        .await
        .unwrap_err();

    assert!(matches!(failure.cause, PromptflowError::Validation(_)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn concurrent_runs_do_not_share_state() {
    let pipeline = Arc::new(refinement_pipeline());

    let run = |seed: &'static str, a: &'static str, b: &'static str| {
        let pipeline = pipeline.clone();
        async move {
            let client = Arc::new(ScriptedClient::new().with_text(a).with_text(b));
            let runner = PipelineRunner::new(client);
            runner
                .run(&pipeline, Bindings::from_pairs([("user_prompt", seed)]))
                .await
        }
    };

    let (left, right) = tokio::join!(run("one", "L1", "L2"), run("two", "R1", "R2"));

    let left = left.unwrap();
    let right = right.unwrap();
    assert_eq!(left.final_output(), Some("L2"));
    assert_eq!(right.final_output(), Some("R2"));
    assert_ne!(left.run_id, right.run_id);
}
