//! Generation orchestration against mock clients.

mod common;

use common::{MockClient, PANIC_MARKER, SLOW_MARKER};
use promptcanvas_coordinator::{
    CoordinatorConfig, GenerationOutcome, StackCoordinator, ValidationFailure,
};
use promptcanvas_core::{CardId, CardKind, Position, StackId};
use promptcanvas_error::ClientErrorKind;
use std::time::Duration;

/// Adds a stack whose only prompt card holds `prompt`.
async fn stack_with_prompt(coordinator: &StackCoordinator<MockClient>, prompt: &str) -> StackId {
    let stack = coordinator.add_stack(Position::default()).await;
    let card = coordinator.stack(stack).await.unwrap().cards()[0].id();
    coordinator.set_prompt_text(stack, card, prompt).await;
    stack
}

async fn first_card(coordinator: &StackCoordinator<MockClient>, stack: StackId) -> CardId {
    coordinator.stack(stack).await.unwrap().cards()[0].id()
}

async fn response_text(coordinator: &StackCoordinator<MockClient>, stack: StackId) -> Option<String> {
    coordinator
        .stack(stack)
        .await?
        .response_card()
        .map(|response| response.text().clone())
}

async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_muted_prompt_excluded_and_response_stored() {
    let coordinator =
        StackCoordinator::new(MockClient::replying("I am a model."), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, "Who are you?").await;
    let muted = coordinator.add_prompt_card(stack).await.unwrap();
    coordinator.set_prompt_text(stack, muted, "ignored").await;
    coordinator.toggle_mute(stack, muted).await;

    let outcome = coordinator.generate_response(stack).await;

    assert!(outcome.is_completed());
    assert_eq!(coordinator.client().prompts(), vec!["Who are you?".to_string()]);
    let snapshot = coordinator.stack(stack).await.unwrap();
    let response = snapshot.response_card().unwrap();
    assert_eq!(response.text(), "I am a model.");
    assert!(response.generation_time().is_some());
    assert!(response.timestamp().is_some());
}

#[tokio::test]
async fn test_missing_host_never_calls_client() {
    let coordinator = StackCoordinator::new(MockClient::replying("x"), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, "Who are you?").await;
    coordinator.set_llm_config(stack, "", "llama3").await;

    let outcome = coordinator.generate_response(stack).await;

    assert_eq!(outcome, GenerationOutcome::Invalid(ValidationFailure::MissingHost));
    assert!(response_text(&coordinator, stack).await.unwrap().contains("host"));
    assert_eq!(coordinator.client().probe_count(), 0);
    assert_eq!(coordinator.client().generate_count(), 0);
}

#[tokio::test]
async fn test_blank_model_and_prompt_are_invalid() {
    let coordinator = StackCoordinator::new(MockClient::replying("x"), CoordinatorConfig::default());
    let no_model = stack_with_prompt(&coordinator, "hi").await;
    coordinator.set_llm_config(no_model, "localhost:11434", "   ").await;
    let no_prompt = stack_with_prompt(&coordinator, "  \n ").await;

    assert_eq!(
        coordinator.generate_response(no_model).await,
        GenerationOutcome::Invalid(ValidationFailure::MissingModel)
    );
    assert_eq!(
        coordinator.generate_response(no_prompt).await,
        GenerationOutcome::Invalid(ValidationFailure::EmptyPrompt)
    );
    assert!(response_text(&coordinator, no_model).await.unwrap().contains("model"));
    assert!(response_text(&coordinator, no_prompt).await.unwrap().contains("prompt"));
    assert_eq!(coordinator.client().probe_count(), 0);
}

#[tokio::test]
async fn test_unreachable_server_skips_generate() {
    let coordinator = StackCoordinator::new(MockClient::unreachable(), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, "hello").await;

    let outcome = coordinator.generate_response(stack).await;

    assert!(matches!(outcome, GenerationOutcome::Unreachable { ref host } if host == "http://localhost:11434"));
    assert_eq!(coordinator.client().probe_count(), 1);
    assert_eq!(coordinator.client().generate_count(), 0);
    let text = response_text(&coordinator, stack).await.unwrap();
    assert!(text.contains("running and accessible"));
}

#[tokio::test]
async fn test_client_error_becomes_error_text() {
    let kind = ClientErrorKind::HttpStatus {
        status_code: 404,
        message: "model not found".to_string(),
    };
    let coordinator =
        StackCoordinator::new(MockClient::failing(kind.clone()), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, "hello").await;

    let outcome = coordinator.generate_response(stack).await;

    assert_eq!(outcome, GenerationOutcome::Failed(kind));
    let snapshot = coordinator.stack(stack).await.unwrap();
    let response = snapshot.response_card().unwrap();
    assert_eq!(response.text(), "Error: HTTP 404: model not found");
    assert!(response.generation_time().is_none());
}

#[tokio::test]
async fn test_exactly_one_response_card_after_attempts() {
    let coordinator = StackCoordinator::new(MockClient::replying("answer"), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, "hello").await;

    coordinator.generate_response(stack).await;
    let first_id = *coordinator
        .stack(stack)
        .await
        .unwrap()
        .response_card()
        .unwrap()
        .id();
    coordinator.set_llm_config(stack, "", "llama3").await;
    coordinator.generate_response(stack).await;
    coordinator.set_llm_config(stack, "localhost:11434", "llama3").await;
    coordinator.generate_response(stack).await;

    let snapshot = coordinator.stack(stack).await.unwrap();
    assert_eq!(snapshot.count_of(CardKind::Response), 1);
    let response = snapshot.response_card().unwrap();
    assert_eq!(*response.id(), first_id);
    assert_eq!(response.text(), "answer");
}

#[tokio::test]
async fn test_missing_stack_outcome() {
    let coordinator = StackCoordinator::new(MockClient::replying("x"), CoordinatorConfig::default());
    assert_eq!(
        coordinator.generate_response(StackId::new()).await,
        GenerationOutcome::StackMissing
    );
}

#[tokio::test]
async fn test_generate_all_runs_stacks_independently() -> anyhow::Result<()> {
    let coordinator = StackCoordinator::new(MockClient::replying("done"), CoordinatorConfig::default());
    let slow = stack_with_prompt(&coordinator, &format!("take your time {SLOW_MARKER}")).await;
    let fast = stack_with_prompt(&coordinator, "be quick").await;
    let invalid = stack_with_prompt(&coordinator, "no host").await;
    coordinator.set_llm_config(invalid, " ", "llama3").await;

    let batch = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.generate_all().await }
    });

    // The fast stack finishes while the slow one is still waiting
    let shared = &coordinator;
    wait_until(|| async move { response_text(shared, fast).await.is_some() }).await;
    wait_until(|| async move { !shared.is_generating(fast).await }).await;
    wait_until(|| async move { shared.client().generate_count() == 2 }).await;
    assert!(!batch.is_finished());
    assert!(coordinator.batch_progress().await.is_generating);
    assert!(coordinator.is_generating(slow).await);
    assert_eq!(response_text(&coordinator, slow).await, None);

    coordinator.client().gate.notify_one();
    let outcomes = batch.await?;

    assert_eq!(outcomes.len(), 3);
    for (id, outcome) in &outcomes {
        if *id == invalid {
            assert_eq!(*outcome, GenerationOutcome::Invalid(ValidationFailure::MissingHost));
        } else {
            assert!(outcome.is_completed());
        }
    }
    assert_eq!(response_text(&coordinator, slow).await.as_deref(), Some("done"));

    let progress = coordinator.batch_progress().await;
    assert!(!progress.is_generating);
    assert!(progress.elapsed > Duration::ZERO);
    assert!(!coordinator.is_generating(slow).await);
    Ok(())
}

#[tokio::test]
async fn test_generate_all_on_empty_board() {
    let coordinator = StackCoordinator::new(MockClient::replying("x"), CoordinatorConfig::default());
    assert!(coordinator.generate_all().await.is_empty());
    assert!(!coordinator.batch_progress().await.is_generating);
}

#[tokio::test]
async fn test_stack_removed_mid_generation() -> anyhow::Result<()> {
    let coordinator = StackCoordinator::new(MockClient::replying("late"), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, SLOW_MARKER).await;
    let other = stack_with_prompt(&coordinator, "untouched").await;

    let pending = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.generate_response(stack).await }
    });
    let shared = &coordinator;
    wait_until(|| async move { shared.client().generate_count() == 1 }).await;

    // Edits proceed while the request is in flight
    assert!(coordinator.remove_stack(stack).await.is_some());
    coordinator.toggle_spread(other).await;
    coordinator.client().gate.notify_one();

    assert_eq!(pending.await?, GenerationOutcome::StackMissing);
    assert!(!coordinator.is_generating(stack).await);
    let stacks = coordinator.stacks().await;
    assert_eq!(stacks.len(), 1);
    assert!(*stacks[0].is_spread_out());
    assert!(stacks[0].response_card().is_none());
    Ok(())
}

#[tokio::test]
async fn test_failed_answer_for_removed_stack_is_missing() -> anyhow::Result<()> {
    let kind = ClientErrorKind::Network("connection reset".to_string());
    let coordinator = StackCoordinator::new(MockClient::failing(kind), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, SLOW_MARKER).await;

    let pending = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.generate_response(stack).await }
    });
    let shared = &coordinator;
    wait_until(|| async move { shared.client().generate_count() == 1 }).await;
    coordinator.remove_stack(stack).await;
    coordinator.client().gate.notify_one();

    assert_eq!(pending.await?, GenerationOutcome::StackMissing);
    assert!(coordinator.stacks().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_aborted_generation_clears_busy_mark() {
    let coordinator = StackCoordinator::new(MockClient::replying("late"), CoordinatorConfig::default());
    let stack = stack_with_prompt(&coordinator, SLOW_MARKER).await;

    let pending = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.generate_response(stack).await }
    });
    let shared = &coordinator;
    wait_until(|| async move { shared.client().generate_count() == 1 }).await;
    assert!(coordinator.is_generating(stack).await);

    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());

    assert!(!coordinator.is_generating(stack).await);
    assert_eq!(response_text(&coordinator, stack).await, None);
}

#[tokio::test]
async fn test_aborted_batch_returns_to_idle() -> anyhow::Result<()> {
    let coordinator = StackCoordinator::new(MockClient::replying("done"), CoordinatorConfig::default());
    let slow = stack_with_prompt(&coordinator, SLOW_MARKER).await;

    let batch = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.generate_all().await }
    });
    let shared = &coordinator;
    wait_until(|| async move { shared.client().generate_count() == 1 }).await;
    assert!(coordinator.batch_progress().await.is_generating);
    assert!(coordinator.is_generating(slow).await);

    batch.abort();
    assert!(batch.await.unwrap_err().is_cancelled());

    assert!(!coordinator.batch_progress().await.is_generating);
    // The stack's own task is aborted when the batch drops its task set
    wait_until(|| async move { !shared.is_generating(slow).await }).await;

    // A later batch starts and stops the clock normally
    coordinator.set_prompt_text(slow, first_card(&coordinator, slow).await, "quick").await;
    let outcomes = coordinator.generate_all().await;
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].1.is_completed());
    assert!(!coordinator.batch_progress().await.is_generating);
    assert!(!coordinator.is_generating(slow).await);
    Ok(())
}

#[tokio::test]
async fn test_panicking_client_leaves_batch_idle() {
    let coordinator = StackCoordinator::new(MockClient::replying("fine"), CoordinatorConfig::default());
    let broken = stack_with_prompt(&coordinator, PANIC_MARKER).await;
    let healthy = stack_with_prompt(&coordinator, "hello").await;

    let outcomes = coordinator.generate_all().await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].0, healthy);
    assert!(outcomes[0].1.is_completed());
    assert!(!coordinator.batch_progress().await.is_generating);
    assert!(!coordinator.is_generating(broken).await);
    assert!(!coordinator.is_generating(healthy).await);
    assert_eq!(response_text(&coordinator, broken).await, None);
    assert_eq!(response_text(&coordinator, healthy).await.as_deref(), Some("fine"));
}
