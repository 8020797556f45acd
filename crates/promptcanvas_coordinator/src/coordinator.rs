//! Shared, cloneable front end to the stack board.

use crate::{
    BatchProgress, CoordinatorConfig, GenerationOutcome, GenerationTracker, StackBoard,
    elapsed_millis, unreachable_message,
};
use chrono::Utc;
use promptcanvas_core::{Card, CardId, Position, Stack, StackId};
use promptcanvas_error::BoardError;
use promptcanvas_interface::GenerationClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Owns every stack and drives generation against a [`GenerationClient`].
///
/// Clones share the same board and client. Mutations are short synchronous
/// sections under a write lock; the lock is released before any call to the
/// client, so editing one stack while others generate never waits on the
/// network.
///
/// Busy state lives beside the board in drop-released marks.
///
/// Structural operations come in two flavors. The plain ones ignore stale
/// ids and out-of-range indices; the `try_*` ones return the [`BoardError`].
pub struct StackCoordinator<C: GenerationClient> {
    board: Arc<RwLock<StackBoard>>,
    tracker: GenerationTracker,
    client: Arc<C>,
}

impl<C: GenerationClient> Clone for StackCoordinator<C> {
    fn clone(&self) -> Self {
        Self {
            board: Arc::clone(&self.board),
            tracker: self.tracker.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: GenerationClient + 'static> StackCoordinator<C> {
    /// Creates a coordinator with an empty board.
    pub fn new(client: C, config: CoordinatorConfig) -> Self {
        Self::with_shared_client(Arc::new(client), config)
    }

    /// Creates a coordinator around a client that is shared elsewhere too.
    pub fn with_shared_client(client: Arc<C>, config: CoordinatorConfig) -> Self {
        info!(provider = client.provider_name(), "Creating stack coordinator");
        Self {
            board: Arc::new(RwLock::new(StackBoard::new(config))),
            tracker: GenerationTracker::default(),
            client,
        }
    }

    /// The generation client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Copy of every stack in creation order.
    pub async fn stacks(&self) -> Vec<Stack> {
        self.board.read().await.stacks().to_vec()
    }

    /// Copy of one stack.
    pub async fn stack(&self, id: StackId) -> Option<Stack> {
        self.board.read().await.stack(id).cloned()
    }

    /// Adds a stack holding one prompt card and one LLM card.
    pub async fn add_stack(&self, position: Position) -> StackId {
        self.board.write().await.add_stack(position)
    }

    /// Removes a stack. Generations already running for it end as
    /// [`GenerationOutcome::StackMissing`].
    pub async fn remove_stack(&self, stack: StackId) -> Option<Stack> {
        lenient(self.board.write().await.remove_stack(stack))
    }

    /// Moves a stack's anchor.
    pub async fn move_stack(&self, stack: StackId, position: Position) {
        lenient(self.board.write().await.move_stack(stack, position));
    }

    /// Inserts a prompt card after the stack's last prompt card.
    pub async fn add_prompt_card(&self, stack: StackId) -> Option<CardId> {
        lenient(self.board.write().await.add_prompt_card(stack))
    }

    /// Removes a card. Unknown ids are ignored.
    pub async fn remove_card(&self, stack: StackId, card: CardId) {
        lenient(self.try_remove_card(stack, card).await);
    }

    /// Removes a card and returns it.
    pub async fn try_remove_card(&self, stack: StackId, card: CardId) -> Result<Card, BoardError> {
        self.board.write().await.remove_card(stack, card)
    }

    /// Replaces the card with the same id. Unknown ids are ignored.
    pub async fn update_card(&self, stack: StackId, card: Card) {
        lenient(self.try_update_card(stack, card).await);
    }

    /// Replaces the card with the same id, which must have the same kind.
    pub async fn try_update_card(&self, stack: StackId, card: Card) -> Result<(), BoardError> {
        self.board.write().await.update_card(stack, card)
    }

    /// Moves a card within its stack. Out-of-range indices are ignored.
    pub async fn reorder_cards(&self, stack: StackId, from: usize, to: usize) {
        lenient(self.try_reorder_cards(stack, from, to).await);
    }

    /// Moves a card within its stack.
    pub async fn try_reorder_cards(
        &self,
        stack: StackId,
        from: usize,
        to: usize,
    ) -> Result<(), BoardError> {
        self.board.write().await.reorder_cards(stack, from, to)
    }

    /// Flips whether the stack is fanned out.
    pub async fn toggle_spread(&self, stack: StackId) {
        lenient(self.board.write().await.toggle_spread(stack));
    }

    /// Flips a prompt card's mute flag.
    pub async fn toggle_mute(&self, stack: StackId, card: CardId) {
        lenient(self.board.write().await.toggle_mute(stack, card));
    }

    /// Edits a prompt card's text.
    pub async fn set_prompt_text(&self, stack: StackId, card: CardId, text: impl Into<String>) {
        lenient(self.board.write().await.set_prompt_text(stack, card, text));
    }

    /// Edits the LLM card's host and model.
    pub async fn set_llm_config(
        &self,
        stack: StackId,
        host: impl Into<String>,
        model: impl Into<String>,
    ) {
        lenient(self.board.write().await.set_llm_config(stack, host, model));
    }

    /// Edits the Response card's text.
    pub async fn set_response_text(&self, stack: StackId, text: impl Into<String>) {
        lenient(self.board.write().await.set_response_text(stack, text));
    }

    /// Adds a comparison stack next to `original`.
    pub async fn create_comparison_stack(&self, original: StackId) -> Option<StackId> {
        lenient(self.board.write().await.create_comparison_stack(original))
    }

    /// Whether `card` belongs to the original `stack` was created from.
    pub async fn is_linked(&self, stack: StackId, card: CardId) -> bool {
        self.board.read().await.is_linked(stack, card)
    }

    /// Whether a generation for `stack` is in flight.
    pub async fn is_generating(&self, stack: StackId) -> bool {
        self.tracker.is_generating(stack)
    }

    /// Aggregate busy flag and elapsed time of the all-stacks run.
    pub async fn batch_progress(&self) -> BatchProgress {
        self.tracker.batch_progress()
    }

    /// Runs one generation attempt for `stack`.
    ///
    /// Validation, reachability and client failures end up as text in the
    /// stack's Response card; the returned outcome says which one happened.
    /// The stack counts as generating until the attempt ends or its future is
    /// dropped.
    #[instrument(skip(self), fields(provider = self.client.provider_name()))]
    pub async fn generate_response(&self, stack: StackId) -> GenerationOutcome {
        let started = Instant::now();
        let (inputs, _mark) = {
            let board = self.board.read().await;
            let Some(inputs) = board.generation_inputs(stack) else {
                debug!("Stack not found, nothing to generate");
                return GenerationOutcome::StackMissing;
            };
            (inputs, self.tracker.mark_stack(stack))
        };

        match inputs.validate() {
            Err(failure) => {
                debug!(%failure, "Generation inputs invalid");
                self.settle(stack, failure.to_string(), None, GenerationOutcome::Invalid(failure))
                    .await
            }
            Ok(()) => self.request(stack, inputs.host, inputs.model, inputs.prompt, started).await,
        }
    }

    async fn request(
        &self,
        stack: StackId,
        host: String,
        model: String,
        prompt: String,
        started: Instant,
    ) -> GenerationOutcome {
        if !self.client.probe(&host).await {
            warn!(host = %host, "Server unreachable");
            let text = unreachable_message(&host);
            return self
                .settle(stack, text, None, GenerationOutcome::Unreachable { host })
                .await;
        }

        match self.client.generate(&host, &model, &prompt).await {
            Ok(text) => {
                let elapsed = started.elapsed();
                info!(
                    elapsed_ms = elapsed_millis(elapsed),
                    response_len = text.len(),
                    "Generation completed"
                );
                self.settle(stack, text, Some(elapsed), GenerationOutcome::Completed { elapsed })
                    .await
            }
            Err(e) => {
                error!(error = %e, "Generation failed");
                let text = format!("Error: {}", e.kind);
                self.settle(stack, text, None, GenerationOutcome::Failed(e.kind))
                    .await
            }
        }
    }

    /// Writes `text` into the Response card and returns `outcome`, or
    /// [`GenerationOutcome::StackMissing`] if the stack is gone by now.
    async fn settle(
        &self,
        stack: StackId,
        text: String,
        elapsed: Option<Duration>,
        outcome: GenerationOutcome,
    ) -> GenerationOutcome {
        let timestamp = elapsed.map(|_| Utc::now());
        let written = self
            .board
            .write()
            .await
            .write_response(stack, text, elapsed, timestamp);
        match written {
            Some(_) => outcome,
            None => {
                debug!(discarded = ?outcome, "Stack removed while generating");
                GenerationOutcome::StackMissing
            }
        }
    }

    /// Generates every stack concurrently and waits for all of them.
    ///
    /// Each stack runs in its own task, so a slow or unreachable server only
    /// delays its own stack. Outcomes arrive in completion order; a task that
    /// panics is logged and left out. Dropping the returned future aborts the
    /// remaining tasks and stops the batch clock.
    #[instrument(skip(self))]
    pub async fn generate_all(&self) -> Vec<(StackId, GenerationOutcome)> {
        let batch = self.tracker.mark_batch();
        let ids = self.board.read().await.stack_ids();
        info!(stacks = ids.len(), "Starting batch generation");

        let mut tasks = JoinSet::new();
        for id in ids {
            let coordinator = self.clone();
            tasks.spawn(async move { (id, coordinator.generate_response(id).await) });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(error = %e, "Generation task failed"),
            }
        }

        if let Some(elapsed) = batch.finish() {
            info!(
                elapsed_ms = elapsed_millis(elapsed),
                completed = outcomes.iter().filter(|(_, o)| o.is_completed()).count(),
                "Batch generation finished"
            );
        }
        outcomes
    }
}

fn lenient<T>(result: Result<T, BoardError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => {
            debug!(error = %e, "Ignoring stale id");
            None
        }
        Err(e) => {
            warn!(error = %e, "Ignoring rejected board operation");
            None
        }
    }
}
