//! In-memory stack state owned by the coordinator.

use crate::{CoordinatorConfig, ValidationFailure};
use chrono::{DateTime, Utc};
use promptcanvas_core::{
    Card, CardId, CardKind, LlmCard, Position, PromptCard, Stack, StackId,
};
use promptcanvas_error::{BoardError, BoardErrorKind};
use std::time::Duration;
use tracing::debug;

/// Every stack on the canvas.
///
/// All methods are synchronous. [`crate::StackCoordinator`] wraps a board in a
/// lock and never holds that lock across a network call.
#[derive(Debug)]
pub struct StackBoard {
    config: CoordinatorConfig,
    stacks: Vec<Stack>,
}

/// What a stack hands to the generation client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInputs {
    /// Trimmed host from the LLM card
    pub host: String,
    /// Trimmed model from the LLM card
    pub model: String,
    /// Compiled prompt
    pub prompt: String,
}

impl GenerationInputs {
    /// Reads the inputs from `stack`. A stack without an LLM card has neither
    /// host nor model.
    pub fn from_stack(stack: &Stack) -> Self {
        let (host, model) = stack.llm_card().map_or_else(Default::default, |llm| {
            (llm.host().trim().to_string(), llm.model().trim().to_string())
        });
        Self {
            host,
            model,
            prompt: stack.compiled_prompt(),
        }
    }

    /// Checks host, then model, then prompt.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        if self.host.is_empty() {
            Err(ValidationFailure::MissingHost)
        } else if self.model.is_empty() {
            Err(ValidationFailure::MissingModel)
        } else if self.prompt.trim().is_empty() {
            Err(ValidationFailure::EmptyPrompt)
        } else {
            Ok(())
        }
    }
}

impl StackBoard {
    /// Creates an empty board.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            stacks: Vec::new(),
        }
    }

    /// Defaults used for new stacks.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Stacks in creation order.
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Ids of every stack in creation order.
    pub fn stack_ids(&self) -> Vec<StackId> {
        self.stacks.iter().map(|stack| *stack.id()).collect()
    }

    /// Looks up a stack.
    pub fn stack(&self, id: StackId) -> Option<&Stack> {
        self.stacks.iter().find(|stack| *stack.id() == id)
    }

    /// Looks up a stack, failing with [`BoardErrorKind::StackNotFound`].
    pub fn try_stack(&self, id: StackId) -> Result<&Stack, BoardError> {
        self.stack(id).ok_or_else(|| stack_not_found(id))
    }

    fn try_stack_mut(&mut self, id: StackId) -> Result<&mut Stack, BoardError> {
        self.stacks
            .iter_mut()
            .find(|stack| *stack.id() == id)
            .ok_or_else(|| stack_not_found(id))
    }

    fn try_card_mut(&mut self, stack: StackId, card: CardId) -> Result<&mut Card, BoardError> {
        self.try_stack_mut(stack)?
            .card_mut(card)
            .ok_or_else(|| card_not_found(stack, card))
    }

    /// One prompt card and one LLM card, filled from the config.
    fn default_cards(&self) -> Vec<Card> {
        vec![
            PromptCard::new(self.config.default_prompt_text().as_str(), 0).into(),
            LlmCard::new(
                self.config.default_host().as_str(),
                self.config.default_model().as_str(),
            )
            .into(),
        ]
    }

    /// Adds a stack with the default cards at `position`.
    pub fn add_stack(&mut self, position: Position) -> StackId {
        let stack = Stack::new(position, self.default_cards());
        let id = *stack.id();
        debug!(stack = %id, x = position.x, y = position.y, "Added stack");
        self.stacks.push(stack);
        id
    }

    /// Removes a stack and returns it.
    pub fn remove_stack(&mut self, id: StackId) -> Result<Stack, BoardError> {
        let index = self
            .stacks
            .iter()
            .position(|stack| *stack.id() == id)
            .ok_or_else(|| stack_not_found(id))?;
        debug!(stack = %id, "Removed stack");
        Ok(self.stacks.remove(index))
    }

    /// Moves a stack's anchor.
    pub fn move_stack(&mut self, id: StackId, position: Position) -> Result<(), BoardError> {
        self.try_stack_mut(id)?.set_position(position);
        Ok(())
    }

    /// Inserts a prompt card after the last prompt card of `stack`.
    pub fn add_prompt_card(&mut self, stack: StackId) -> Result<CardId, BoardError> {
        let text = self.config.default_prompt_text().clone();
        let card = self.try_stack_mut(stack)?.insert_prompt_card(text);
        debug!(stack = %stack, card = %card, "Added prompt card");
        Ok(card)
    }

    /// Removes a card from `stack` and returns it.
    pub fn remove_card(&mut self, stack: StackId, card: CardId) -> Result<Card, BoardError> {
        self.try_stack_mut(stack)?
            .remove_card(card)
            .ok_or_else(|| card_not_found(stack, card))
    }

    /// Replaces the card with `card`'s id. The kind must match.
    pub fn update_card(&mut self, stack: StackId, card: Card) -> Result<(), BoardError> {
        self.try_stack_mut(stack)?.replace_card(card)?;
        Ok(())
    }

    /// Moves the card at `from` to `to` within `stack`.
    pub fn reorder_cards(
        &mut self,
        stack: StackId,
        from: usize,
        to: usize,
    ) -> Result<(), BoardError> {
        self.try_stack_mut(stack)?.move_card(from, to)
    }

    /// Flips whether `stack` is fanned out.
    pub fn toggle_spread(&mut self, stack: StackId) -> Result<(), BoardError> {
        self.try_stack_mut(stack)?.toggle_spread();
        Ok(())
    }

    /// Flips a prompt card's mute flag. Other card kinds are rejected.
    pub fn toggle_mute(&mut self, stack: StackId, card: CardId) -> Result<(), BoardError> {
        self.prompt_card_mut(stack, card)?.toggle_mute();
        Ok(())
    }

    /// Sets a prompt card's text.
    pub fn set_prompt_text(
        &mut self,
        stack: StackId,
        card: CardId,
        text: impl Into<String>,
    ) -> Result<(), BoardError> {
        self.prompt_card_mut(stack, card)?.set_text(text);
        Ok(())
    }

    fn prompt_card_mut(
        &mut self,
        stack: StackId,
        card: CardId,
    ) -> Result<&mut PromptCard, BoardError> {
        let slot = self.try_card_mut(stack, card)?;
        let actual = slot.kind();
        slot.as_prompt_mut().ok_or_else(|| {
            BoardError::new(BoardErrorKind::KindMismatch {
                card: card.to_string(),
                actual: actual.to_string(),
                requested: CardKind::Prompt.to_string(),
            })
        })
    }

    /// Sets host and model on the stack's LLM card.
    pub fn set_llm_config(
        &mut self,
        stack: StackId,
        host: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<(), BoardError> {
        let llm = self
            .try_stack_mut(stack)?
            .llm_card_mut()
            .ok_or_else(|| missing_kind(stack, "llm"))?;
        llm.set_host(host);
        llm.set_model(model);
        Ok(())
    }

    /// Overwrites the text of the stack's Response card.
    pub fn set_response_text(
        &mut self,
        stack: StackId,
        text: impl Into<String>,
    ) -> Result<(), BoardError> {
        let response = self
            .try_stack_mut(stack)?
            .response_card_mut()
            .ok_or_else(|| missing_kind(stack, "response"))?;
        response.set_text(text);
        Ok(())
    }

    /// Adds a comparison stack of `original` next to it.
    ///
    /// The new stack gets fresh default cards and links to every card the
    /// original holds now.
    pub fn create_comparison_stack(&mut self, original: StackId) -> Result<StackId, BoardError> {
        let cards = self.default_cards();
        let offset = *self.config.comparison_offset();
        let source = self.try_stack(original)?;
        let position = source.position().translated(offset);
        let comparison = Stack::comparison_of(source, position, cards);
        let id = *comparison.id();
        debug!(
            original = %original,
            comparison = %id,
            linked = comparison.linked_card_ids().len(),
            "Created comparison stack"
        );
        self.stacks.push(comparison);
        Ok(id)
    }

    /// Whether `card` was in the original when `stack` was created from it.
    pub fn is_linked(&self, stack: StackId, card: CardId) -> bool {
        self.stack(stack).is_some_and(|stack| stack.is_linked(card))
    }

    /// Stores a generation result in the stack's Response card.
    ///
    /// Returns `None` when the stack is gone.
    pub fn write_response(
        &mut self,
        stack: StackId,
        text: impl Into<String>,
        generation_time: Option<Duration>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Option<CardId> {
        let Ok(target) = self.try_stack_mut(stack) else {
            debug!(stack = %stack, "Stack removed before response arrived");
            return None;
        };
        Some(target.write_response(text, generation_time, timestamp))
    }

    /// Reads what to send for `stack`. `None` if the stack is gone.
    pub fn generation_inputs(&self, stack: StackId) -> Option<GenerationInputs> {
        self.stack(stack).map(GenerationInputs::from_stack)
    }
}

#[track_caller]
fn stack_not_found(id: StackId) -> BoardError {
    BoardError::new(BoardErrorKind::StackNotFound(id.to_string()))
}

#[track_caller]
fn card_not_found(stack: StackId, card: CardId) -> BoardError {
    BoardError::new(BoardErrorKind::CardNotFound {
        card: card.to_string(),
        stack: stack.to_string(),
    })
}

#[track_caller]
fn missing_kind(stack: StackId, kind: &str) -> BoardError {
    BoardError::new(BoardErrorKind::CardNotFound {
        card: format!("<{kind}>"),
        stack: stack.to_string(),
    })
}
