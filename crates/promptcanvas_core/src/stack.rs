//! Stacks of cards.

use crate::{
    Card, CardId, CardKind, LlmCard, Position, PromptCard, ResponseCard, StackId, compile_prompt,
};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use promptcanvas_error::{BoardError, BoardErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// One prompt-chain experiment: an ordered sequence of cards plus spatial and
/// comparison state.
///
/// Card order is compilation order. A stack holds at most one LLM card and at
/// most one Response card; [`Stack::write_response`] reuses the existing
/// Response card rather than adding a second one.
///
/// Only comparison stacks carry `linked_card_ids`, a snapshot of the original
/// stack's card ids taken when the comparison was created. Nothing updates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Stack {
    /// Stack id
    id: StackId,
    /// Cards in display and compilation order
    cards: Vec<Card>,
    /// Canvas position of the stack's anchor
    position: Position,
    /// Whether the cards are fanned out
    is_spread_out: bool,
    /// Whether this stack was created as a comparison of another
    is_comparison: bool,
    /// The stack this one was duplicated from
    original_stack_id: Option<StackId>,
    /// Card ids of the original at duplication time
    linked_card_ids: HashSet<CardId>,
}

impl Stack {
    /// Creates a regular stack holding `cards`.
    pub fn new(position: Position, cards: Vec<Card>) -> Self {
        Self {
            id: StackId::new(),
            cards,
            position,
            is_spread_out: false,
            is_comparison: false,
            original_stack_id: None,
            linked_card_ids: HashSet::new(),
        }
    }

    /// Creates a comparison stack of `original` holding `cards`.
    ///
    /// The new stack links to every card id `original` holds right now.
    pub fn comparison_of(original: &Stack, position: Position, cards: Vec<Card>) -> Self {
        Self {
            id: StackId::new(),
            cards,
            position,
            is_spread_out: false,
            is_comparison: true,
            original_stack_id: Some(original.id),
            linked_card_ids: original.card_ids(),
        }
    }

    /// Looks up a card by id.
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == id)
    }

    /// Looks up a card by id for mutation.
    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id() == id)
    }

    /// Position of a card in the sequence.
    pub fn index_of(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id() == id)
    }

    /// Prompt cards in sequence order.
    pub fn prompt_cards(&self) -> impl Iterator<Item = &PromptCard> {
        self.cards.iter().filter_map(Card::as_prompt)
    }

    /// Number of prompt cards.
    pub fn prompt_count(&self) -> usize {
        self.prompt_cards().count()
    }

    /// Number of cards of `kind`.
    pub fn count_of(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|card| card.kind() == kind).count()
    }

    /// The stack's LLM card, if any.
    pub fn llm_card(&self) -> Option<&LlmCard> {
        self.cards.iter().find_map(Card::as_llm)
    }

    /// The stack's Response card, if any.
    pub fn response_card(&self) -> Option<&ResponseCard> {
        self.cards.iter().find_map(Card::as_response)
    }

    /// Mutable access to the LLM card.
    pub fn llm_card_mut(&mut self) -> Option<&mut LlmCard> {
        self.cards.iter_mut().find_map(Card::as_llm_mut)
    }

    /// Mutable access to the Response card.
    pub fn response_card_mut(&mut self) -> Option<&mut ResponseCard> {
        self.cards.iter_mut().find_map(Card::as_response_mut)
    }

    /// Ids of every card in the stack.
    pub fn card_ids(&self) -> HashSet<CardId> {
        self.cards.iter().map(Card::id).collect()
    }

    /// Whether `card` was part of the original stack when this comparison was made.
    pub fn is_linked(&self, card: CardId) -> bool {
        self.linked_card_ids.contains(&card)
    }

    /// Text submitted to the model for this stack.
    pub fn compiled_prompt(&self) -> String {
        compile_prompt(self)
    }

    /// Moves the stack's anchor.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Flips `is_spread_out`.
    pub fn toggle_spread(&mut self) {
        self.is_spread_out = !self.is_spread_out;
    }

    /// Inserts a prompt card right after the last existing prompt card.
    ///
    /// The new card's `color_index` is the prompt count before the insert.
    /// With no prompt cards present the card goes to the front.
    pub fn insert_prompt_card(&mut self, text: impl Into<String>) -> CardId {
        let card = PromptCard::new(text, self.prompt_count());
        let id = *card.id();
        let index = self
            .cards
            .iter()
            .rposition(|card| card.kind() == CardKind::Prompt)
            .map_or(0, |last| last + 1);
        self.cards.insert(index, card.into());
        id
    }

    /// Appends a card at the end of the sequence.
    pub fn push_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes a card, returning it. Remaining color indices are left alone.
    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let index = self.index_of(id)?;
        Some(self.cards.remove(index))
    }

    /// Replaces the card sharing `card`'s id, returning the previous card.
    ///
    /// The replacement must be of the same kind, which keeps the one-LLM,
    /// one-Response rule intact.
    pub fn replace_card(&mut self, card: Card) -> Result<Card, BoardError> {
        let stack = self.id;
        let slot = self.card_mut(card.id()).ok_or_else(|| {
            BoardError::new(BoardErrorKind::CardNotFound {
                card: card.id().to_string(),
                stack: stack.to_string(),
            })
        })?;
        if slot.kind() != card.kind() {
            return Err(BoardError::new(BoardErrorKind::KindMismatch {
                card: card.id().to_string(),
                actual: slot.kind().to_string(),
                requested: card.kind().to_string(),
            }));
        }
        Ok(std::mem::replace(slot, card))
    }

    /// Moves the card at `from` so it ends up at index `to`.
    pub fn move_card(&mut self, from: usize, to: usize) -> Result<(), BoardError> {
        let len = self.cards.len();
        for index in [from, to] {
            if index >= len {
                return Err(BoardError::new(BoardErrorKind::IndexOutOfRange {
                    index,
                    len,
                }));
            }
        }
        if from != to {
            let card = self.cards.remove(from);
            self.cards.insert(to, card);
        }
        Ok(())
    }

    /// Stores a generation result, returning the Response card's id.
    ///
    /// An existing Response card has its content replaced in place; otherwise a
    /// new one is appended.
    pub fn write_response(
        &mut self,
        text: impl Into<String>,
        generation_time: Option<Duration>,
        timestamp: Option<DateTime<Utc>>,
    ) -> CardId {
        if let Some(response) = self.response_card_mut() {
            response.replace_content(text, generation_time, timestamp);
            return *response.id();
        }
        let mut response = ResponseCard::new("");
        response.replace_content(text, generation_time, timestamp);
        let id = *response.id();
        self.cards.push(response.into());
        id
    }
}
