//! Card types.
//!
//! A [`Card`] pairs one of three content kinds with view state owned by the
//! presentation layer. The core only looks at content, order and membership.

use crate::{CardId, Position};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A fragment of prompt text.
///
/// # Examples
///
/// ```
/// use promptcanvas_core::PromptCard;
///
/// let card = PromptCard::new("Who are you?", 0);
/// assert!(card.is_included_in_prompt());
///
/// let muted = card.clone().with_muted(true);
/// assert!(!muted.is_included_in_prompt());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PromptCard {
    /// Card id
    id: CardId,
    /// Prompt text
    text: String,
    /// Hue offset assigned at creation, stable afterwards
    color_index: usize,
    /// Muted cards are skipped by the compiler
    is_muted: bool,
}

impl PromptCard {
    /// Creates an unmuted prompt card with a fresh id.
    pub fn new(text: impl Into<String>, color_index: usize) -> Self {
        Self {
            id: CardId::new(),
            text: text.into(),
            color_index,
            is_muted: false,
        }
    }

    /// Returns the card with its mute flag set.
    pub fn with_muted(mut self, is_muted: bool) -> Self {
        self.is_muted = is_muted;
        self
    }

    /// Whether the compiler will include this card's text.
    pub fn is_included_in_prompt(&self) -> bool {
        !self.is_muted && !self.text.is_empty()
    }

    /// Replaces the prompt text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Sets the mute flag.
    pub fn set_muted(&mut self, is_muted: bool) {
        self.is_muted = is_muted;
    }

    /// Flips the mute flag.
    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
    }
}

/// Connection settings for the model server. At most one per stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LlmCard {
    /// Card id
    id: CardId,
    /// Server host, with or without scheme
    host: String,
    /// Model name as the server knows it
    model: String,
}

impl LlmCard {
    /// Creates an LLM card with a fresh id.
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            host: host.into(),
            model: model.into(),
        }
    }

    /// Replaces the host.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Replaces the model name.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }
}

/// The latest generation result for a stack. At most one per stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ResponseCard {
    /// Card id
    id: CardId,
    /// Model output or a human-readable error
    text: String,
    /// Wall-clock duration of the request that produced `text`
    generation_time: Option<Duration>,
    /// When `text` was written
    timestamp: Option<DateTime<Utc>>,
}

impl ResponseCard {
    /// Creates a response card with no timing information.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            text: text.into(),
            generation_time: None,
            timestamp: None,
        }
    }

    /// Replaces text and timing, keeping the id.
    pub fn replace_content(
        &mut self,
        text: impl Into<String>,
        generation_time: Option<Duration>,
        timestamp: Option<DateTime<Utc>>,
    ) {
        self.text = text.into();
        self.generation_time = generation_time;
        self.timestamp = timestamp;
    }

    /// Replaces only the text, as a manual edit does.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// Discriminant of [`CardContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Prompt fragment
    Prompt,
    /// Model configuration
    Llm,
    /// Generation result
    Response,
}

/// Content of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum CardContent {
    /// Prompt fragment
    Prompt(PromptCard),
    /// Model configuration
    Llm(LlmCard),
    /// Generation result
    Response(ResponseCard),
}

impl CardContent {
    /// Id of the wrapped card.
    pub fn id(&self) -> CardId {
        match self {
            CardContent::Prompt(card) => card.id,
            CardContent::Llm(card) => card.id,
            CardContent::Response(card) => card.id,
        }
    }

    /// Kind of the wrapped card.
    pub fn kind(&self) -> CardKind {
        match self {
            CardContent::Prompt(_) => CardKind::Prompt,
            CardContent::Llm(_) => CardKind::Llm,
            CardContent::Response(_) => CardKind::Response,
        }
    }
}

/// Presentation state carried alongside a card. Never read by the core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CardView {
    /// Offset within the stack when spread out
    pub position: Position,
    /// Whether the card shows its full content
    pub is_expanded: bool,
    /// Whether a drag gesture holds the card
    pub is_dragging: bool,
    /// Whether the card has focus
    pub is_active: bool,
}

/// A card on the canvas: content plus view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    content: CardContent,
    #[serde(default)]
    view: CardView,
}

impl Card {
    /// Wraps content with default view state.
    pub fn new(content: CardContent) -> Self {
        Self {
            content,
            view: CardView::default(),
        }
    }

    /// Returns the card with the given view state.
    pub fn with_view(mut self, view: CardView) -> Self {
        self.view = view;
        self
    }

    /// Card id.
    pub fn id(&self) -> CardId {
        self.content.id()
    }

    /// Card kind.
    pub fn kind(&self) -> CardKind {
        self.content.kind()
    }

    /// Card content.
    pub fn content(&self) -> &CardContent {
        &self.content
    }

    /// View state.
    pub fn view(&self) -> &CardView {
        &self.view
    }

    /// Mutable view state.
    pub fn view_mut(&mut self) -> &mut CardView {
        &mut self.view
    }

    /// Prompt content, if this is a prompt card.
    pub fn as_prompt(&self) -> Option<&PromptCard> {
        match &self.content {
            CardContent::Prompt(card) => Some(card),
            _ => None,
        }
    }

    /// Mutable prompt content, if this is a prompt card.
    pub fn as_prompt_mut(&mut self) -> Option<&mut PromptCard> {
        match &mut self.content {
            CardContent::Prompt(card) => Some(card),
            _ => None,
        }
    }

    /// LLM content, if this is an LLM card.
    pub fn as_llm(&self) -> Option<&LlmCard> {
        match &self.content {
            CardContent::Llm(card) => Some(card),
            _ => None,
        }
    }

    /// Mutable LLM content, if this is an LLM card.
    pub fn as_llm_mut(&mut self) -> Option<&mut LlmCard> {
        match &mut self.content {
            CardContent::Llm(card) => Some(card),
            _ => None,
        }
    }

    /// Response content, if this is a response card.
    pub fn as_response(&self) -> Option<&ResponseCard> {
        match &self.content {
            CardContent::Response(card) => Some(card),
            _ => None,
        }
    }

    /// Mutable response content, if this is a response card.
    pub fn as_response_mut(&mut self) -> Option<&mut ResponseCard> {
        match &mut self.content {
            CardContent::Response(card) => Some(card),
            _ => None,
        }
    }
}

impl From<PromptCard> for Card {
    fn from(card: PromptCard) -> Self {
        Self::new(CardContent::Prompt(card))
    }
}

impl From<LlmCard> for Card {
    fn from(card: LlmCard) -> Self {
        Self::new(CardContent::Llm(card))
    }
}

impl From<ResponseCard> for Card {
    fn from(card: ResponseCard) -> Self {
        Self::new(CardContent::Response(card))
    }
}
