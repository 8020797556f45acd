//! Core data types for promptcanvas.
//!
//! A canvas holds [`Stack`]s; each stack is an ordered run of [`Card`]s of three
//! kinds: prompt fragments, one LLM configuration and at most one response.
//! [`compile_prompt`] turns a stack into the text submitted to the model.

mod card;
mod compiler;
mod ids;
mod observability;
mod position;
mod stack;

pub use card::{Card, CardContent, CardKind, CardView, LlmCard, PromptCard, ResponseCard};
pub use compiler::{PROMPT_SEPARATOR, compile_cards, compile_prompt};
pub use ids::{CardId, StackId};
pub use observability::{DEFAULT_LOG_FILTER, init_tracing};
pub use position::Position;
pub use stack::Stack;
