//! Prompt compilation.

use crate::{Card, Stack};

/// Separator placed between included prompt fragments.
pub const PROMPT_SEPARATOR: &str = "\n\n";

/// Compiles a stack into the text submitted to the model.
///
/// Prompt cards are taken in stack order; muted or empty ones are skipped and
/// the rest are joined with [`PROMPT_SEPARATOR`]. A stack without any included
/// prompt compiles to the empty string.
///
/// # Examples
///
/// ```
/// use promptcanvas_core::{compile_prompt, LlmCard, Position, PromptCard, Stack};
///
/// let stack = Stack::new(
///     Position::default(),
///     vec![
///         PromptCard::new("Be terse.", 0).into(),
///         PromptCard::new("draft", 1).with_muted(true).into(),
///         LlmCard::new("localhost:11434", "llama3").into(),
///         PromptCard::new("Name three primes.", 2).into(),
///     ],
/// );
/// assert_eq!(compile_prompt(&stack), "Be terse.\n\nName three primes.");
/// ```
pub fn compile_prompt(stack: &Stack) -> String {
    compile_cards(stack.cards())
}

/// Compiles a bare card sequence. See [`compile_prompt`].
pub fn compile_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .filter_map(Card::as_prompt)
        .filter(|prompt| prompt.is_included_in_prompt())
        .map(|prompt| prompt.text().as_str())
        .collect::<Vec<_>>()
        .join(PROMPT_SEPARATOR)
}
