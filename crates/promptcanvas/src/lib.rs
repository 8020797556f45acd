//! Promptcanvas: compose prompts from stacks of cards and compare what models
//! make of them.
//!
//! A [`Stack`] holds prompt cards, one LLM card and a Response card. The
//! [`StackCoordinator`] owns every stack, compiles the unmuted prompt cards into
//! one prompt and sends it to the stack's Ollama host, for one stack or for all
//! of them at once. Comparison stacks let two configurations run side by side.
//!
//! ```no_run
//! use promptcanvas::{CoordinatorConfig, Position, ollama_coordinator};
//!
//! # async fn demo() -> promptcanvas::PromptCanvasResult<()> {
//! let coordinator = ollama_coordinator(CoordinatorConfig::from_env())?;
//! let stack = coordinator.add_stack(Position::new(0.0, 0.0)).await;
//! let outcome = coordinator.generate_response(stack).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub use promptcanvas_coordinator::{
    BatchProgress, CoordinatorConfig, CoordinatorConfigBuilder, GenerationInputs,
    GenerationOutcome, StackBoard, StackCoordinator, ValidationFailure, elapsed_millis,
};
pub use promptcanvas_core::{
    Card, CardContent, CardId, CardKind, CardView, LlmCard, PROMPT_SEPARATOR, Position,
    PromptCard, ResponseCard, Stack, StackId, compile_cards, compile_prompt, init_tracing,
};
pub use promptcanvas_error::{
    BoardError, BoardErrorKind, ClientError, ClientErrorKind, ConfigError, ConfigErrorKind,
    PromptCanvasError, PromptCanvasErrorKind, PromptCanvasResult,
};
pub use promptcanvas_interface::{ClientResult, GenerationClient};
pub use promptcanvas_models::{OllamaClient, OllamaClientConfig};

/// Loads a `.env` file from the working directory or its parents, if present.
///
/// Returns whether a file was loaded.
pub fn load_dotenv() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env");
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable .env");
            false
        }
    }
}

/// Coordinator backed by an [`OllamaClient`] configured from the environment.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn ollama_coordinator(
    config: CoordinatorConfig,
) -> PromptCanvasResult<StackCoordinator<OllamaClient>> {
    let client = OllamaClient::with_config(&OllamaClientConfig::from_env())?;
    Ok(StackCoordinator::new(client, config))
}
