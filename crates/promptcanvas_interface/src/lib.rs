//! Trait definitions for promptcanvas generation backends.
//!
//! The coordinator never talks HTTP itself; it drives a [`GenerationClient`].
//! The Ollama implementation lives in `promptcanvas_models`, tests supply
//! their own.

use async_trait::async_trait;
use promptcanvas_error::ClientError;

/// Result type for generation client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// A stateless backend able to check reachability of a model server and run a
/// single non-streaming generation against it.
///
/// Implementations are shared across concurrently running stack generations
/// and must not rely on per-call mutable state.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Checks whether `host` answers a lightweight request with a 2xx status.
    ///
    /// Never fails: transport errors and malformed hosts yield `false`.
    async fn probe(&self, host: &str) -> bool;

    /// Submits `prompt` to `model` on `host` and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed hosts, transport failures, non-2xx
    /// statuses and bodies that cannot be decoded.
    async fn generate(&self, host: &str, model: &str, prompt: &str) -> ClientResult<String>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}
