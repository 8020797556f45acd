//! Data transfer objects for the Ollama generate API.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct GenerateBody {
    /// Model name
    model: String,
    /// Compiled prompt text
    prompt: String,
    /// Always false; the canvas shows whole answers only
    #[builder(default)]
    stream: bool,
}

impl GenerateBody {
    /// Creates a new builder for GenerateBody.
    pub fn builder() -> GenerateBodyBuilder {
        GenerateBodyBuilder::default()
    }
}

/// A generate reply, or one fragment of a newline-delimited reply.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReply {
    /// Generated text (or the fragment of it)
    pub response: String,
    /// Whether this is the final fragment
    #[serde(default)]
    pub done: bool,
}
