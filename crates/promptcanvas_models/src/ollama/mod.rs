//! Ollama generate API support.
//!
//! Only the two endpoints the canvas needs are covered: a reachability probe
//! and non-streaming generation.

mod client;
mod dto;
mod endpoint;

pub use client::{
    OllamaClient, OllamaClientConfig, OllamaClientConfigBuilder, REQUEST_TIMEOUT_ENV,
    decode_generate_body,
};
pub use dto::{GenerateBody, GenerateBodyBuilder, GenerateReply};
pub use endpoint::{GENERATE_PATH, PROBE_PATH, endpoint_url};
