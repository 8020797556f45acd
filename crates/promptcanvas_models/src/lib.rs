//! Model server clients for promptcanvas.
//!
//! Currently Ollama only. Clients implement
//! [`promptcanvas_interface::GenerationClient`].

mod ollama;

pub use ollama::{
    GENERATE_PATH, GenerateBody, GenerateBodyBuilder, GenerateReply, OllamaClient,
    OllamaClientConfig, OllamaClientConfigBuilder, PROBE_PATH, REQUEST_TIMEOUT_ENV,
    decode_generate_body, endpoint_url,
};
