//! Ollama HTTP client.

use crate::ollama::{GENERATE_PATH, GenerateBody, GenerateReply, PROBE_PATH, endpoint_url};
use async_trait::async_trait;
use derive_getters::Getters;
use promptcanvas_error::{ClientError, ClientErrorKind, ConfigError, ConfigErrorKind};
use promptcanvas_interface::{ClientResult, GenerationClient};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Environment variable holding an optional request timeout in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "PROMPTCANVAS_REQUEST_TIMEOUT_SECS";

/// Settings for [`OllamaClient`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct OllamaClientConfig {
    /// Per-request timeout; none means wait as long as the server takes
    #[builder(default)]
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

impl OllamaClientConfig {
    /// Reads [`REQUEST_TIMEOUT_ENV`]. An unset variable means no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigErrorKind::InvalidEnv`] when the value is not a whole
    /// number of seconds.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            request_timeout_secs: parse_timeout(std::env::var(REQUEST_TIMEOUT_ENV).ok())?,
        })
    }

    /// Like [`Self::try_from_env`], but an invalid value is logged and ignored.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring invalid request timeout");
            Self::default()
        })
    }
}

/// Reads a [`REQUEST_TIMEOUT_ENV`] value. Unset means no timeout.
fn parse_timeout(raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|raw| {
        raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::new(ConfigErrorKind::InvalidEnv {
                name: REQUEST_TIMEOUT_ENV.to_string(),
                value: raw.clone(),
            })
        })
    })
    .transpose()
}

/// Client for the Ollama HTTP API.
///
/// Stateless apart from the pooled `reqwest` client, so one instance can be
/// shared by every stack generating at the same time. Host and model arrive
/// per call because each stack's LLM card carries its own.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
}

impl OllamaClient {
    /// Creates a client with no request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> ClientResult<Self> {
        Self::with_config(&OllamaClientConfig::default())
    }

    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    #[instrument(skip_all, fields(timeout_secs = ?config.request_timeout_secs()))]
    pub fn with_config(config: &OllamaClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs() {
            builder = builder.timeout(Duration::from_secs(*secs));
        }
        let client = builder.build().map_err(|e| {
            error!(error = ?e, "Failed to build HTTP client");
            ClientError::new(ClientErrorKind::ClientBuild(e.to_string()))
        })?;
        debug!("Created Ollama client");
        Ok(Self { client })
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    #[instrument(skip(self))]
    async fn probe(&self, host: &str) -> bool {
        let url = match endpoint_url(host, PROBE_PATH) {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e.kind, "Probe skipped, host does not form a URL");
                return false;
            }
        };

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(status = %status, "Probe answered");
                status.is_success()
            }
            Err(e) => {
                debug!(error = ?e, "Probe failed");
                false
            }
        }
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, host: &str, model: &str, prompt: &str) -> ClientResult<String> {
        let url = endpoint_url(host, GENERATE_PATH)?;
        let body = GenerateBody::builder()
            .model(model)
            .prompt(prompt)
            .stream(false)
            .build()
            .map_err(|e| ClientError::new(ClientErrorKind::ClientBuild(e.to_string())))?;

        debug!(url = %url, "Sending generate request");

        let response = self.client.post(url).json(&body).send().await.map_err(|e| {
            error!(error = ?e, "Generate request failed");
            ClientError::new(ClientErrorKind::Network(e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Server returned error status");
            let message = if error_text.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                error_text
            };
            return Err(ClientError::new(ClientErrorKind::HttpStatus {
                status_code: status.as_u16(),
                message,
            }));
        }

        let text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read response body");
            ClientError::new(ClientErrorKind::Network(e.to_string()))
        })?;

        let generated = decode_generate_body(&text)?;
        debug!(response_len = generated.len(), "Received response");
        Ok(generated)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

/// Extracts generated text from a generate reply body.
///
/// Accepts a single JSON object, or newline-delimited JSON fragments whose
/// `response` fields are concatenated in order (what a server that streams
/// despite `stream: false` sends).
///
/// # Errors
///
/// Returns [`ClientErrorKind::Decode`] when the body is neither.
///
/// # Examples
///
/// ```
/// use promptcanvas_models::decode_generate_body;
///
/// let body = "{\"response\":\"Hel\",\"done\":false}\n{\"response\":\"lo\",\"done\":true}\n";
/// assert_eq!(decode_generate_body(body).unwrap(), "Hello");
/// ```
pub fn decode_generate_body(body: &str) -> ClientResult<String> {
    let single_error = match serde_json::from_str::<GenerateReply>(body) {
        Ok(reply) => return Ok(reply.response),
        Err(e) => e,
    };

    let mut aggregate = String::new();
    let mut fragments = 0usize;
    for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let fragment: GenerateReply = serde_json::from_str(line).map_err(|e| {
            warn!(error = %e, "Response is neither JSON nor newline-delimited JSON");
            ClientError::new(ClientErrorKind::Decode(format!(
                "{single_error}; fragment {}: {e}",
                fragments + 1
            )))
        })?;
        aggregate.push_str(&fragment.response);
        fragments += 1;
    }

    if fragments == 0 {
        return Err(ClientError::new(ClientErrorKind::Decode(format!(
            "empty body: {single_error}"
        ))));
    }
    debug!(fragments, "Joined newline-delimited response fragments");
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_object() {
        let body = r#"{"model":"llama3","response":"I am a model.","done":true}"#;
        assert_eq!(decode_generate_body(body).unwrap(), "I am a model.");
    }

    #[test]
    fn test_decode_fragments_in_order() {
        let body = concat!(
            "{\"response\":\"one \",\"done\":false}\n",
            "\n",
            "{\"response\":\"two \",\"done\":false}\n",
            "{\"response\":\"three\",\"done\":true}"
        );
        assert_eq!(decode_generate_body(body).unwrap(), "one two three");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_generate_body("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_empty_body() {
        let err = decode_generate_body("").unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_object_without_response() {
        let err = decode_generate_body(r#"{"error":"model not loaded"}"#).unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::Decode(_)));
    }

    #[test]
    fn test_unset_timeout_means_none() {
        assert_eq!(parse_timeout(None).unwrap(), None);
    }

    #[test]
    fn test_timeout_is_trimmed() {
        assert_eq!(parse_timeout(Some(" 45 ".to_string())).unwrap(), Some(45));
    }

    #[test]
    fn test_invalid_timeout_names_variable() {
        let err = parse_timeout(Some("soon".to_string())).unwrap_err();
        assert_eq!(
            err.kind(),
            &ConfigErrorKind::InvalidEnv {
                name: REQUEST_TIMEOUT_ENV.to_string(),
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_config_builder_defaults_to_no_timeout() {
        let config = OllamaClientConfigBuilder::default().build().unwrap();
        assert_eq!(*config.request_timeout_secs(), None);
    }
}
