//! Shared mock generation client.

#![allow(dead_code)]

use async_trait::async_trait;
use promptcanvas_error::{ClientError, ClientErrorKind};
use promptcanvas_interface::{ClientResult, GenerationClient};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Prompts containing this marker wait on [`MockClient::gate`] before answering.
pub const SLOW_MARKER: &str = "[slow]";

/// Prompts containing this marker make [`MockClient`] panic inside `generate`.
pub const PANIC_MARKER: &str = "[panic]";

/// Scriptable client that records what it was asked.
pub struct MockClient {
    reachable: bool,
    reply: Result<String, ClientErrorKind>,
    pub gate: Notify,
    probes: AtomicUsize,
    generates: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockClient {
    /// Reachable client answering every prompt with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self {
            reachable: true,
            reply: Ok(reply.to_string()),
            gate: Notify::new(),
            probes: AtomicUsize::new(0),
            generates: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client whose probe always fails.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::replying("never sent")
        }
    }

    /// Reachable client whose generate call fails with `kind`.
    pub fn failing(kind: ClientErrorKind) -> Self {
        Self {
            reply: Err(kind),
            ..Self::replying("never sent")
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn generate_count(&self) -> usize {
        self.generates.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for MockClient {
    async fn probe(&self, _host: &str) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.reachable
    }

    async fn generate(&self, _host: &str, _model: &str, prompt: &str) -> ClientResult<String> {
        self.generates.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains(SLOW_MARKER) {
            self.gate.notified().await;
        }
        if prompt.contains(PANIC_MARKER) {
            panic!("mock client asked to fail hard");
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(kind) => Err(ClientError::new(kind.clone())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
