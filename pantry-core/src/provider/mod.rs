//! # Model providers
//!
//! A trait-based abstraction over the text-generation backend.
//!
//! ## Design
//! - `LlmProvider` is object safe, so one `Arc<dyn LlmProvider>` is built at
//!   startup and handed to the pipeline
//! - `OllamaProvider` talks to a local Ollama server
//! - `FakeProvider` returns scripted replies for tests
//! - One prompt in, one complete text out: no streaming, no retries

pub mod fake;
pub mod ollama;

pub use fake::FakeProvider;
pub use ollama::OllamaProvider;

use crate::Result;
use async_trait::async_trait;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// The text-generation backend seen by the pipeline
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "ollama", "fake")
    fn name(&self) -> &str;

    /// Model the provider sends prompts to
    fn model(&self) -> &str;

    /// Send a prompt and wait for the complete response text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for creating providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    /// No timeout when unset: a hung backend hangs the caller
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Local Ollama on its default port
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.into(),
            model: model.into(),
            timeout_secs: None,
        }
    }

    /// Set the backend address.
    ///
    /// Accepts the `host:port` form Ollama itself uses for `OLLAMA_HOST`;
    /// a missing scheme defaults to `http://`. Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/');
        self.base_url = if base_url.contains("://") {
            base_url.to_string()
        } else {
            format!("http://{}", base_url)
        };
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}
