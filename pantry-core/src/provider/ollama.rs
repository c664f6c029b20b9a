//! Ollama provider
//!
//! Talks to a local Ollama server through its native HTTP API:
//! `POST /api/generate` for completions, `GET /api/tags` for installed models.

use super::*;
use crate::Error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct OllamaProvider {
    client: Client,
    config: ProviderConfig,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| {
            Error::config_invalid(format!("failed to create HTTP client: {}", e))
                .with_operation("ollama::new")
                .set_source(e)
        })?;

        Ok(Self { client, config })
    }

    /// Create with default local settings
    pub fn local(model: impl Into<String>) -> Result<Self> {
        Self::new(ProviderConfig::ollama(model))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Check if the Ollama server answers
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(e, "ollama::health_check", &url))?;

        Ok(response.status().is_success())
    }

    /// Names of the models installed on the server
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(e, "ollama::list_models", &url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, "ollama::list_models", &url))?;

        if !status.is_success() {
            return Err(Error::backend_failed(status.as_u16(), api_error_message(&body))
                .with_operation("ollama::list_models"));
        }

        let tags: TagsResponse = serde_json::from_str(&body).map_err(|e| {
            Error::malformed_response(format!("unexpected /api/tags body: {}", e))
                .with_operation("ollama::list_models")
                .set_source(e)
        })?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url());
        let api_request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "sending prompt to ollama");

        let response = self
            .client
            .post(&url)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                transport_error(e, "ollama::complete", &url).with_context("model", self.model())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            transport_error(e, "ollama::complete", &url).with_context("model", self.model())
        })?;

        if !status.is_success() {
            return Err(Error::backend_failed(status.as_u16(), api_error_message(&body))
                .with_operation("ollama::complete")
                .with_context("model", self.model()));
        }

        let api_response: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            Error::malformed_response(format!("unexpected /api/generate body: {}", e))
                .with_operation("ollama::complete")
                .with_context("model", self.model())
                .set_source(e)
        })?;

        debug!(
            model = %api_response.model.as_deref().unwrap_or(self.model()),
            done = ?api_response.done,
            eval_count = ?api_response.eval_count,
            total_duration_ns = ?api_response.total_duration,
            response_chars = api_response.response.len(),
            "ollama response received"
        );

        Ok(api_response.response)
    }
}

fn transport_error(err: reqwest::Error, operation: &'static str, url: &str) -> Error {
    let message = if err.is_timeout() {
        format!("request to {} timed out", url)
    } else {
        format!("could not reach backend at {}: {}", url, err)
    };

    Error::backend_unreachable(message)
        .with_operation(operation)
        .with_context("url", url)
        .set_source(err)
}

/// Ollama reports failures as `{"error": "..."}`; fall back to the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

// ============================================================================
// Ollama API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    model: Option<String>,
    done: Option<bool>,
    eval_count: Option<u64>,
    total_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OllamaProvider {
        OllamaProvider::new(ProviderConfig::ollama("llama3.2").with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn test_ollama_provider_config() {
        let provider = OllamaProvider::local("llama3.2").unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3.2");
        assert_eq!(provider.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(api_error_message(r#"{"error": "model not found"}"#), "model not found");
        assert_eq!(api_error_message(" Bad Gateway \n"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_complete_returns_response_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({"model": "llama3.2", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2",
                "created_at": "2024-10-01T12:00:00Z",
                "response": "{\"recipes\": []}",
                "done": true,
                "eval_count": 12
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider_for(&server).complete("make soup").await.unwrap();
        assert_eq!(text, "{\"recipes\": []}");
    }

    #[tokio::test]
    async fn test_complete_sends_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({"prompt": "eggs and rice"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(provider_for(&server).complete("eggs and rice").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_complete_backend_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "model 'llama3.2' not found"})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).complete("hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendFailed);
        assert_eq!(err.context_value("status"), Some("404"));
        assert!(err.message().contains("model 'llama3.2' not found"));
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).complete("hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert_eq!(err.operation(), "ollama::complete");
    }

    #[tokio::test]
    async fn test_complete_unreachable() {
        // Bind then drop a listener so the port is closed.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let provider =
            OllamaProvider::new(ProviderConfig::ollama("llama3.2").with_base_url(addr.to_string()))
                .unwrap();

        let err = provider.complete("hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendUnreachable);
        assert!(err.is_retryable());
        assert!(err.context_value("url").unwrap().ends_with("/api/generate"));
    }

    #[tokio::test]
    async fn test_list_models_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{"name": "llama3.2:latest"}, {"name": "llama3.1:8b"}]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(provider.health_check().await.unwrap());
        assert_eq!(
            provider.list_models().await.unwrap(),
            ["llama3.2:latest", "llama3.1:8b"]
        );
    }
}
