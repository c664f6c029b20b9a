//! Recipe pipeline: prompt -> provider -> extractor

use crate::{
    extract_json_object, LlmProvider, PromptTemplate, RecipeEnvelope, RecipeRequest, Result,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Stateless between calls; the provider handle is shared.
#[derive(Clone)]
pub struct RecipePipeline {
    provider: Arc<dyn LlmProvider>,
}

impl RecipePipeline {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Ask for JSON recipes and decode the first object in the reply
    pub async fn generate(&self, request: &RecipeRequest) -> Result<Value> {
        let prompt = PromptTemplate::Api.render(request);
        let text = self
            .provider
            .complete(&prompt)
            .await
            .map_err(|e| e.with_operation("pipeline::generate"))?;

        debug!(provider = self.provider.name(), raw = %text, "raw model response");

        extract_json_object(&text).map_err(|e| {
            e.with_operation("pipeline::generate")
                .with_context("response_chars", text.len().to_string())
        })
    }

    /// Like [`generate`](Self::generate), with every failure folded into the envelope
    pub async fn generate_envelope(&self, request: &RecipeRequest) -> RecipeEnvelope {
        match self.generate(request).await {
            Ok(value) => RecipeEnvelope::from_model_object(value),
            Err(err) => {
                warn!(
                    error = %err,
                    kind = %err.kind(),
                    model = self.provider.model(),
                    "recipe generation failed"
                );
                RecipeEnvelope::from_error(&err)
            }
        }
    }

    /// Ask for free-text recipes and return the reply untouched
    pub async fn generate_raw(&self, request: &RecipeRequest) -> Result<String> {
        let prompt = PromptTemplate::Interactive.render(request);
        self.provider
            .complete(&prompt)
            .await
            .map_err(|e| e.with_operation("pipeline::generate_raw"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, FakeProvider};
    use serde_json::json;

    fn request() -> RecipeRequest {
        RecipeRequest::new(["eggs", "spinach"], 1).unwrap()
    }

    fn pipeline(provider: FakeProvider) -> (RecipePipeline, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        (RecipePipeline::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_generate_envelope_success() {
        let reply = r#"Here are your recipes:
{"recipes": [{"recipe_name": "Spinach Omelette", "cooking_time": "10 minutes"}]}"#;
        let (pipeline, provider) = pipeline(FakeProvider::with_response(reply));

        let envelope = pipeline.generate_envelope(&request()).await;

        assert!(!envelope.is_error());
        assert_eq!(envelope.recipe_names(), ["Spinach Omelette"]);
        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Using the ingredients: eggs, spinach"));
    }

    #[tokio::test]
    async fn test_generate_envelope_no_json() {
        let (pipeline, _) = pipeline(FakeProvider::with_response("Sorry, I only speak prose."));

        let envelope = pipeline.generate_envelope(&request()).await;
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"recipes": [], "error": "No valid JSON found in response"})
        );
    }

    #[tokio::test]
    async fn test_generate_envelope_invalid_json() {
        let (pipeline, _) = pipeline(FakeProvider::with_response("{\"recipes\": [ {\"recipe_name\""));

        let envelope = pipeline.generate_envelope(&request()).await;
        assert_eq!(envelope.error.as_deref(), Some("Invalid JSON format"));
        assert!(envelope.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_generate_envelope_backend_failure() {
        let (pipeline, _) = pipeline(FakeProvider::failing(
            ErrorKind::BackendUnreachable,
            "could not reach backend",
        ));

        let envelope = pipeline.generate_envelope(&request()).await;
        assert_eq!(envelope.error.as_deref(), Some("could not reach backend"));
    }

    #[tokio::test]
    async fn test_generate_keeps_error_kind() {
        let (pipeline, _) = pipeline(FakeProvider::with_response("no braces here"));

        let err = pipeline.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoJsonFound);
        assert_eq!(err.operation(), "pipeline::generate");
        assert_eq!(err.context_value("called"), Some("extract::json_object"));
    }

    #[tokio::test]
    async fn test_generate_raw_uses_interactive_template() {
        let (pipeline, provider) = pipeline(FakeProvider::with_response("1. Shakshuka ..."));

        let text = pipeline
            .generate_raw(&request().with_detailed(true).with_macros(true))
            .await
            .unwrap();

        assert_eq!(text, "1. Shakshuka ...");
        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("Ingredients on hand: eggs, spinach"));
        assert!(prompt.contains("calories, protein, carbohydrates and fat"));
    }
}
