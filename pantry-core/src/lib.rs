//! # Pantry core
//!
//! Turns a list of ingredients into recipes by asking a locally hosted
//! language model.
//!
//! ## Core Concepts
//! - **Request**: validated ingredients, recipe count and formatting toggles
//! - **Prompt**: fixed templates with `{placeholder}` substitution
//! - **Provider**: trait-based model client (Ollama, fake)
//! - **Extractor**: finds the first balanced JSON object in model output
//! - **Envelope**: `{recipes: [...]}` or `{recipes: [], error}` returned to callers

pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod recipe;
pub mod request;

pub use pantry_error::{Error, ErrorKind, ErrorStatus, Result};

pub use extract::extract_json_object;
pub use pipeline::RecipePipeline;
pub use prompt::PromptTemplate;
pub use provider::{FakeProvider, LlmProvider, OllamaProvider, ProviderConfig};
pub use recipe::{Nutrition, Recipe, RecipeEnvelope};
pub use request::{split_ingredients, RecipeRequest};
