//! Recipe envelope returned to callers, plus a best-effort typed view

use crate::{Error, ErrorKind};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const MSG_NO_JSON: &str = "No valid JSON found in response";
pub const MSG_INVALID_JSON: &str = "Invalid JSON format";

/// `{"recipes": [...]}` on success, `{"recipes": [], "error": "..."}` on failure.
///
/// Whatever else the model put next to `recipes` is kept in `extra` and
/// serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeEnvelope {
    #[serde(default)]
    pub recipes: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecipeEnvelope {
    /// Wrap the object decoded from model output.
    ///
    /// A missing `recipes` key gives an empty list; a `recipes` value that is
    /// not a list becomes a one-element list.
    pub fn from_model_object(value: Value) -> Self {
        let mut extra = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("recipes".to_string(), other);
                map
            }
        };

        let recipes = match extra.remove("recipes") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        };

        Self {
            recipes,
            error: None,
            extra,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            recipes: Vec::new(),
            error: Some(message.into()),
            extra: Map::new(),
        }
    }

    /// Fold a pipeline error into an envelope.
    ///
    /// Extraction failures use fixed messages; backend failures carry the
    /// error's own message.
    pub fn from_error(err: &Error) -> Self {
        match err.kind() {
            ErrorKind::NoJsonFound => Self::failed(MSG_NO_JSON),
            ErrorKind::InvalidJson => Self::failed(MSG_INVALID_JSON),
            _ => Self::failed(err.message()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Recipes that decode into the typed view; others are skipped
    pub fn typed_recipes(&self) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter_map(|value| Recipe::deserialize(value).ok())
            .collect()
    }

    pub fn recipe_names(&self) -> Vec<String> {
        self.typed_recipes()
            .into_iter()
            .filter_map(|r| r.recipe_name)
            .collect()
    }
}

/// Typed view of one recipe. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub recipe_name: Option<String>,
    pub cooking_time: Option<String>,
    pub difficulty: Option<String>,
    pub nutrition: Option<Nutrition>,
    #[serde(deserialize_with = "one_or_many")]
    pub ingredients_list: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub instructions: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    #[serde(deserialize_with = "text")]
    pub calories: Option<String>,
    #[serde(deserialize_with = "text")]
    pub protein: Option<String>,
}

impl Recipe {
    /// `Name (30 minutes, Easy)` style single line
    pub fn summary(&self) -> String {
        let name = self.recipe_name.as_deref().unwrap_or("Untitled recipe");
        let details: Vec<&str> = [self.cooking_time.as_deref(), self.difficulty.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if details.is_empty() {
            name.to_string()
        } else {
            format!("{} ({})", name, details.join(", "))
        }
    }
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

// Models return numbers where text was asked for.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?))
}

// A single string where a list was asked for is common.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(value_text).collect(),
        other => value_text(other).into_iter().collect(),
    })
}
