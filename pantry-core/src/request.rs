//! Recipe requests and their validation
//!
//! A `RecipeRequest` can only be built with at least one ingredient and a
//! recipe count of at least one, so everything downstream can rely on both.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;

pub const MSG_NO_DATA: &str = "No data provided";
pub const MSG_MISSING_PARAMETERS: &str = "Missing required parameters";
pub const MSG_EMPTY_INGREDIENTS: &str = "Ingredients list cannot be empty";
pub const MSG_COUNT_TOO_SMALL: &str = "Number of recipes must be at least 1";

/// A single recipe generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRequest {
    ingredients: Vec<String>,
    num_recipes: u32,
    detailed: bool,
    include_macros: bool,
}

impl RecipeRequest {
    /// Validate and build a request.
    ///
    /// Ingredients are trimmed and blank entries dropped before the
    /// emptiness check.
    pub fn new<I, S>(ingredients: I, num_recipes: i64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ingredients: Vec<String> = ingredients
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if ingredients.is_empty() {
            return Err(Error::invalid_request(MSG_EMPTY_INGREDIENTS)
                .with_operation("request::new"));
        }

        if num_recipes < 1 {
            return Err(Error::invalid_request(MSG_COUNT_TOO_SMALL)
                .with_operation("request::new")
                .with_context("num_recipes", num_recipes.to_string()));
        }

        let num_recipes = u32::try_from(num_recipes).map_err(|_| {
            Error::invalid_request(format!("Number of recipes is too large: {}", num_recipes))
                .with_operation("request::new")
        })?;

        Ok(Self {
            ingredients,
            num_recipes,
            detailed: false,
            include_macros: false,
        })
    }

    /// Build a request from an HTTP JSON body.
    ///
    /// Checks run in a fixed order: body present, both fields present,
    /// count is an integer, ingredients non-empty, count at least one.
    pub fn from_json(body: &Value) -> Result<Self> {
        if is_falsy(body) {
            return Err(Error::invalid_request(MSG_NO_DATA).with_operation("request::from_json"));
        }

        let (ingredients, num_recipes) = match body {
            Value::Object(map) => match (map.get("ingredients"), map.get("num_recipes")) {
                (Some(ingredients), Some(num_recipes)) => (ingredients, num_recipes),
                _ => {
                    return Err(Error::invalid_request(MSG_MISSING_PARAMETERS)
                        .with_operation("request::from_json"))
                }
            },
            _ => {
                return Err(Error::invalid_request(MSG_MISSING_PARAMETERS)
                    .with_operation("request::from_json"))
            }
        };

        let num_recipes = coerce_count(num_recipes)?;
        let ingredients = coerce_ingredients(ingredients)?;

        let mut request = Self::new(ingredients, num_recipes)
            .map_err(|e| e.with_operation("request::from_json"))?;

        if let Some(detailed) = body.get("detailed").and_then(Value::as_bool) {
            request.detailed = detailed;
        }
        if let Some(include_macros) = body.get("include_macros").and_then(Value::as_bool) {
            request.include_macros = include_macros;
        }

        Ok(request)
    }

    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn with_macros(mut self, include_macros: bool) -> Self {
        self.include_macros = include_macros;
        self
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn num_recipes(&self) -> u32 {
        self.num_recipes
    }

    pub fn detailed(&self) -> bool {
        self.detailed
    }

    pub fn include_macros(&self) -> bool {
        self.include_macros
    }

    /// Ingredients joined the way they appear in prompts
    pub fn ingredients_text(&self) -> String {
        self.ingredients.join(", ")
    }
}

/// Split a comma-separated ingredient line, dropping blank pieces
pub fn split_ingredients(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Integer conversion with the usual truncation: floats round toward zero,
/// booleans count as 0 or 1, strings must hold a whole number.
fn coerce_count(value: &Value) -> Result<i64> {
    let invalid = || {
        Error::invalid_request(format!("invalid literal for num_recipes: {}", value))
            .with_operation("request::coerce_count")
    };

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f.abs() < i64::MAX as f64 {
                    Ok(f.trunc() as i64)
                } else {
                    Err(invalid())
                }
            } else {
                // u64 beyond i64 range
                Err(invalid())
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Accepts a list of strings or a single comma-separated string
fn coerce_ingredients(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(split_ingredients(s)),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()),
        _ => Err(Error::invalid_request(
            "ingredients must be a list or a comma-separated string",
        )
        .with_operation("request::coerce_ingredients")),
    }
}
