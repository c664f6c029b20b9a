//! Prompt templates
//!
//! Templates use `{name}` placeholders. `{{` and `}}` render as literal
//! braces, which the API template needs for its JSON example. Placeholders
//! without a value are left untouched.

use crate::RecipeRequest;

/// Template used by the HTTP service. Asks for a bare JSON object.
pub const API_TEMPLATE: &str = r#"
Using the ingredients: {ingredients}
Create {num_recipes} recipe(s).

Return ONLY a JSON object with NO additional text, formatted EXACTLY as shown:
{{
    "recipes": [
        {{
            "recipe_name": "Recipe Name",
            "cooking_time": "X minutes",
            "difficulty": "Easy/Medium/Hard",
            "nutrition": {{
                "calories": "X calories per serving",
                "protein": "X grams per serving"
            }},
            "ingredients_list": ["ingredient 1", "ingredient 2"],
            "instructions": ["Step 1", "Step 2"],
            "tips": "Cooking tips"
        }}
    ]
}}
"#;

/// Template used by the interactive CLI. Free text answer.
pub const INTERACTIVE_TEMPLATE: &str = r#"
You are an experienced home cook helping someone decide what to make.

Ingredients on hand: {ingredients}

Suggest {num_recipes} recipe(s) that use these ingredients.
{detail}
{macros}
"#;

const DETAIL_FULL: &str = "For each recipe include:
- Recipe name
- Cooking time and difficulty
- Full ingredient list with quantities
- Numbered step-by-step instructions
- Cooking tips";

const DETAIL_BASIC: &str =
    "For each recipe give the recipe name, a short ingredient list and brief instructions.";

const MACROS_ON: &str =
    "Also estimate the macros per serving: calories, protein, carbohydrates and fat.";

const MACROS_OFF: &str = "Do not include nutritional information.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// JSON-shaped template for the HTTP service
    Api,
    /// Free-text template for the terminal loop
    Interactive,
}

impl PromptTemplate {
    pub fn source(&self) -> &'static str {
        match self {
            PromptTemplate::Api => API_TEMPLATE,
            PromptTemplate::Interactive => INTERACTIVE_TEMPLATE,
        }
    }

    /// Render this template for a request.
    ///
    /// The API template ignores the detail and macro toggles.
    pub fn render(&self, request: &RecipeRequest) -> String {
        let detail = if request.detailed() { DETAIL_FULL } else { DETAIL_BASIC };
        let macros = if request.include_macros() { MACROS_ON } else { MACROS_OFF };

        substitute(
            self.source(),
            &[
                ("ingredients", request.ingredients_text()),
                ("num_recipes", request.num_recipes().to_string()),
                ("detail", detail.to_string()),
                ("macros", macros.to_string()),
            ],
        )
    }
}

/// Replace `{name}` placeholders and unescape doubled braces
pub fn substitute(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            let closed = tail[1..].find('}').map(|end| (&tail[1..=end], end + 2));
            match closed.and_then(|(name, len)| lookup(vars, name).map(|value| (value, len))) {
                Some((value, len)) => {
                    out.push_str(value);
                    rest = &tail[len..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

fn lookup<'a>(vars: &'a [(&str, String)], name: &str) -> Option<&'a str> {
    vars.iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}
