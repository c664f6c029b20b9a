//! Terminal prompt loop
//!
//! Asks for one field at a time, re-asking until the answer is usable, then
//! prints whatever the model wrote. End of input ends the session.

use pantry_core::{split_ingredients, RecipePipeline, RecipeRequest};
use pantry_error::Result;
use std::io::{BufRead, Write};
use tracing::debug;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// One trimmed line, or `None` at end of input
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn ask_ingredients(&mut self) -> Result<Option<Vec<String>>> {
        loop {
            let Some(line) = self.ask("Enter your ingredients (comma-separated): ")? else {
                return Ok(None);
            };
            let ingredients = split_ingredients(&line);
            if !ingredients.is_empty() {
                return Ok(Some(ingredients));
            }
            self.say("Please enter at least one ingredient.")?;
        }
    }

    pub fn ask_count(&mut self) -> Result<Option<u32>> {
        loop {
            let Some(line) = self.ask("How many recipes would you like? ")? else {
                return Ok(None);
            };
            match line.parse::<u32>() {
                Ok(count) if count >= 1 => return Ok(Some(count)),
                _ => self.say("Please enter a whole number of at least 1.")?,
            }
        }
    }

    pub fn ask_yes_no(&mut self, question: &str) -> Result<Option<bool>> {
        loop {
            let Some(line) = self.ask(question)? else {
                return Ok(None);
            };
            match line.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => self.say("Please answer y or n.")?,
            }
        }
    }
}

/// Collect a request, then generate until the user declines
pub async fn run_session<R: BufRead, W: Write>(
    pipeline: &RecipePipeline,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    prompter.say("Welcome to Pantry! Tell me what you have and I'll suggest recipes.\n")?;

    let Some(ingredients) = prompter.ask_ingredients()? else {
        return Ok(());
    };
    let Some(count) = prompter.ask_count()? else {
        return Ok(());
    };
    let Some(detailed) = prompter.ask_yes_no("Would you like detailed recipes? (y/n): ")? else {
        return Ok(());
    };
    let Some(macros) =
        prompter.ask_yes_no("Include macros (calories, protein, carbs, fat)? (y/n): ")?
    else {
        return Ok(());
    };

    let request = RecipeRequest::new(ingredients, i64::from(count))?
        .with_detailed(detailed)
        .with_macros(macros);
    debug!(?request, "interactive request");

    loop {
        prompter.say(&format!("\nGenerating {} recipe(s)...\n", request.num_recipes()))?;

        match pipeline.generate_raw(&request).await {
            Ok(text) => prompter.say(&text)?,
            Err(err) => {
                debug!(error = %err, "generation failed");
                prompter.say(&format!("Error: {}", err.message()))?;
                if err.is_retryable() {
                    prompter.say(&format!(
                        "Is the model backend running? (model: {})",
                        pipeline.provider().model()
                    ))?;
                }
            }
        }

        match prompter.ask_yes_no("\nGenerate more recipes with the same ingredients? (y/n): ")? {
            Some(true) => continue,
            _ => break,
        }
    }

    prompter.say("Happy cooking!")?;
    Ok(())
}
