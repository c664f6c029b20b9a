//! # Pantry CLI
//!
//! Recipe suggestions from a local Ollama model, in the terminal.
//!
//! Usage:
//!   pantry
//!   pantry generate -i chicken,garlic -n 2
//!   pantry --model mistral generate -i eggs --summary
//!   OLLAMA_HOST=gpu-box:11434 pantry

mod interactive;

use clap::{Parser, Subcommand};
use interactive::{run_session, Prompter};
use pantry_core::provider::DEFAULT_OLLAMA_URL;
use pantry_core::{
    LlmProvider, OllamaProvider, ProviderConfig, RecipeEnvelope, RecipePipeline, RecipeRequest,
};
use pantry_error::{Error, Result};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_MODEL: &str = "llama3.1";

#[derive(Parser)]
#[command(name = "pantry")]
#[command(author, version, about = "Pantry - turn what's in the fridge into recipes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Ollama base URL (host:port is accepted)
    #[arg(long, env = "OLLAMA_HOST", default_value = DEFAULT_OLLAMA_URL, global = true)]
    ollama_url: String,

    /// Model name passed to the backend
    #[arg(short, long, env = "PANTRY_CLI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Backend request timeout; unset waits indefinitely
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for ingredients and options at the prompt (default)
    Interactive,
    /// Generate JSON recipes once and print them
    Generate {
        /// Ingredients, comma-separated or repeated
        #[arg(short, long, value_delimiter = ',', required = true)]
        ingredients: Vec<String>,

        /// Number of recipes
        #[arg(short = 'n', long, default_value_t = 1, allow_negative_numbers = true)]
        count: i64,

        /// Print one line per recipe instead of JSON
        #[arg(long)]
        summary: bool,
    },
}

impl Cli {
    fn provider_config(&self) -> ProviderConfig {
        let config = ProviderConfig::ollama(&self.model).with_base_url(&self.ollama_url);
        match self.timeout_secs {
            Some(secs) => config.with_timeout(secs),
            None => config,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Warning to show before the session when the backend is down or the
/// model is not pulled
async fn check_backend(provider: &OllamaProvider) -> Option<String> {
    match provider.health_check().await {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            warn!(backend = provider.base_url(), "model backend is not responding");
            return Some(format!(
                "Warning: could not reach Ollama at {}. Start it with `ollama serve`.",
                provider.base_url()
            ));
        }
    }

    match provider.list_models().await {
        Ok(models) => {
            let wanted = provider.model();
            let installed = models
                .iter()
                .any(|m| m == wanted || m.split(':').next() == Some(wanted));
            if installed {
                None
            } else {
                Some(format!(
                    "Warning: model '{}' is not installed. Run `ollama pull {}`.",
                    wanted, wanted
                ))
            }
        }
        Err(e) => {
            debug!(error = %e, "could not list models");
            None
        }
    }
}

async fn interactive(provider: OllamaProvider) -> Result<()> {
    if let Some(warning) = check_backend(&provider).await {
        eprintln!("{}", warning);
    }

    let pipeline = RecipePipeline::new(Arc::new(provider));
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    run_session(&pipeline, &mut prompter).await
}

/// Print the envelope for one request.
///
/// The envelope is printed even when generation failed; the failure is then
/// returned with its original kind so the process exits non-zero.
async fn generate<W: Write>(
    pipeline: &RecipePipeline,
    request: &RecipeRequest,
    summary: bool,
    out: &mut W,
) -> Result<()> {
    let (envelope, failure) = match pipeline.generate(request).await {
        Ok(value) => (RecipeEnvelope::from_model_object(value), None),
        Err(err) => (RecipeEnvelope::from_error(&err), Some(err)),
    };

    if summary {
        for (i, recipe) in envelope.typed_recipes().iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, recipe.summary())?;
        }
    } else {
        let json = serde_json::to_string_pretty(&envelope).map_err(|e| {
            Error::unexpected(format!("failed to encode recipes: {}", e)).set_source(e)
        })?;
        writeln!(out, "{}", json)?;
    }

    match failure {
        Some(err) => Err(err.with_operation("cli::generate")),
        None => Ok(()),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let provider = OllamaProvider::new(cli.provider_config())?;

    match cli.command {
        None | Some(Commands::Interactive) => interactive(provider).await,
        Some(Commands::Generate {
            ingredients,
            count,
            summary,
        }) => {
            let request = RecipeRequest::new(ingredients, count)?;
            let pipeline = RecipePipeline::new(Arc::new(provider));
            generate(&pipeline, &request, summary, &mut io::stdout().lock()).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e.message());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::{ErrorKind, FakeProvider};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_is_interactive() {
        let cli = Cli::try_parse_from(["pantry"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "pantry",
            "generate",
            "-i",
            "chicken,garlic",
            "-i",
            "rice",
            "-n",
            "3",
            "--model",
            "mistral",
            "--ollama-url",
            "gpu-box:11434",
        ])
        .unwrap();

        let config = cli.provider_config();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.base_url, "http://gpu-box:11434");

        match cli.command {
            Some(Commands::Generate {
                ingredients,
                count,
                summary,
            }) => {
                assert_eq!(ingredients, ["chicken", "garlic", "rice"]);
                assert_eq!(count, 3);
                assert!(!summary);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_requires_ingredients() {
        assert!(Cli::try_parse_from(["pantry", "generate"]).is_err());
    }

    const OMELETTE_REPLY: &str = r#"Here are your recipes:
{"recipes": [
    {"recipe_name": "Cheese Omelette", "cooking_time": "10 minutes", "difficulty": "Easy"},
    {"recipe_name": "Egg Fried Rice"}
]}"#;

    fn pipeline_with(provider: FakeProvider) -> RecipePipeline {
        RecipePipeline::new(Arc::new(provider))
    }

    fn eggs() -> RecipeRequest {
        RecipeRequest::new(["eggs", "cheese"], 2).unwrap()
    }

    #[tokio::test]
    async fn test_generate_prints_pretty_envelope() {
        let pipeline = pipeline_with(FakeProvider::with_response(OMELETTE_REPLY));
        let mut out = Vec::new();

        generate(&pipeline, &eggs(), false, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n  \"recipes\": ["));
        let printed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(printed["recipes"][0]["recipe_name"], "Cheese Omelette");
        assert_eq!(printed["recipes"][1]["recipe_name"], "Egg Fried Rice");
        assert!(printed.get("error").is_none());
    }

    #[tokio::test]
    async fn test_generate_summary_lines() {
        let pipeline = pipeline_with(FakeProvider::with_response(OMELETTE_REPLY));
        let mut out = Vec::new();

        generate(&pipeline, &eggs(), true, &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1. Cheese Omelette (10 minutes, Easy)\n2. Egg Fried Rice\n"
        );
    }

    #[tokio::test]
    async fn test_generate_failure_keeps_kind_and_prints_envelope() {
        let pipeline = pipeline_with(FakeProvider::with_response("Sorry, no recipes today."));
        let mut out = Vec::new();

        let err = generate(&pipeline, &eggs(), false, &mut out).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoJsonFound);
        assert_eq!(err.operation(), "cli::generate");
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            printed,
            serde_json::json!({"recipes": [], "error": "No valid JSON found in response"})
        );
    }

    #[tokio::test]
    async fn test_generate_backend_down() {
        let pipeline = pipeline_with(FakeProvider::failing(
            ErrorKind::BackendUnreachable,
            "could not reach backend",
        ));
        let mut out = Vec::new();

        let err = generate(&pipeline, &eggs(), true, &mut out).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BackendUnreachable);
        assert!(out.is_empty());
    }

    async fn tags_server(models: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(models))
            .mount(&server)
            .await;
        server
    }

    fn ollama_at(url: impl Into<String>, model: &str) -> OllamaProvider {
        OllamaProvider::new(ProviderConfig::ollama(model).with_base_url(url)).unwrap()
    }

    #[tokio::test]
    async fn test_check_backend_model_installed() {
        let server = tags_server(serde_json::json!({"models": [{"name": "llama3.1:8b"}]})).await;

        assert_eq!(check_backend(&ollama_at(server.uri(), "llama3.1")).await, None);
        assert_eq!(check_backend(&ollama_at(server.uri(), "llama3.1:8b")).await, None);
    }

    #[tokio::test]
    async fn test_check_backend_model_missing() {
        let server = tags_server(serde_json::json!({"models": [{"name": "llama3.2:latest"}]})).await;

        let warning = check_backend(&ollama_at(server.uri(), "mistral")).await.unwrap();
        assert!(warning.contains("model 'mistral' is not installed"));
        assert!(warning.contains("ollama pull mistral"));
    }

    #[tokio::test]
    async fn test_check_backend_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let warning = check_backend(&ollama_at(server.uri(), "llama3.1")).await.unwrap();
        assert!(warning.contains("could not reach Ollama"));
    }

    #[tokio::test]
    async fn test_check_backend_unreachable() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let warning = check_backend(&ollama_at(addr.to_string(), "llama3.1")).await.unwrap();
        assert!(warning.contains(&format!("could not reach Ollama at http://{}", addr)));
    }
}
