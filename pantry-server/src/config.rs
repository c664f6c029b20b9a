//! Server configuration from flags and environment

use clap::Parser;
use pantry_core::provider::DEFAULT_OLLAMA_URL;
use pantry_core::ProviderConfig;

pub const DEFAULT_MODEL: &str = "llama3.2";

#[derive(Debug, Clone, Parser)]
#[command(name = "pantry-server")]
#[command(author, version, about = "Pantry - recipe suggestions over HTTP from a local LLM")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "PANTRY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PANTRY_PORT", default_value_t = 5001)]
    pub port: u16,

    /// Ollama base URL (host:port is accepted)
    #[arg(long, env = "OLLAMA_HOST", default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_url: String,

    /// Model name passed to the backend
    #[arg(short, long, env = "PANTRY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Backend request timeout; unset waits indefinitely
    #[arg(long, env = "PANTRY_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "PANTRY_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        let config = ProviderConfig::ollama(&self.model).with_base_url(&self.ollama_url);
        match self.timeout_secs {
            Some(secs) => config.with_timeout(secs),
            None => config,
        }
    }
}
