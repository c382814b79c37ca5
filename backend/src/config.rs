use std::{env, net::SocketAddr, path::Path, str::FromStr};

use recipe_ai_harness::GenerationOptions;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Load `.env` files: the crate's own first, then the working directory's.
pub fn init() {
    let _ = dotenvy::from_path(Path::new(
        format!("{}/.env", env!("CARGO_MANIFEST_DIR")).as_str(),
    ));
    dotenvy::dotenv().ok();
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset, blank, or does not parse.
pub fn get_env<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(val) => val,
            Err(_) => {
                tracing::error!(key, value = %raw, "invalid environment value, using default");
                default
            }
        },
        _ => default,
    }
}

/// Server settings. The API key is read separately by the provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: options.max_tokens.unwrap_or(4000),
            temperature: options.temperature.unwrap_or(0.8),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: get_env("RECIPE_BIND_ADDR", defaults.bind_addr),
            base_url: get_env("RECIPE_LLM_BASE_URL", defaults.base_url),
            model: get_env("RECIPE_LLM_MODEL", defaults.model),
            max_tokens: get_env("RECIPE_LLM_MAX_TOKENS", defaults.max_tokens),
            temperature: get_env("RECIPE_LLM_TEMPERATURE", defaults.temperature),
        }
    }

    /// Options for every recipe request: JSON-object output on top of the
    /// configured sampling settings.
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::default()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .json_output(true)
    }
}
