use std::time::Duration;

use crate::errors::HarnessError;

const API_KEY_VARS: [&str; 2] = ["OPENAI_API_KEY", "ABACUSAI_API_KEY"];

/// Configuration for the OpenAI provider client.
///
/// There is no whole-request deadline: a long generation keeps streaming as
/// long as bytes keep arriving.
#[derive(Clone, Debug)]
pub struct OpenAiClientConfig {
    /// API key used for bearer auth.
    pub api_key: String,
    /// Base URL for the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Limit for establishing the connection.
    pub connect_timeout: Duration,
    /// Longest allowed silence between two reads, headers included.
    pub read_timeout: Duration,
}

impl OpenAiClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
        }
    }

    /// Builds a config from `OPENAI_API_KEY`, falling back to `ABACUSAI_API_KEY`.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        API_KEY_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| {
                HarnessError::Config(format!(
                    "missing {} for OpenAI provider",
                    API_KEY_VARS.join(" or ")
                ))
            })
    }

    /// Overrides the API base URL (for proxies or test servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub(crate) fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
