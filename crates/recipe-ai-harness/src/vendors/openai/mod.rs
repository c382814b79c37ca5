//! OpenAI-compatible chat completions (OpenAI itself, or any proxy speaking
//! the same `/v1/chat/completions` protocol).
mod adapter;
mod config;

pub use adapter::OpenAiProvider;
pub use config::OpenAiClientConfig;
