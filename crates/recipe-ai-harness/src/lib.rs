//! Streaming chat-completion client used by the recipe backend.
//!
//! The harness stops at the byte level: a provider returns the raw
//! `text/event-stream` body and callers do their own framing. Vendor-specific
//! APIs are namespaced under `vendors::*`.
//!
//! ```no_run
//! use futures::StreamExt as _;
//! use recipe_ai_harness::vendors::openai::OpenAiProvider;
//! use recipe_ai_harness::{ChatMessage, ModelRef, ProviderAdapter, ProviderRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAiProvider::from_env()?;
//! let request = ProviderRequest::new(
//!     ModelRef::new("openai", "gpt-4.1-mini"),
//!     vec![ChatMessage::user("Say hello")],
//! );
//! let mut handle = provider.start_stream(request).await?;
//! while let Some(chunk) = handle.stream.next().await {
//!     print!("{}", String::from_utf8_lossy(&chunk?));
//! }
//! # Ok(())
//! # }
//! ```

/// Chat messages sent to a model.
pub mod content;
/// Public error types used by the harness API.
pub mod errors;
/// Model and provider identifiers plus generation options.
pub mod model;
/// Provider adapter contracts used by vendor integrations.
pub mod provider;
/// Vendor-specific integrations.
pub mod vendors;

pub use content::{ChatMessage, ChatRole};
pub use errors::{HarnessError, ProviderError};
pub use model::{GenerationOptions, ModelRef, ProviderId};
pub use provider::{
    ByteStream, ProviderAdapter, ProviderRequest, ProviderResponseMeta, ProviderStreamHandle,
};
