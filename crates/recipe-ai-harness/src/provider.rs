use std::pin::Pin;

use bytes::Bytes;

use crate::content::ChatMessage;
use crate::errors::ProviderError;
use crate::model::{GenerationOptions, ModelRef, ProviderId};

/// Raw response body as it arrives from the provider.
pub type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<Bytes, ProviderError>> + Send + 'static>>;

/// Everything a provider needs to start one streamed completion.
#[derive(Clone, Debug)]
pub struct ProviderRequest {
    /// Correlates provider logs with the inbound request.
    pub request_id: uuid::Uuid,
    pub model: ModelRef,
    pub messages: Vec<ChatMessage>,
    pub options: GenerationOptions,
}

impl ProviderRequest {
    pub fn new(model: ModelRef, messages: Vec<ChatMessage>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4(),
            model,
            messages,
            options: GenerationOptions::default(),
        }
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Response details known once the stream has been accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderResponseMeta {
    pub status_code: Option<u16>,
    /// Provider-side request id header, when the vendor sends one.
    pub provider_request_id: Option<String>,
}

pub struct ProviderStreamHandle {
    pub stream: ByteStream,
    pub metadata: ProviderResponseMeta,
}

/// A streaming chat-completion backend.
#[async_trait::async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Sends the request and returns once the provider accepted it.
    ///
    /// A non-success HTTP status is reported here, not through the stream.
    async fn start_stream(&self, req: ProviderRequest)
    -> Result<ProviderStreamHandle, ProviderError>;
}
