use futures::StreamExt as _;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::ProviderId;
use crate::errors::{HarnessError, ProviderError};
use crate::provider::{
    ByteStream, ProviderAdapter, ProviderRequest, ProviderResponseMeta, ProviderStreamHandle,
};

use super::config::OpenAiClientConfig;

const OPENAI_PROVIDER: &str = "openai";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Provider adapter for the chat completions API (streaming).
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiClientConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, HarnessError> {
        if config.api_key.trim().is_empty() {
            return Err(HarnessError::Config(
                "OpenAI client config api_key must not be empty".into(),
            ));
        }
        // no overall deadline; the body streams as long as the generation runs
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| HarnessError::Config(format!("failed to build OpenAI client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Creates a provider using `OPENAI_API_KEY` (or `ABACUSAI_API_KEY`).
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::new(OpenAiClientConfig::from_env()?)
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new(OPENAI_PROVIDER)
    }

    async fn start_stream(
        &self,
        req: ProviderRequest,
    ) -> Result<ProviderStreamHandle, ProviderError> {
        let provider_id = ProviderId::new(OPENAI_PROVIDER);
        let body = build_request_body(&req)?;
        debug!(request_id = %req.request_id, model = %req.model.model, "starting OpenAI chat completion stream");

        let response = self
            .client
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::transport(provider_id.clone(), format!("OpenAI request failed: {e}"))
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::provider(
                provider_id,
                format!("OpenAI chat completion failed with status {status}: {body}"),
                Some(status.as_u16()),
            ));
        }

        let metadata = response_meta(status.as_u16(), response.headers());
        let stream: ByteStream = Box::pin(response.bytes_stream().map(move |chunk| {
            chunk.map_err(|e| {
                ProviderError::transport(
                    provider_id.clone(),
                    format!("OpenAI streaming read failed: {e}"),
                )
            })
        }));

        Ok(ProviderStreamHandle { stream, metadata })
    }
}

fn response_meta(status: u16, headers: &HeaderMap) -> ProviderResponseMeta {
    ProviderResponseMeta {
        status_code: Some(status),
        provider_request_id: headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    }
}

pub(crate) fn build_request_body(req: &ProviderRequest) -> Result<serde_json::Value, ProviderError> {
    let messages: Vec<_> = req.messages.iter().filter(|m| !m.is_blank()).collect();
    if messages.is_empty() {
        return Err(ProviderError::protocol(
            OPENAI_PROVIDER,
            "chat completion needs at least one non-empty message",
        ));
    }

    let mut body = serde_json::json!({
        "model": req.model.model,
        "messages": messages,
        "stream": true,
    });
    if let Some(max_tokens) = req.options.max_tokens {
        body["max_tokens"] = max_tokens.into();
    }
    if let Some(temperature) = req.options.temperature {
        body["temperature"] = temperature.into();
    }
    if req.options.json_output {
        body["response_format"] = serde_json::json!({ "type": "json_object" });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ChatMessage;
    use crate::model::{GenerationOptions, ModelRef};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

    fn request(messages: Vec<ChatMessage>) -> ProviderRequest {
        ProviderRequest::new(ModelRef::new("openai", "gpt-4.1-mini"), messages)
    }

    #[test]
    fn body_streams_with_sampling_defaults() {
        let req = request(vec![ChatMessage::user("three ingredients")])
            .options(GenerationOptions::default().json_output(true));
        let body = build_request_body(&req).expect("body");

        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-4.1-mini",
                "messages": [{"role": "user", "content": "three ingredients"}],
                "stream": true,
                "max_tokens": 4000,
                "temperature": 0.8,
                "response_format": {"type": "json_object"},
            })
        );
    }

    #[test]
    fn unset_options_are_left_out() {
        let mut options = GenerationOptions::default();
        options.max_tokens = None;
        options.temperature = None;
        let req = request(vec![ChatMessage::system(""), ChatMessage::user("hi")]).options(options);
        let body = build_request_body(&req).expect("body");

        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
        assert!(body.get("response_format").is_none());
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn blank_conversation_is_rejected() {
        let err = build_request_body(&request(vec![ChatMessage::user(" ")])).expect_err("blank");
        assert!(matches!(err, ProviderError::Protocol { .. }));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            OpenAiProvider::new(OpenAiClientConfig::new("")),
            Err(HarnessError::Config(_))
        ));
    }

    #[test]
    fn response_meta_picks_up_vendor_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "req_123".parse().expect("header"));
        let meta = response_meta(200, &headers);
        assert_eq!(meta.status_code, Some(200));
        assert_eq!(meta.provider_request_id.as_deref(), Some("req_123"));
        assert_eq!(response_meta(200, &HeaderMap::new()).provider_request_id, None);
    }

    /// Reads head and body so the socket closes without unread input.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.expect("read request");
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            let Some(head_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let content_length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= head_end + 4 + content_length {
                return;
            }
        }
    }

    /// Serves one chunked SSE response whose chunks arrive `gap` apart.
    async fn slow_sse_server(chunks: Vec<&'static str>, gap: Duration) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            read_request(&mut socket).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\n\
                      transfer-encoding: chunked\r\nx-request-id: req_slow\r\n\r\n",
                )
                .await
                .expect("head");
            for chunk in chunks {
                tokio::time::sleep(gap).await;
                let frame = format!("{:x}\r\n{chunk}\r\n", chunk.len());
                socket.write_all(frame.as_bytes()).await.expect("chunk");
            }
            socket.write_all(b"0\r\n\r\n").await.expect("end");
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn stream_may_outlast_the_read_timeout_while_bytes_keep_arriving() {
        let frames = vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"c\"}}]}\n\n",
            "data: [DONE]\n\n",
        ];
        let base_url = slow_sse_server(frames.clone(), Duration::from_millis(400)).await;
        let provider = OpenAiProvider::new(
            OpenAiClientConfig::new("test-key")
                .base_url(base_url)
                .read_timeout(Duration::from_secs(1)),
        )
        .expect("provider");

        let mut handle = provider
            .start_stream(request(vec![ChatMessage::user("hi")]))
            .await
            .expect("start stream");
        assert_eq!(
            handle.metadata.provider_request_id.as_deref(),
            Some("req_slow")
        );

        let mut body = Vec::new();
        while let Some(chunk) = handle.stream.next().await {
            body.extend_from_slice(&chunk.expect("no timeout between steady chunks"));
        }
        assert_eq!(String::from_utf8(body).expect("utf8"), frames.concat());
    }

    #[tokio::test]
    async fn env_gated_smoke_stream_if_key_present() {
        let Ok(provider) = OpenAiProvider::from_env() else {
            eprintln!("skipping OpenAI smoke test (API key missing)");
            return;
        };
        let req = request(vec![ChatMessage::user("Reply with the word ok.")])
            .options(GenerationOptions::default().max_tokens(16));
        let mut handle = provider.start_stream(req).await.expect("start stream");

        let mut body = Vec::new();
        while let Some(chunk) = handle.stream.next().await {
            body.extend_from_slice(&chunk.expect("chunk"));
        }
        assert!(String::from_utf8_lossy(&body).contains("data: [DONE]"));
    }
}
