//! Route tests for the recipe backend, driven through the router with a
//! scripted provider in place of the model API.

use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode, header},
};
use backend::{AppState, create_router};
use recipe_ai_harness::{
    ByteStream, ProviderAdapter, ProviderError, ProviderId, ProviderRequest,
    ProviderResponseMeta, ProviderStreamHandle,
};
use recipe_core::StreamEvent;
use serde_json::{Value, json};
use tower::util::ServiceExt as _;

/// Replays canned SSE chunks, or fails before streaming.
struct ScriptedProvider {
    chunks: Vec<&'static str>,
    fail_with_status: Option<u16>,
    upstream_request_id: Option<&'static str>,
    seen: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn streaming(chunks: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            fail_with_status: None,
            upstream_request_id: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            fail_with_status: Some(status),
            upstream_request_id: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn with_upstream_request_id(chunks: Vec<&'static str>, id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            fail_with_status: None,
            upstream_request_id: Some(id),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        let seen = self.seen.lock().expect("lock");
        seen.last().expect("provider was called").messages[0]
            .content
            .clone()
    }

    fn calls(&self) -> usize {
        self.seen.lock().expect("lock").len()
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new("scripted")
    }

    async fn start_stream(
        &self,
        req: ProviderRequest,
    ) -> Result<ProviderStreamHandle, ProviderError> {
        self.seen.lock().expect("lock").push(req);
        if let Some(status) = self.fail_with_status {
            return Err(ProviderError::provider(
                "scripted",
                "upstream refused the request",
                Some(status),
            ));
        }
        let chunks: Vec<Result<Bytes, ProviderError>> = self
            .chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect();
        let stream: ByteStream = Box::pin(futures::stream::iter(chunks));
        Ok(ProviderStreamHandle {
            stream,
            metadata: ProviderResponseMeta {
                status_code: Some(200),
                provider_request_id: self.upstream_request_id.map(str::to_owned),
            },
        })
    }
}

fn app(provider: Arc<ScriptedProvider>) -> axum::Router {
    create_router(AppState::new(provider, "test-model"))
}

fn post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate-recipes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request")
}

async fn body_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

async fn body_json(body: Body) -> Value {
    serde_json::from_str(&body_text(body).await).expect("json body")
}

fn events(body: &str) -> Vec<StreamEvent> {
    body.split("\n\n")
        .filter(|frame| !frame.is_empty())
        .map(|frame| {
            let payload = frame.strip_prefix("data: ").expect("data frame");
            serde_json::from_str(payload).expect("event json")
        })
        .collect()
}

const RECIPE_STREAM: [&str; 4] = [
    "data: {\"choices\":[{\"delta\":{\"content\":\"{\\\"recipes\\\":[{\\\"title\\\":\\\"Pfann\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"kuchen\\\",\\\"difficulty\\\":\\\"Einfach\\\",\\\"benefits\\\":\\\"gut-friendly\\\"}]}\"}}]}\n",
    "\ndata: [DO",
    "NE]\n\n",
];

#[tokio::test]
async fn streams_progress_then_normalized_recipes() {
    let provider = ScriptedProvider::streaming(RECIPE_STREAM.to_vec());
    let response = app(provider.clone())
        .oneshot(post(r#"{"ingredients":[" milk","flour","eggs "],"language":"de"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

    let events = events(&body_text(response.into_body()).await);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], StreamEvent::processing());
    assert_eq!(events[1], StreamEvent::processing());
    let StreamEvent::Completed { recipes } = &events[2] else {
        panic!("expected completed event, got {:?}", events[2]);
    };
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Pfannkuchen");
    assert_eq!(recipes[0].difficulty, "Einfach");
    assert_eq!(recipes[0].cooking_time, "Time varies");
    assert_eq!(recipes[0].health_benefits.as_deref(), Some("gut-friendly"));
    assert_eq!(recipes[0].user_ingredients, ["milk", "flour", "eggs"]);
    assert!(recipes[0].id.starts_with("recipe-") && recipes[0].id.ends_with("-0"));

    let prompt = provider.last_prompt();
    assert!(prompt.starts_with("Generiere genau 4-5"));
    assert!(prompt.contains("milk, flour, eggs"));
}

#[tokio::test]
async fn unparsable_model_output_ends_with_error_event() {
    let provider = ScriptedProvider::streaming(vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"not json\"}}]}\n\n",
        "data: [DONE]\n\n",
    ]);
    let response = app(provider)
        .oneshot(post(r#"{"ingredients":["a","b","c"]}"#))
        .await
        .expect("response");

    let events = events(&body_text(response.into_body()).await);
    assert_eq!(
        events.last(),
        Some(&StreamEvent::error("Failed to process generated recipes"))
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[tokio::test]
async fn invalid_inputs_are_rejected_without_calling_the_model() {
    let cases = [
        ("{oops", "Invalid request body"),
        (r#"["a","b","c"]"#, "Invalid request body"),
        (r#"{"language":"en"}"#, "Please provide exactly 3 ingredients"),
        (r#"{"ingredients":"a,b,c"}"#, "Please provide exactly 3 ingredients"),
        (r#"{"ingredients":["a","b"]}"#, "Please provide exactly 3 ingredients"),
        (r#"{"ingredients":["a","b","  "]}"#, "All 3 ingredients must be provided"),
        (r#"{"ingredients":["a",7,"c"]}"#, "All 3 ingredients must be provided"),
    ];

    for (body, message) in cases {
        let provider = ScriptedProvider::streaming(RECIPE_STREAM.to_vec());
        let response = app(provider.clone())
            .oneshot(post(body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(response.into_body()).await, json!({ "error": message }));
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test]
async fn upstream_rejection_is_a_generic_server_error() {
    let response = app(ScriptedProvider::failing(401))
        .oneshot(post(r#"{"ingredients":["a","b","c"]}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({ "error": "Failed to generate recipes" }));
}

#[tokio::test]
async fn english_is_the_default_language() {
    let provider = ScriptedProvider::streaming(RECIPE_STREAM.to_vec());
    let response = app(provider.clone())
        .oneshot(post(r#"{"ingredients":["a","b","c"],"language":"fr"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let _ = body_text(response.into_body()).await;
    assert!(provider.last_prompt().starts_with("Generate exactly 4-5"));
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("lock")).into_owned()
    }
}

#[tokio::test]
async fn accepted_stream_logs_the_upstream_request_id() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let provider = ScriptedProvider::with_upstream_request_id(RECIPE_STREAM.to_vec(), "req_abc123");
    let response = app(provider)
        .oneshot(post(r#"{"ingredients":["a","b","c"]}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let _ = body_text(response.into_body()).await;

    let text = logs.text();
    let line = text
        .lines()
        .find(|line| line.contains("upstream stream accepted"))
        .expect("accepted log line");
    assert!(line.contains("upstream_request_id=req_abc123"), "{line}");
    assert!(line.contains("provider=scripted"), "{line}");
    assert!(line.contains("status=200"), "{line}");
}

#[tokio::test]
async fn health_reports_service_identity() {
    let response = app(ScriptedProvider::streaming(Vec::new()))
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "recipe-backend");
}
