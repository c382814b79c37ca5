use std::collections::VecDeque;
use std::convert::Infallible;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use futures::{Stream, StreamExt as _, stream};
use recipe_ai_harness::{ByteStream, ChatMessage, ProviderRequest};
use recipe_core::{
    RecipeStreamParser, StreamEvent, event::UPSTREAM_FAILURE_MESSAGE, prompt::build_prompt,
    validate_ingredients,
};
use tracing::{error, info};

use crate::{error::ApiError, state::AppState};

/// `POST /api/generate-recipes`
///
/// Validates the body, starts the upstream completion and relays it as a
/// stream of `data: <event>` frames.
pub async fn generate_recipes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = validate_ingredients(&body)?;
    let prompt = build_prompt(&request.ingredients, request.language);
    let provider_request = ProviderRequest::new(state.model.clone(), vec![ChatMessage::user(prompt)])
        .options(state.options.clone());
    let request_id = provider_request.request_id;
    info!(
        %request_id,
        language = %request.language,
        ingredients = %request.ingredients.joined(),
        "generating recipes"
    );

    let handle = state.provider.start_stream(provider_request).await?;
    info!(
        %request_id,
        provider = %state.provider.id(),
        upstream_request_id = %handle.metadata.provider_request_id.as_deref().unwrap_or("-"),
        status = handle.metadata.status_code.unwrap_or_default(),
        "upstream stream accepted"
    );
    let parser = RecipeStreamParser::new(request.ingredients);
    let mut response = Body::from_stream(relay_events(handle.stream, parser)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}

/// Feeds upstream chunks through the parser and yields encoded frames.
///
/// Reading stops as soon as the parser has emitted its terminal event; the
/// upstream body is dropped with the stream.
fn relay_events(
    upstream: ByteStream,
    parser: RecipeStreamParser,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
    struct Relay {
        upstream: ByteStream,
        parser: RecipeStreamParser,
        pending: VecDeque<StreamEvent>,
        done: bool,
    }

    stream::unfold(
        Relay {
            upstream,
            parser,
            pending: VecDeque::new(),
            done: false,
        },
        |mut relay| async move {
            loop {
                if let Some(event) = relay.pending.pop_front() {
                    match event.to_frame() {
                        Ok(frame) => return Some((Ok(Bytes::from(frame)), relay)),
                        Err(err) => {
                            error!(error = %err, "failed to encode stream event");
                            continue;
                        }
                    }
                }
                if relay.done {
                    return None;
                }

                match relay.upstream.next().await {
                    Some(Ok(chunk)) => {
                        relay.pending.extend(relay.parser.push_chunk(&chunk));
                        relay.done = relay.parser.is_terminated();
                    }
                    Some(Err(err)) => {
                        error!(error = %err, "upstream stream failed mid-response");
                        relay
                            .pending
                            .push_back(StreamEvent::error(UPSTREAM_FAILURE_MESSAGE));
                        relay.done = true;
                    }
                    None => {
                        relay.parser.finish();
                        relay.done = true;
                    }
                }
            }
        },
    )
}
