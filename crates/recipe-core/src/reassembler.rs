//! Stream reassembly on both ends of the generation route.
//!
//! [`RecipeStreamParser`] runs on the server against the upstream
//! chat-completions stream and produces [`StreamEvent`]s. [`EventStreamReader`]
//! is its client-side mirror and turns the relayed frames back into events.
//! Both share [`LineFramer`], so chunk boundaries may fall anywhere, including
//! inside a multi-byte character, the `data: ` tag or the `[DONE]` sentinel.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::event::{CORRUPT_OUTPUT_MESSAGE, StreamEvent};
use crate::framing::{DONE_SENTINEL, LineFramer, data_payload};
use crate::normalize::RecipeNormalizer;
use crate::recipe::Recipe;
use crate::validation::ValidIngredients;

/// Source of the creation time stamped on a generated batch.
pub type Clock = fn() -> DateTime<Utc>;

/// Server-side parser for one upstream generation stream.
#[derive(Debug)]
pub struct RecipeStreamParser {
    framer: LineFramer,
    content: String,
    ingredients: ValidIngredients,
    clock: Clock,
    fragments: u64,
    terminated: bool,
}

impl RecipeStreamParser {
    pub fn new(ingredients: ValidIngredients) -> Self {
        Self {
            framer: LineFramer::default(),
            content: String::new(),
            ingredients,
            clock: Utc::now,
            fragments: 0,
            terminated: false,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Feeds one transport chunk and returns the events it completes.
    ///
    /// Once `[DONE]` has been seen the parser is terminated and ignores any
    /// further input.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.terminated {
            return events;
        }
        for line in self.framer.push(chunk) {
            let Some(payload) = data_payload(&line) else {
                continue;
            };
            if payload == DONE_SENTINEL {
                events.push(self.complete());
                self.terminated = true;
                break;
            }
            match serde_json::from_str::<Value>(payload) {
                Ok(fragment) => {
                    self.content.push_str(delta_text(&fragment));
                    self.fragments += 1;
                    events.push(StreamEvent::processing());
                }
                Err(err) => {
                    debug!(error = %err, "skipping malformed stream fragment");
                }
            }
        }
        events
    }

    /// Marks the end of the upstream body.
    ///
    /// Never produces an event: a stream that closes before `[DONE]` has no
    /// terminal event and the client must treat that as a failure. Returns
    /// whether a terminal event was emitted at some point.
    pub fn finish(&mut self) -> bool {
        let tail = self.framer.finish();
        if !self.terminated {
            warn!(
                fragments = self.fragments,
                unterminated_bytes = tail.len(),
                "upstream stream ended without [DONE]"
            );
        }
        let emitted = self.terminated;
        self.terminated = true;
        emitted
    }

    /// Text accumulated from all deltas so far (the terminal buffer).
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn complete(&self) -> StreamEvent {
        match serde_json::from_str::<Value>(&self.content) {
            Ok(reply) => {
                let normalizer = RecipeNormalizer::new(&self.ingredients, (self.clock)());
                let recipes = normalizer.normalize_reply(&reply);
                info!(
                    fragments = self.fragments,
                    recipes = recipes.len(),
                    "generation stream completed"
                );
                StreamEvent::Completed { recipes }
            }
            Err(err) => {
                error!(
                    error = %err,
                    content_len = self.content.len(),
                    "failed to parse final model output"
                );
                StreamEvent::error(CORRUPT_OUTPUT_MESSAGE)
            }
        }
    }
}

/// Content delta of a chat-completions chunk; empty when absent.
fn delta_text(fragment: &Value) -> &str {
    fragment
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// How a generation request ended, as seen by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed(Vec<Recipe>),
    Failed(String),
    /// The stream closed without a `completed` or `error` event.
    Interrupted,
}

/// Client-side reader for the relayed `data: <StreamEvent>` frames.
#[derive(Debug, Default)]
pub struct EventStreamReader {
    framer: LineFramer,
    terminal: Option<StreamEvent>,
    ended: bool,
}

impl EventStreamReader {
    /// Feeds one chunk of the response body. Malformed frames are skipped.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.ended {
            return events;
        }
        for line in self.framer.push(chunk) {
            let Some(payload) = data_payload(&line) else {
                continue;
            };
            if payload == DONE_SENTINEL {
                self.ended = true;
                break;
            }
            match serde_json::from_str::<StreamEvent>(payload) {
                Ok(event) => {
                    let terminal = event.is_terminal();
                    if terminal {
                        self.terminal = Some(event.clone());
                        self.ended = true;
                    }
                    events.push(event);
                    if terminal {
                        break;
                    }
                }
                Err(err) => {
                    debug!(error = %err, "skipping malformed event frame");
                }
            }
        }
        events
    }

    /// True once a terminal event or `[DONE]` has been read.
    pub fn is_finished(&self) -> bool {
        self.ended
    }

    pub fn outcome(self) -> GenerationOutcome {
        match self.terminal {
            Some(StreamEvent::Completed { recipes }) => GenerationOutcome::Completed(recipes),
            Some(StreamEvent::Error { message }) => GenerationOutcome::Failed(message),
            _ => GenerationOutcome::Interrupted,
        }
    }
}

/// Cosmetic progress percentage for a running generation.
///
/// Each `processing` event nudges it by 10 up to 90; completion jumps to 100.
/// The number of events says nothing about how much output remains, so this
/// is an animation, not a measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyntheticProgress {
    percent: u8,
}

impl SyntheticProgress {
    pub fn observe(&mut self, event: &StreamEvent) -> u8 {
        match event {
            StreamEvent::Processing { .. } => self.percent = (self.percent + 10).min(90),
            StreamEvent::Completed { .. } => self.percent = 100,
            StreamEvent::Error { .. } => {}
        }
        self.percent
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }
}
