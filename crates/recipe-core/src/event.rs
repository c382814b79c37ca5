use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;

/// Liveness message carried by every `processing` event.
pub const PROCESSING_MESSAGE: &str = "Generating recipes...";
/// Terminal message when the accumulated model output is not valid JSON.
pub const CORRUPT_OUTPUT_MESSAGE: &str = "Failed to process generated recipes";
/// Terminal message when the upstream stream breaks mid-flight.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to generate recipes";

/// Status messages relayed from the generation route to its client.
///
/// Serialized as `{"status": "...", ...}`, one per `data: ` frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StreamEvent {
    /// The model produced another fragment. Not a progress measure.
    Processing {
        #[serde(default)]
        message: String,
    },
    /// Terminal success with every normalized recipe.
    Completed {
        #[serde(default)]
        recipes: Vec<Recipe>,
    },
    /// Terminal failure with a fixed human-readable message.
    Error {
        #[serde(default)]
        message: String,
    },
}

impl StreamEvent {
    pub fn processing() -> Self {
        Self::Processing {
            message: PROCESSING_MESSAGE.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// True for `completed` and `error`; nothing follows a terminal event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Error { .. })
    }

    /// Encodes the event as one `data: <json>\n\n` frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}
