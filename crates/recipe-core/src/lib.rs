//! Core of the recipe generator.
//!
//! Everything here is transport-agnostic: the HTTP server and the CLI client
//! feed bytes in and take [`StreamEvent`]s and [`Recipe`]s out.
//!
//! ```
//! use recipe_core::{RecipeStreamParser, StreamEvent, ValidIngredients};
//!
//! let ingredients = ValidIngredients::new(["milk", "flour", "eggs"]).unwrap();
//! let mut parser = RecipeStreamParser::new(ingredients);
//!
//! let mut events = parser.push_chunk(
//!     b"data: {\"choices\":[{\"delta\":{\"content\":\"{\\\"recipes\\\":[]}\"}}]}\n\n",
//! );
//! events.extend(parser.push_chunk(b"data: [DONE]\n\n"));
//!
//! assert!(matches!(events.last(), Some(StreamEvent::Completed { .. })));
//! ```

/// Error types shared by validation, storage and export.
pub mod error;
/// Stream events relayed from the server to its clients.
pub mod event;
/// User-visible notices and document export.
pub mod export;
/// Incremental UTF-8 decoding and `data: ` line framing.
pub mod framing;
/// Language selection, message catalog and persisted preference.
pub mod locale;
/// Mapping of model output onto recipe records.
pub mod normalize;
/// Process-wide tracing initialization.
pub mod observability;
/// Prompt text sent to the model.
pub mod prompt;
/// Server- and client-side stream reassembly.
pub mod reassembler;
/// Recipe record and difficulty helper.
pub mod recipe;
/// Key-value storage and the saved-recipes store.
pub mod storage;
/// Request input validation.
pub mod validation;

pub use error::{ExportError, StorageError, ValidationError};
pub use event::StreamEvent;
pub use export::{
    DirectoryDownloadSink, DocumentExporter, DownloadSink, ExportDates, ExportOutcome,
    ExportedDocument, Notice, NoticeLevel, Notifier,
};
pub use locale::{Language, MessageKey};
pub use normalize::RecipeNormalizer;
pub use reassembler::{EventStreamReader, GenerationOutcome, RecipeStreamParser, SyntheticProgress};
pub use recipe::{Difficulty, Recipe};
pub use storage::{FileStore, KeyValueStore, MemoryStore, RecipeStore};
pub use validation::{GenerateRequest, ValidIngredients, validate_ingredients};
