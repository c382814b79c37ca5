/// Rejected generation input. The display text is safe to show to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Body was not a JSON object.
    #[error("Invalid request body")]
    MalformedBody,
    /// `ingredients` missing, not a list, or not exactly three entries long.
    #[error("Please provide exactly 3 ingredients")]
    WrongCount,
    /// Three entries were given but some were blank or not strings.
    #[error("All 3 ingredients must be provided")]
    BlankIngredient,
}

/// Failure of the underlying key-value storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error ({key}): {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage encode error ({key}): {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }
}

/// Failure while building or delivering an exported document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export target is not usable: {0}")]
    Target(String),
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
}
