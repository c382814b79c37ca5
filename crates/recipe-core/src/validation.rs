use serde_json::Value;

use crate::error::ValidationError;
use crate::locale::Language;

/// A generation request that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    pub ingredients: ValidIngredients,
    pub language: Language,
}

/// Validates a raw `POST /api/generate-recipes` body.
///
/// The body must be a JSON object; its `ingredients` field is checked with
/// [`ValidIngredients::from_json`] and `language` selects German only when it
/// is exactly `"de"`.
pub fn validate_ingredients(body: &[u8]) -> Result<GenerateRequest, ValidationError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ValidationError::MalformedBody)?;
    let Some(fields) = value.as_object() else {
        return Err(ValidationError::MalformedBody);
    };
    Ok(GenerateRequest {
        ingredients: ValidIngredients::from_json(fields.get("ingredients"))?,
        language: Language::from_code(fields.get("language").and_then(Value::as_str)),
    })
}

/// Exactly three non-blank, trimmed ingredients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidIngredients([String; 3]);

impl ValidIngredients {
    /// Validates already-typed input (used by clients before sending).
    pub fn new<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Result<Self, ValidationError> {
        let items: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
        if items.len() != 3 {
            return Err(ValidationError::WrongCount);
        }
        Self::from_entries(items.into_iter().map(Some))
    }

    /// Validates the `ingredients` field of a raw request body.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        let Some(entries) = value.and_then(Value::as_array) else {
            return Err(ValidationError::WrongCount);
        };
        if entries.len() != 3 {
            return Err(ValidationError::WrongCount);
        }
        Self::from_entries(entries.iter().map(|v| v.as_str().map(str::to_owned)))
    }

    fn from_entries(entries: impl Iterator<Item = Option<String>>) -> Result<Self, ValidationError> {
        let filled: Vec<String> = entries
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let items: [String; 3] = filled
            .try_into()
            .map_err(|_| ValidationError::BlankIngredient)?;
        Ok(Self(items))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }

    /// `"a, b, c"`, as it appears in the prompt.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}
