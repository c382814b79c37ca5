use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized recipe, as generated, relayed and persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Free-form text such as `"30 minutes"`.
    pub cooking_time: String,
    /// Kept exactly as the model wrote it; see [`Recipe::difficulty_level`].
    pub difficulty: String,
    /// The three ingredients the user asked for.
    pub user_ingredients: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Comma-separated benefit terms. Absent for records the model gave none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_benefits: Option<String>,
}

impl Recipe {
    /// Builds a recipe id for entry `index` of a generated batch.
    pub fn generated_id(created_at: DateTime<Utc>, index: usize) -> String {
        format!("recipe-{}-{index}", created_at.timestamp_millis())
    }

    /// Builds an id for a record that did not come out of generation.
    pub fn manual_id(created_at: DateTime<Utc>) -> String {
        format!(
            "recipe-{}-{}",
            created_at.timestamp_millis(),
            uuid::Uuid::new_v4()
        )
    }

    /// Parses the stored difficulty, if it names a known level.
    pub fn difficulty_level(&self) -> Option<Difficulty> {
        Difficulty::parse(&self.difficulty)
    }

    /// Returns the health benefits when present and not blank.
    pub fn health_benefits(&self) -> Option<&str> {
        self.health_benefits
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Difficulty levels the prompt asks the model to choose from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive; accepts the English and German level names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" | "einfach" => Some(Self::Easy),
            "medium" | "mittel" => Some(Self::Medium),
            "hard" | "schwer" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown difficulty: {s}"))
    }
}
