use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, recover};

/// Storage slot holding the preferred language.
pub const LANGUAGE_KEY: &str = "language";

/// Languages the generator and its messages support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    /// `"de"` selects German; anything else falls back to English.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("de") => Self::De,
            _ => Self::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }

    /// Looks up a message, falling back to English.
    pub fn text(&self, key: MessageKey) -> &'static str {
        match self {
            Self::De => german(key).unwrap_or_else(|| english(key)),
            Self::En => english(key),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Messages shown outside of any page layout: notices and text labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Difficulty,
    CookingTime,
    Ingredients,
    Instructions,
    HealthBenefits,
    CollectionTitle,
    GeneratedOn,
    NoRecipesToExport,
    RecipesExported,
    FailedToExport,
    RecipeCopied,
    RecipeSaved,
    RecipesGenerated,
    ExactlyThreeIngredients,
    FailedToGenerate,
    NoSavedRecipes,
    Saved,
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Difficulty => "Difficulty",
        MessageKey::CookingTime => "Cooking Time",
        MessageKey::Ingredients => "Ingredients",
        MessageKey::Instructions => "Instructions",
        MessageKey::HealthBenefits => "Health Benefits",
        MessageKey::CollectionTitle => "My Recipe Collection",
        MessageKey::GeneratedOn => "Generated on",
        MessageKey::NoRecipesToExport => "No recipes to export",
        MessageKey::RecipesExported => "Recipes exported successfully!",
        MessageKey::FailedToExport => "Failed to export recipes. Please try again.",
        MessageKey::RecipeCopied => "Recipe copied to clipboard!",
        MessageKey::RecipeSaved => "Recipe saved successfully!",
        MessageKey::RecipesGenerated => "Recipes generated successfully!",
        MessageKey::ExactlyThreeIngredients => "Please enter exactly 3 ingredients",
        MessageKey::FailedToGenerate => "Failed to generate recipes. Please try again.",
        MessageKey::NoSavedRecipes => "No saved recipes yet",
        MessageKey::Saved => "Saved",
    }
}

// Collection title and date label only appear in the exported document,
// which always uses the English layout.
fn german(key: MessageKey) -> Option<&'static str> {
    let text = match key {
        MessageKey::Difficulty => "Schwierigkeit",
        MessageKey::CookingTime => "Kochzeit",
        MessageKey::Ingredients => "Zutaten",
        MessageKey::Instructions => "Anleitung",
        MessageKey::HealthBenefits => "Gesundheitsvorteile",
        MessageKey::NoRecipesToExport => "Keine Rezepte zum Exportieren",
        MessageKey::RecipesExported => "Rezepte erfolgreich exportiert!",
        MessageKey::FailedToExport => "Rezepte konnten nicht exportiert werden",
        MessageKey::RecipeCopied => "Rezept in die Zwischenablage kopiert!",
        MessageKey::RecipeSaved => "Rezept erfolgreich gespeichert!",
        MessageKey::RecipesGenerated => "Rezepte erfolgreich generiert!",
        MessageKey::ExactlyThreeIngredients => "Bitte gib genau 3 Zutaten ein",
        MessageKey::FailedToGenerate => {
            "Rezepte konnten nicht generiert werden. Bitte versuche es erneut."
        }
        MessageKey::NoSavedRecipes => "Noch keine gespeicherten Rezepte",
        MessageKey::Saved => "Gespeichert",
        MessageKey::CollectionTitle | MessageKey::GeneratedOn => return None,
    };
    Some(text)
}

/// Reads the persisted language; absent or unknown values mean English.
pub fn load_language<S: KeyValueStore>(store: &S) -> Language {
    let raw = recover("load language", store.get(LANGUAGE_KEY), None);
    raw.and_then(|text| serde_json::from_str::<Language>(&text).ok())
        .unwrap_or_default()
}

/// Persists a language change. Failures are logged, never returned.
pub fn save_language<S: KeyValueStore>(store: &S, language: Language) {
    let encoded = format!("\"{}\"", language.code());
    recover("save language", store.set(LANGUAGE_KEY, &encoded), ());
}
