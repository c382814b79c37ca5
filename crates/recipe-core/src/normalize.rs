//! Turns the loosely-typed recipe objects a model returns into [`Recipe`]s.
//!
//! Each output field has an ordered list of accepted input keys. Keys are
//! tried in order and the first one holding a usable value wins; when none
//! does, the field's documented default applies.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::recipe::Recipe;
use crate::validation::ValidIngredients;

pub const TITLE_KEYS: &[&str] = &["title"];
pub const INGREDIENTS_KEYS: &[&str] = &["ingredients"];
pub const INSTRUCTIONS_KEYS: &[&str] = &["instructions"];
pub const COOKING_TIME_KEYS: &[&str] = &["cookingTime"];
pub const DIFFICULTY_KEYS: &[&str] = &["difficulty"];
pub const HEALTH_BENEFITS_KEYS: &[&str] = &[
    "healthBenefits",
    "health_benefits",
    "health-benefits",
    "benefits",
    "gesundheitsvorteile",
];

pub const DEFAULT_TITLE: &str = "Untitled Recipe";
pub const DEFAULT_COOKING_TIME: &str = "Time varies";
pub const DEFAULT_DIFFICULTY: &str = "Easy";

/// Normalizes one generated batch.
///
/// Every recipe of a batch shares the same creation time and the caller's
/// validated ingredients; ids are `recipe-<millis>-<index>`.
#[derive(Clone, Debug)]
pub struct RecipeNormalizer {
    user_ingredients: Vec<String>,
    created_at: DateTime<Utc>,
}

impl RecipeNormalizer {
    pub fn new(ingredients: &ValidIngredients, created_at: DateTime<Utc>) -> Self {
        Self {
            user_ingredients: ingredients.to_vec(),
            created_at,
        }
    }

    /// Maps the `recipes` array of a parsed model reply. A missing or
    /// non-array `recipes` key yields an empty list.
    pub fn normalize_reply(&self, reply: &Value) -> Vec<Recipe> {
        reply
            .get("recipes")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| self.normalize_entry(index, entry))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn normalize_entry(&self, index: usize, entry: &Value) -> Recipe {
        Recipe {
            id: Recipe::generated_id(self.created_at, index),
            title: first_text(entry, TITLE_KEYS).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            ingredients: first_list(entry, INGREDIENTS_KEYS).unwrap_or_default(),
            instructions: first_list(entry, INSTRUCTIONS_KEYS).unwrap_or_default(),
            cooking_time: first_text(entry, COOKING_TIME_KEYS)
                .unwrap_or_else(|| DEFAULT_COOKING_TIME.to_string()),
            difficulty: first_text(entry, DIFFICULTY_KEYS)
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
            user_ingredients: self.user_ingredients.clone(),
            created_at: self.created_at,
            health_benefits: first_text(entry, HEALTH_BENEFITS_KEYS),
        }
    }
}

/// First alias holding a non-empty string, number or boolean.
fn first_text(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find_map(scalar_text)
}

/// First alias holding an array. An empty array still wins.
fn first_list(entry: &Value, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find_map(Value::as_array)
        .map(|items| items.iter().filter_map(scalar_text).collect())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use serde_json::json;

    fn normalizer() -> RecipeNormalizer {
        let ingredients = ValidIngredients::new(["milk", "flour", "eggs"]).expect("valid");
        RecipeNormalizer::new(&ingredients, Utc.timestamp_millis_opt(42).unwrap())
    }

    #[test]
    fn empty_entry_gets_every_default_and_no_health_benefits() {
        let recipe = normalizer().normalize_entry(0, &json!({}));
        assert_eq!(recipe.title, "Untitled Recipe");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.cooking_time, "Time varies");
        assert_eq!(recipe.difficulty, "Easy");
        assert_eq!(recipe.user_ingredients, vec!["milk", "flour", "eggs"]);
        assert_eq!(recipe.id, "recipe-42-0");
        assert_eq!(recipe.health_benefits, None);

        let value = serde_json::to_value(&recipe).expect("serialize");
        assert!(value.get("healthBenefits").is_none());
    }

    #[test]
    fn health_benefit_aliases_are_tried_in_priority_order() {
        let n = normalizer();
        let recipe = n.normalize_entry(
            0,
            &json!({"benefits": "third", "health_benefits": "second", "healthBenefits": ""}),
        );
        assert_eq!(recipe.health_benefits.as_deref(), Some("second"));

        let recipe = n.normalize_entry(0, &json!({"gesundheitsvorteile": "darmfreundlich"}));
        assert_eq!(recipe.health_benefits.as_deref(), Some("darmfreundlich"));

        let recipe = n.normalize_entry(0, &json!({"health-benefits": null}));
        assert_eq!(recipe.health_benefits, None);
    }

    #[test]
    fn model_supplied_id_and_user_ingredients_are_ignored() {
        let recipe = normalizer().normalize_entry(
            3,
            &json!({"id": "model-id", "userIngredients": ["x"], "difficulty": "MEDIUM"}),
        );
        assert_eq!(recipe.id, "recipe-42-3");
        assert_eq!(recipe.user_ingredients.len(), 3);
        assert_eq!(recipe.difficulty, "MEDIUM");
    }

    #[test]
    fn scalars_are_rendered_and_non_scalar_list_items_dropped() {
        let recipe = normalizer().normalize_entry(
            0,
            &json!({"cookingTime": 30, "ingredients": ["salt", 2, {"x": 1}, null], "instructions": []}),
        );
        assert_eq!(recipe.cooking_time, "30");
        assert_eq!(recipe.ingredients, vec!["salt", "2"]);
        assert!(recipe.instructions.is_empty());
    }

    #[test]
    fn reply_without_recipes_key_is_an_empty_batch() {
        assert!(normalizer().normalize_reply(&json!({"other": 1})).is_empty());
        assert!(normalizer().normalize_reply(&json!({"recipes": "nope"})).is_empty());
        let batch = normalizer().normalize_reply(&json!({"recipes": [{"title": "A"}, 7]}));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].title, "Untitled Recipe");
        assert_eq!(batch[1].id, "recipe-42-1");
    }
}
