//! Local persistence for saved recipes.
//!
//! [`KeyValueStore`] is the slot-based storage the client runs on (one
//! string value per key). [`RecipeStore`] keeps the saved list in a single
//! slot and rewrites the whole list on every change; concurrent writers are
//! not coordinated and the last write wins.
//!
//! Store operations never return errors. Failures are logged and the
//! operation falls back to a safe default.

use std::collections::HashMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::StorageError;
use crate::recipe::Recipe;

/// Slot holding the JSON array of saved recipes.
pub const SAVED_RECIPES_KEY: &str = "saved_recipes";

/// String slots addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        slots.remove(key);
        Ok(())
    }
}

/// Directory-backed store: slot `k` lives in `<root>/k.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::io(key, e))?;
        // staged beside the slot and renamed over it; readers never see a partial file
        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.root).map_err(|e| StorageError::io(key, e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| StorageError::io(key, e))?;
        tmp.persist(self.slot_path(key))
            .map(|_| ())
            .map_err(|e| StorageError::io(key, e.error))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(key, err)),
        }
    }
}

/// Logs a failed operation and substitutes `fallback`.
pub(crate) fn recover<T, E: std::fmt::Display>(op: &str, result: Result<T, E>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!(op, error = %err, "storage operation failed");
            fallback
        }
    }
}

/// The saved-recipes list.
#[derive(Debug)]
pub struct RecipeStore<S> {
    store: S,
}

impl<S: KeyValueStore> RecipeStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Appends a recipe and rewrites the list.
    pub fn save(&self, recipe: &Recipe) {
        let mut recipes = self.list();
        recipes.push(recipe.clone());
        recover("save recipe", self.write(&recipes), ());
    }

    /// Reads the list. Unreadable or corrupted contents read as empty.
    pub fn list(&self) -> Vec<Recipe> {
        let raw = recover("list recipes", self.store.get(SAVED_RECIPES_KEY), None);
        let Some(raw) = raw else {
            return Vec::new();
        };
        let parsed = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(err) => {
                error!(error = %err, "saved recipes are not valid JSON");
                return Vec::new();
            }
        };
        let Value::Array(items) = parsed else {
            warn!("saved recipes slot does not hold a list");
            return Vec::new();
        };
        let read_at = Utc::now();
        items
            .iter()
            .filter_map(|item| read_stored_recipe(item, read_at))
            .collect()
    }

    /// Removes every record with `id`; unknown ids leave the list untouched.
    pub fn remove(&self, id: &str) {
        let recipes: Vec<Recipe> = self.list().into_iter().filter(|r| r.id != id).collect();
        recover("remove recipe", self.write(&recipes), ());
    }

    /// Deletes the whole slot.
    pub fn clear(&self) {
        recover("clear recipes", self.store.remove(SAVED_RECIPES_KEY), ());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list().iter().any(|r| r.id == id)
    }

    fn write(&self, recipes: &[Recipe]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(recipes).map_err(|source| StorageError::Encode {
            key: SAVED_RECIPES_KEY.to_string(),
            source,
        })?;
        self.store.set(SAVED_RECIPES_KEY, &encoded)
    }
}

/// Tolerant read of one stored entry.
///
/// Older records may lack `healthBenefits` (read as `""`) or carry a
/// `createdAt` that no longer parses (read as `read_at`).
fn read_stored_recipe(item: &Value, read_at: DateTime<Utc>) -> Option<Recipe> {
    let Value::Object(fields) = item else {
        warn!("skipping saved recipe entry that is not an object");
        return None;
    };
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let list = |key: &str| -> Vec<String> {
        fields
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    };
    let created_at = fields
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(read_at);
    let health_benefits = match fields.get("healthBenefits") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    Some(Recipe {
        id: text("id"),
        title: text("title"),
        ingredients: list("ingredients"),
        instructions: list("instructions"),
        cooking_time: text("cookingTime"),
        difficulty: text("difficulty"),
        user_ingredients: list("userIngredients"),
        created_at,
        health_benefits: Some(health_benefits),
    })
}
