pub mod generate;
pub mod language;
pub mod saved;

use std::path::Path;

use recipe_core::{FileStore, Language, RecipeStore, locale::load_language};

/// State shared by every command: the saved-recipes store and the language
/// preference read at startup.
pub struct Context {
    pub store: RecipeStore<FileStore>,
    pub language: Language,
}

impl Context {
    pub fn open(data_dir: &Path) -> Self {
        let store = RecipeStore::new(FileStore::new(data_dir));
        let language = load_language(store.backend());
        Self { store, language }
    }
}
