use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, bail};
use chrono::Utc;
use recipe_core::{
    DirectoryDownloadSink, Difficulty, DocumentExporter, ExportOutcome, MessageKey, Notice,
    NoticeLevel, Notifier, Recipe, export::render_recipe_text,
};

use super::Context;
use crate::console::{ConsoleNotifier, recipe_summary, recipe_view};

/// Fields of a recipe entered by hand.
#[derive(Debug)]
pub struct ManualRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: String,
    pub difficulty: String,
    pub health_benefits: Option<String>,
}

impl ManualRecipe {
    fn into_recipe(self) -> Recipe {
        let created_at = Utc::now();
        Recipe {
            id: Recipe::manual_id(created_at),
            title: self.title,
            ingredients: self.ingredients,
            instructions: self.instructions,
            cooking_time: self.cooking_time,
            difficulty: self.difficulty,
            user_ingredients: Vec::new(),
            created_at,
            health_benefits: self.health_benefits,
        }
    }
}

pub fn list(ctx: &Context, difficulty: Option<Difficulty>) {
    let recipes = filter_by_difficulty(ctx.store.list(), difficulty);
    if recipes.is_empty() {
        ConsoleNotifier.notify(Notice::new(
            NoticeLevel::Info,
            ctx.language.text(MessageKey::NoSavedRecipes),
        ));
        return;
    }
    for recipe in &recipes {
        println!("{}", recipe_summary(recipe));
    }
}

pub fn show(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let recipe = find(ctx, id)?;
    println!("{}", recipe_view(&recipe, ctx.language));
    Ok(())
}

/// Prints the plain copy text to stdout, ready to pipe into a clipboard tool.
pub fn copy(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let recipe = find(ctx, id)?;
    println!("{}", render_recipe_text(&recipe, ctx.language));
    ConsoleNotifier.notify(Notice::new(
        NoticeLevel::Success,
        ctx.language.text(MessageKey::RecipeCopied),
    ));
    Ok(())
}

pub fn add(ctx: &Context, manual: ManualRecipe) {
    let recipe = manual.into_recipe();
    ctx.store.save(&recipe);
    println!("{}", recipe.id);
    ConsoleNotifier.notify(Notice::new(
        NoticeLevel::Success,
        ctx.language.text(MessageKey::RecipeSaved),
    ));
}

pub fn remove(ctx: &Context, id: &str) {
    if !ctx.store.contains(id) {
        tracing::warn!(id, "no saved recipe with this id");
    }
    ctx.store.remove(id);
}

pub fn clear(ctx: &Context) {
    ctx.store.clear();
}

pub fn export(ctx: &Context, out: PathBuf) -> anyhow::Result<()> {
    let exporter = DocumentExporter::new(
        Arc::new(DirectoryDownloadSink::new(out)),
        Arc::new(ConsoleNotifier),
    )
    .language(ctx.language);
    match exporter.export(&ctx.store.list()) {
        ExportOutcome::Delivered(path) => {
            println!("{}", path.display());
            Ok(())
        }
        ExportOutcome::Empty => Ok(()),
        ExportOutcome::Failed => bail!("export failed"),
    }
}

fn find(ctx: &Context, id: &str) -> anyhow::Result<Recipe> {
    ctx.store
        .list()
        .into_iter()
        .find(|r| r.id == id)
        .with_context(|| format!("no saved recipe with id {id}"))
}

fn filter_by_difficulty(recipes: Vec<Recipe>, difficulty: Option<Difficulty>) -> Vec<Recipe> {
    match difficulty {
        None => recipes,
        Some(level) => recipes
            .into_iter()
            .filter(|r| r.difficulty_level() == Some(level))
            .collect(),
    }
}
