use anyhow::{Context as _, bail};
use futures::StreamExt as _;
use recipe_core::{
    EventStreamReader, GenerationOutcome, Language, MessageKey, Notice, NoticeLevel, Notifier,
    Recipe, StreamEvent, SyntheticProgress, ValidIngredients,
};
use serde_json::{Value, json};
use tracing::{debug, error};

use super::Context;
use crate::console::{self, ConsoleNotifier};

const GENERATE_PATH: &str = "/api/generate-recipes";

/// Which recipes of a finished batch to keep.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SaveSelection {
    #[default]
    Nothing,
    All,
    /// 1-based positions in the printed batch.
    Positions(Vec<usize>),
}

impl SaveSelection {
    pub fn from_args(positions: Vec<usize>, all: bool) -> Self {
        if all {
            Self::All
        } else if positions.is_empty() {
            Self::Nothing
        } else {
            Self::Positions(positions)
        }
    }
}

pub async fn handle(
    ctx: &Context,
    server: &str,
    ingredients: &[String],
    language: Language,
    selection: &SaveSelection,
) -> anyhow::Result<()> {
    let notifier = ConsoleNotifier;
    let notify = |level, key| notifier.notify(Notice::new(level, language.text(key)));

    let ingredients = match ValidIngredients::new(ingredients) {
        Ok(valid) => valid,
        Err(err) => {
            notify(NoticeLevel::Error, MessageKey::ExactlyThreeIngredients);
            return Err(err.into());
        }
    };

    let recipes = match request_recipes(server, &ingredients, language).await {
        Ok(GenerationOutcome::Completed(recipes)) => recipes,
        Ok(GenerationOutcome::Failed(message)) => {
            notifier.notify(Notice::new(NoticeLevel::Error, message.clone()));
            bail!("generation failed: {message}");
        }
        Ok(GenerationOutcome::Interrupted) => {
            notify(NoticeLevel::Error, MessageKey::FailedToGenerate);
            bail!("generation stream ended before a result");
        }
        Err(err) => {
            error!(error = %err, "recipe request failed");
            notify(NoticeLevel::Error, MessageKey::FailedToGenerate);
            return Err(err);
        }
    };

    notify(NoticeLevel::Success, MessageKey::RecipesGenerated);
    let saved = save_selected(ctx, &recipes, selection);
    print_batch(ctx, &recipes, language);
    if saved? > 0 {
        notify(NoticeLevel::Success, MessageKey::RecipeSaved);
    }
    Ok(())
}

/// Stores the selected recipes and returns how many were saved. A position
/// outside the batch rejects the whole selection before anything is written.
fn save_selected(
    ctx: &Context,
    recipes: &[Recipe],
    selection: &SaveSelection,
) -> anyhow::Result<usize> {
    let chosen: Vec<&Recipe> = match selection {
        SaveSelection::Nothing => Vec::new(),
        SaveSelection::All => recipes.iter().collect(),
        SaveSelection::Positions(positions) => {
            let mut positions = positions.clone();
            positions.sort_unstable();
            positions.dedup();
            positions
                .into_iter()
                .map(|position| {
                    position
                        .checked_sub(1)
                        .and_then(|index| recipes.get(index))
                        .with_context(|| {
                            format!("no recipe #{position} in this batch (1-{})", recipes.len())
                        })
                })
                .collect::<anyhow::Result<_>>()?
        }
    };
    for recipe in &chosen {
        ctx.store.save(recipe);
    }
    Ok(chosen.len())
}

/// Posts the ingredients and reads the event stream to its outcome.
async fn request_recipes(
    server: &str,
    ingredients: &ValidIngredients,
    language: Language,
) -> anyhow::Result<GenerationOutcome> {
    let url = format!("{}{GENERATE_PATH}", server.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .json(&request_body(ingredients, language))
        .send()
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    let status = response.status();
    if !status.is_success() {
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unexpected response");
        bail!("server answered {status}: {message}");
    }

    let mut reader = EventStreamReader::default();
    let mut progress = SyntheticProgress::default();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.context("failed to read recipe stream")?;
        for event in reader.push_chunk(&chunk) {
            let percent = progress.observe(&event);
            if let StreamEvent::Processing { message } = &event {
                console::show_progress(percent, message);
            }
        }
        if reader.is_finished() {
            break;
        }
    }
    console::end_progress();
    debug!(percent = progress.percent(), "recipe stream closed");
    Ok(reader.outcome())
}

fn request_body(ingredients: &ValidIngredients, language: Language) -> Value {
    json!({
        "ingredients": ingredients.as_slice(),
        "language": language.code(),
    })
}

fn print_batch(ctx: &Context, recipes: &[Recipe], language: Language) {
    for (index, recipe) in recipes.iter().enumerate() {
        if index > 0 {
            println!("\n---\n");
        }
        let saved = ctx.store.contains(&recipe.id);
        println!("{}", console::batch_heading(index + 1, saved, language));
        println!("{}", console::recipe_view(recipe, language));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(dir: &std::path::Path) -> (Context, Vec<Recipe>) {
        let created_at = chrono::Utc::now();
        let recipes = (0..3)
            .map(|index| Recipe {
                id: Recipe::generated_id(created_at, index),
                title: format!("Dish {}", index + 1),
                ingredients: vec!["milk".into()],
                instructions: vec!["stir".into()],
                cooking_time: "10 minutes".into(),
                difficulty: "Easy".into(),
                user_ingredients: vec!["milk".into(), "flour".into(), "eggs".into()],
                created_at,
                health_benefits: None,
            })
            .collect();
        (Context::open(dir), recipes)
    }

    #[test]
    fn saving_one_position_keeps_only_that_recipe() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (ctx, recipes) = batch(dir.path());

        let saved = save_selected(&ctx, &recipes, &SaveSelection::Positions(vec![2, 2]))
            .expect("save");

        assert_eq!(saved, 1);
        let stored = ctx.store.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Dish 2");
        assert!(ctx.store.contains(&recipes[1].id));
        assert!(!ctx.store.contains(&recipes[0].id));
        assert!(!ctx.store.contains(&recipes[2].id));
    }

    #[test]
    fn out_of_range_position_saves_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (ctx, recipes) = batch(dir.path());

        for positions in [vec![1, 4], vec![0]] {
            let err = save_selected(&ctx, &recipes, &SaveSelection::Positions(positions))
                .expect_err("out of range");
            assert!(err.to_string().contains("in this batch (1-3)"), "{err}");
        }
        assert!(ctx.store.list().is_empty());
    }

    #[test]
    fn save_all_and_nothing_cover_the_whole_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (ctx, recipes) = batch(dir.path());

        assert_eq!(save_selected(&ctx, &recipes, &SaveSelection::Nothing).expect("none"), 0);
        assert!(ctx.store.list().is_empty());
        assert_eq!(save_selected(&ctx, &recipes, &SaveSelection::All).expect("all"), 3);
        assert!(recipes.iter().all(|recipe| ctx.store.contains(&recipe.id)));
    }

    #[test]
    fn selection_from_flags() {
        assert_eq!(SaveSelection::from_args(vec![], false), SaveSelection::Nothing);
        assert_eq!(SaveSelection::from_args(vec![3], false), SaveSelection::Positions(vec![3]));
        assert_eq!(SaveSelection::from_args(vec![], true), SaveSelection::All);
    }

    #[test]
    fn body_carries_trimmed_ingredients_and_language_code() {
        let ingredients = ValidIngredients::new([" milk", "flour", "eggs"]).expect("valid");
        assert_eq!(
            request_body(&ingredients, Language::De),
            json!({"ingredients": ["milk", "flour", "eggs"], "language": "de"})
        );
    }

    #[tokio::test]
    async fn wrong_ingredient_count_fails_before_any_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = Context::open(dir.path());
        let two = vec!["milk".to_string(), "flour".to_string()];

        let err = handle(&ctx, "http://127.0.0.1:9", &two, Language::En, &SaveSelection::All)
            .await
            .expect_err("rejected");
        assert!(err.to_string().contains("exactly 3 ingredients"));
    }
}
