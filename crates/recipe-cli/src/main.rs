//! Command-line client for the recipe generator.

mod commands;
mod console;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recipe_core::{Difficulty, Language};

#[derive(Parser, Debug)]
#[command(name = "recipes")]
#[command(about = "Generate recipes from three ingredients and keep the ones you like")]
#[command(version)]
struct Cli {
    /// Directory holding saved recipes and preferences
    #[arg(long, global = true, env = "RECIPE_DATA_DIR", default_value = "./.recipe-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate 4-5 recipes from exactly three ingredients
    Generate {
        /// The three main ingredients
        #[arg(required = true, num_args = 1..)]
        ingredients: Vec<String>,

        /// Recipe backend base URL
        #[arg(long, env = "RECIPE_SERVER_URL", default_value = "http://127.0.0.1:3000")]
        server: String,

        /// Language for this run (defaults to the saved preference)
        #[arg(short, long)]
        language: Option<Language>,

        /// Save the recipe at this position of the printed batch (1-based, repeatable)
        #[arg(long = "save", value_name = "N")]
        save: Vec<usize>,

        /// Save every generated recipe
        #[arg(long, conflicts_with = "save")]
        save_all: bool,
    },

    /// Manage saved recipes
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },

    /// Show or change the preferred language (en or de)
    Language {
        /// New language; omit to print the current one
        code: Option<Language>,
    },
}

#[derive(Subcommand, Debug)]
enum SavedCommand {
    /// List saved recipes
    List {
        /// Only recipes of this difficulty (easy/einfach, medium/mittel, hard/schwer)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Print one saved recipe
    Show { id: String },
    /// Print a recipe as plain text for pasting elsewhere
    Copy { id: String },
    /// Save a recipe written by hand
    Add {
        #[arg(long)]
        title: String,
        /// Repeat for each ingredient
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Repeat for each step, in order
        #[arg(long = "step")]
        instructions: Vec<String>,
        #[arg(long, default_value = "Time varies")]
        cooking_time: String,
        #[arg(long, default_value = "Easy")]
        difficulty: String,
        #[arg(long)]
        health_benefits: Option<String>,
    },
    /// Remove one saved recipe
    Remove { id: String },
    /// Remove every saved recipe
    Clear,
    /// Write all saved recipes into one document
    Export {
        /// Target directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    recipe_core::observability::init_observability();

    let cli = Cli::parse();
    let ctx = commands::Context::open(&cli.data_dir);

    match cli.command {
        Commands::Generate {
            ingredients,
            server,
            language,
            save,
            save_all,
        } => {
            let language = language.unwrap_or(ctx.language);
            let selection = commands::generate::SaveSelection::from_args(save, save_all);
            commands::generate::handle(&ctx, &server, &ingredients, language, &selection).await?;
        }
        Commands::Saved { command } => match command {
            SavedCommand::List { difficulty } => commands::saved::list(&ctx, difficulty),
            SavedCommand::Show { id } => commands::saved::show(&ctx, &id)?,
            SavedCommand::Copy { id } => commands::saved::copy(&ctx, &id)?,
            SavedCommand::Add {
                title,
                ingredients,
                instructions,
                cooking_time,
                difficulty,
                health_benefits,
            } => commands::saved::add(
                &ctx,
                commands::saved::ManualRecipe {
                    title,
                    ingredients,
                    instructions,
                    cooking_time,
                    difficulty,
                    health_benefits,
                },
            ),
            SavedCommand::Remove { id } => commands::saved::remove(&ctx, &id),
            SavedCommand::Clear => commands::saved::clear(&ctx),
            SavedCommand::Export { out } => commands::saved::export(&ctx, out)?,
        },
        Commands::Language { code } => commands::language::handle(&ctx, code),
    }

    Ok(())
}
