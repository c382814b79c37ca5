use std::io::Write as _;

use recipe_core::{Language, MessageKey, Notice, NoticeLevel, Notifier, Recipe};

/// Prints notices to stderr so stdout stays clean for recipe text.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", notice_line(&notice));
    }
}

pub fn notice_line(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Error => "✗",
        NoticeLevel::Info => "•",
    };
    format!("{marker} {}", notice.message)
}

/// Redraws the progress line in place.
pub fn show_progress(percent: u8, message: &str) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r{}", progress_line(percent, message));
    let _ = stderr.flush();
}

pub fn end_progress() {
    eprintln!();
}

fn progress_line(percent: u8, message: &str) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(percent.min(100)) * WIDTH / 100;
    format!(
        "[{}{}] {percent:>3}% {message}",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled)
    )
}

/// Full recipe view: copy text plus health benefits and id.
pub fn recipe_view(recipe: &Recipe, language: Language) -> String {
    let mut view = recipe_core::export::render_recipe_text(recipe, language);
    if let Some(benefits) = recipe.health_benefits() {
        view.push_str(&format!(
            "\n\n{}: {benefits}",
            language.text(MessageKey::HealthBenefits)
        ));
    }
    view.push_str(&format!("\n\nid: {}", recipe.id));
    view
}

/// Heading above a recipe in a freshly generated batch.
pub fn batch_heading(position: usize, saved: bool, language: Language) -> String {
    if saved {
        format!("#{position} [{}]", language.text(MessageKey::Saved))
    } else {
        format!("#{position}")
    }
}

/// One-line summary used by listings.
pub fn recipe_summary(recipe: &Recipe) -> String {
    format!(
        "{}  {}  ({}, {})",
        recipe.id, recipe.title, recipe.difficulty, recipe.cooking_time
    )
}
