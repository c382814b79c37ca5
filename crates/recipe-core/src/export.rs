//! Plain-text export of saved recipes, plus the notice channel the client
//! uses to report outcomes to the user.
//!
//! The exported file is plain text served under a word-processor MIME type,
//! so word processors open it directly. It is not a binary `.doc`.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use tracing::{error, info};

use crate::error::ExportError;
use crate::locale::{Language, MessageKey};
use crate::recipe::Recipe;

pub const DOC_MIME_TYPE: &str = "application/msword";

/// Severity of a user-visible notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Short transient message for the user (a toast in a graphical client).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Receives user-visible notices. Implement and pass to the exporter.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Calendar dates stamped on an export.
///
/// The file name carries the UTC date, the "Generated on" heading the
/// user's local date; the two differ near midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportDates {
    pub file: NaiveDate,
    pub heading: NaiveDate,
}

impl ExportDates {
    pub fn at<Tz: TimeZone>(instant: DateTime<Utc>, local: &Tz) -> Self {
        Self {
            file: instant.date_naive(),
            heading: instant.with_timezone(local).date_naive(),
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now(), &Local)
    }
}

/// A rendered export ready to hand to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl ExportedDocument {
    pub fn build(recipes: &[Recipe], dates: ExportDates) -> Self {
        Self {
            file_name: file_name_for(dates.file),
            mime_type: DOC_MIME_TYPE,
            content: render_document(recipes, dates.heading),
        }
    }
}

/// `my-recipes-<YYYY-MM-DD>.doc`
pub fn file_name_for(date: NaiveDate) -> String {
    format!("my-recipes-{}.doc", date.format("%Y-%m-%d"))
}

/// Renders the collection layout: numbered titles, metadata lines, bulleted
/// ingredients, numbered steps and a `---` separator after every recipe.
pub fn render_document(recipes: &[Recipe], date: NaiveDate) -> String {
    let labels = Language::En;
    let mut doc = format!(
        "{}\n\n{} {}\n\n",
        labels.text(MessageKey::CollectionTitle),
        labels.text(MessageKey::GeneratedOn),
        date.format("%-m/%-d/%Y")
    );
    for (index, recipe) in recipes.iter().enumerate() {
        doc.push_str(&format!("{}. {}\n", index + 1, recipe.title));
        doc.push_str(&format!(
            "{}: {}\n",
            labels.text(MessageKey::Difficulty),
            recipe.difficulty
        ));
        doc.push_str(&format!(
            "{}: {}\n",
            labels.text(MessageKey::CookingTime),
            recipe.cooking_time
        ));
        if let Some(benefits) = recipe.health_benefits() {
            doc.push_str(&format!(
                "{}: {}\n",
                labels.text(MessageKey::HealthBenefits),
                benefits
            ));
        }
        doc.push('\n');

        doc.push_str(&format!("{}:\n", labels.text(MessageKey::Ingredients)));
        for ingredient in &recipe.ingredients {
            doc.push_str(&format!("• {ingredient}\n"));
        }
        doc.push('\n');

        doc.push_str(&format!("{}:\n", labels.text(MessageKey::Instructions)));
        for (step, instruction) in recipe.instructions.iter().enumerate() {
            doc.push_str(&format!("{}. {instruction}\n", step + 1));
        }
        doc.push_str("\n---\n\n");
    }
    doc
}

/// Single-recipe text for copying, labelled in the user's language.
pub fn render_recipe_text(recipe: &Recipe, language: Language) -> String {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|i| format!("• {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let instructions = recipe
        .instructions
        .iter()
        .enumerate()
        .map(|(n, step)| format!("{}. {step}", n + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{title}\n\n{difficulty_label}: {difficulty}\n{time_label}: {time}\n\n{ingredients_label}:\n{ingredients}\n\n{instructions_label}:\n{instructions}",
        title = recipe.title,
        difficulty_label = language.text(MessageKey::Difficulty),
        difficulty = recipe.difficulty,
        time_label = language.text(MessageKey::CookingTime),
        time = recipe.cooking_time,
        ingredients_label = language.text(MessageKey::Ingredients),
        instructions_label = language.text(MessageKey::Instructions),
    )
}

/// Hands a finished document to the user.
pub trait DownloadSink: Send + Sync {
    /// Returns where the document ended up.
    fn deliver(&self, document: &ExportedDocument) -> Result<PathBuf, ExportError>;
}

/// Saves downloads into a directory.
///
/// The content is staged in a temporary file inside the directory and then
/// renamed onto the final name; the staging file never outlives the call.
#[derive(Clone, Debug)]
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectoryDownloadSink {
    fn deliver(&self, document: &ExportedDocument) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        if !self.dir.is_dir() {
            return Err(ExportError::Target(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }
        let target = self.dir.join(&document.file_name);
        let mut staging = tempfile::NamedTempFile::new_in(&self.dir)?;
        staging.write_all(document.content.as_bytes())?;
        staging.flush()?;
        staging
            .persist(&target)
            .map_err(|err| ExportError::Io(err.error))?;
        Ok(target)
    }
}

/// Result of an export request. Failures have already been reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing to export; the user was told so.
    Empty,
    Delivered(PathBuf),
    Failed,
}

/// Exports recipe lists, reporting every outcome through a [`Notifier`].
pub struct DocumentExporter {
    sink: Arc<dyn DownloadSink>,
    notifier: Arc<dyn Notifier>,
    language: Language,
    dates: fn() -> ExportDates,
}

impl DocumentExporter {
    pub fn new(sink: Arc<dyn DownloadSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sink,
            notifier,
            language: Language::En,
            dates: ExportDates::now,
        }
    }

    /// Language of the notices (the document itself is always English).
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_dates(mut self, dates: fn() -> ExportDates) -> Self {
        self.dates = dates;
        self
    }

    pub fn export(&self, recipes: &[Recipe]) -> ExportOutcome {
        if recipes.is_empty() {
            self.notify(NoticeLevel::Info, MessageKey::NoRecipesToExport);
            return ExportOutcome::Empty;
        }
        let document = ExportedDocument::build(recipes, (self.dates)());
        match self.sink.deliver(&document) {
            Ok(path) => {
                info!(path = %path.display(), recipes = recipes.len(), "exported recipes");
                self.notify(NoticeLevel::Success, MessageKey::RecipesExported);
                ExportOutcome::Delivered(path)
            }
            Err(err) => {
                error!(error = %err, file_name = %document.file_name, "failed to export recipes");
                self.notify(NoticeLevel::Error, MessageKey::FailedToExport);
                ExportOutcome::Failed
            }
        }
    }

    fn notify(&self, level: NoticeLevel, key: MessageKey) {
        self.notifier
            .notify(Notice::new(level, self.language.text(key)));
    }
}
