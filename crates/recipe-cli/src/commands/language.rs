use recipe_core::{Language, locale::save_language};

use super::Context;

pub fn handle(ctx: &Context, code: Option<Language>) {
    match code {
        None => println!("{}", ctx.language),
        Some(language) => {
            save_language(ctx.store.backend(), language);
            tracing::info!(from = %ctx.language, to = %language, "language preference changed");
            println!("{language}");
        }
    }
}
