use std::sync::Arc;

use recipe_ai_harness::{GenerationOptions, ModelRef, ProviderAdapter};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ProviderAdapter>,
    pub model: ModelRef,
    pub options: GenerationOptions,
}

impl AppState {
    pub fn new(provider: Arc<dyn ProviderAdapter>, model: impl Into<String>) -> Self {
        let model = ModelRef::new(provider.id(), model);
        Self {
            provider,
            model,
            options: GenerationOptions::default().json_output(true),
        }
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}
