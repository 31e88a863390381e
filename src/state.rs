// src/state.rs
use std::sync::Arc;

use crate::config::ConfigSource;
use crate::services::openai::ChatCompletions;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: ConfigSource,
    pub completions: Arc<dyn ChatCompletions>,
}

impl AppState {
    pub fn new(config: ConfigSource, completions: Arc<dyn ChatCompletions>) -> Self {
        Self {
            config,
            completions,
        }
    }
}
