//! Text-completion boundary.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::result::{AiError, AiResult};

/// A black-box text-completion service.
///
/// `stop` lists sequences at which generation should end; implementations
/// that cannot pass them to the backend must truncate the output themselves.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str, stop: &[&str]) -> AiResult<String>;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

/// Cut `text` at the earliest occurrence of any stop sequence.
pub fn truncate_at_stop<'a>(text: &'a str, stop: &[&str]) -> &'a str {
    let cut = stop
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s))
        .min()
        .unwrap_or(text.len());
    &text[..cut]
}

/// Returns the same completion for every prompt.
#[derive(Debug, Clone)]
pub struct StaticLanguageModel {
    response: String,
}

impl StaticLanguageModel {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for StaticLanguageModel {
    async fn complete(&self, _prompt: &str, stop: &[&str]) -> AiResult<String> {
        Ok(truncate_at_stop(&self.response, stop).to_string())
    }

    fn model_name(&self) -> &str {
        "static"
    }
}

/// Replays a fixed script of completions in order and records every prompt.
///
/// Used by tests and demos; once the script is exhausted every call fails.
#[derive(Debug, Default)]
pub struct ScriptedLanguageModel {
    responses: Mutex<VecDeque<AiResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLanguageModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Append a failing completion to the script.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(AiError::InferenceFailed(message.into())));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLanguageModel {
    async fn complete(&self, prompt: &str, stop: &[&str]) -> AiResult<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(truncate_at_stop(&text, stop).to_string()),
            Some(Err(e)) => Err(e),
            None => Err(AiError::InferenceFailed("script exhausted".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
