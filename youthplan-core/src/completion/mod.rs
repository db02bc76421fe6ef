//! Types for talking to a text-generation (chat completion) service.
//!
//! The core crate only describes requests and consumes the returned text.
//! The HTTP client lives in the CLI.

pub mod prompts;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::PlannerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A role-tagged prompt, before generation parameters are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a JSON object instead of prose
    pub json_response: bool,
}

/// Generation parameters shared by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub json_response: bool,
}

impl CompletionRequest {
    pub fn new(settings: &CompletionSettings, prompt: Prompt) -> Self {
        CompletionRequest {
            model: settings.model.clone(),
            messages: vec![ChatMessage::system(prompt.system), ChatMessage::user(prompt.user)],
            temperature: settings.temperature,
            max_tokens: prompt.max_tokens,
            json_response: prompt.json_response,
        }
    }
}

/// A service that turns a chat prompt into generated text.
pub trait CompletionProvider {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = PlannerResult<String>> + Send;
}
