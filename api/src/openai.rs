//! Thin client for the chat-completions API. One call per plan request,
//! no retries — upstream failures map straight onto response codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OpenAiConfig;
use crate::error::AppError;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API rate limit exceeded")]
    RateLimited,
    #[error("completion API rejected the configured credential")]
    Auth,
    #[error("completion API error ({status}): {detail}")]
    Api { status: u16, detail: String },
    #[error("completion API request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("completion API returned no content")]
    EmptyResponse,
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::RateLimited => AppError::UpstreamRateLimited,
            CompletionError::Auth => AppError::UpstreamAuth,
            CompletionError::Api { status, detail } => AppError::Upstream { status, detail },
            CompletionError::Network(err) => AppError::UpstreamUnavailable {
                detail: err.to_string(),
            },
            CompletionError::EmptyResponse => AppError::Upstream {
                status: 200,
                detail: "empty completion".to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct CompletionClient<'a> {
    http: &'a reqwest::Client,
    config: &'a OpenAiConfig,
}

impl<'a> CompletionClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a OpenAiConfig) -> Self {
        CompletionClient { http, config }
    }

    /// Sends one system+user message pair and returns the raw completion text.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), detail));
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }
}

fn classify_failure(status: u16, detail: String) -> CompletionError {
    match status {
        429 => CompletionError::RateLimited,
        401 => CompletionError::Auth,
        status => CompletionError::Api { status, detail },
    }
}
