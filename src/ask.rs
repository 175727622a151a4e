//! Chat-completion client for asking questions about the data.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint. The
//! prompt the dashboard sends is the user's question followed by the
//! selected tweets' text, so the model answers about the data on screen.

use crate::error::{LensError, Result};
use crate::model::MappedTweet;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Environment variable consulted for the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Sampling temperature sent with every completion request.
pub const TEMPERATURE: f64 = 0.7;

/// Completion length cap sent with every request.
pub const MAX_TOKENS: u32 = 300;

/// Canned prompt: summarize the selection.
pub const SUMMARIZE_PROMPT: &str = "Summarize the main insights from the following tweets:";

/// Canned prompt: draft new content from the selection.
pub const SUGGEST_PROMPT: &str =
    "Based on these tweets, suggest 5 tweet ideas that could be part of the conversation:";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat completion endpoint.
pub struct CompletionClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl CompletionClient {
    /// Build a client for the given endpoint and model.
    ///
    /// The API key is optional at construction; [`Self::complete`] fails
    /// with [`LensError::ApiKeyMissing`] if it is still absent when a
    /// request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            client,
        })
    }

    /// Send a prompt and return the first completion's text.
    ///
    /// # Errors
    ///
    /// - [`LensError::PromptRequired`] for an empty or whitespace prompt
    /// - [`LensError::ApiKeyMissing`] when no key is configured
    /// - [`LensError::CompletionError`] for non-success provider responses
    /// - [`LensError::HttpError`] for transport failures
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(LensError::PromptRequired);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LensError::ApiKeyMissing { var: API_KEY_VAR })?;

        let url = format!("{}/chat/completions", self.endpoint);
        debug!(url = %url, model = %self.model, "Sending completion request");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let reason = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LensError::completion_error(status, reason));
        }

        let result: ChatResponse = response.json().await?;
        first_completion(result)
    }
}

// Providers pad completions with leading newlines; return the text
// trimmed.
fn first_completion(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .ok_or_else(|| LensError::completion_error(200, "No completion in response"))
}

/// Assemble the prompt sent for a data question: the question, a blank
/// line, a "Tweets:" header, then every tweet's text joined by spaces.
#[must_use]
pub fn build_prompt(question: &str, tweets: &[MappedTweet]) -> String {
    let texts = tweets
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{question}\n\nTweets:\n{texts}")
}
