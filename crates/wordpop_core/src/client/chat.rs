//! Chat-completion client (OpenAI-compatible `chat/completions`).

use log::warn;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Sampling temperature used for every request.
pub const TEMPERATURE: f64 = 0.3;

/// One system-prompt + user-content completion.
pub trait LanguageModel: Send + Sync {
    fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, ChatError>;
}

#[derive(Debug)]
pub enum ChatError {
    Transport(reqwest::Error),
    Status { status: u16, body: String },
    Decode(serde_json::Error),
    /// The response carried no choices.
    EmptyChoices,
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Status { status, body } => write!(f, "API error {status}: {body}"),
            Self::Decode(err) => write!(f, "invalid completion response: {err}"),
            Self::EmptyChoices => write!(f, "completion response has no choices"),
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Status { .. } | Self::EmptyChoices => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Blocking HTTP implementation of [`LanguageModel`].
pub struct ChatCompletionClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let api_url = api_url.into();
        let mut builder = Client::builder().timeout(timeout);
        if api_url.starts_with("http://127.0.0.1") || api_url.starts_with("http://localhost") {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(ChatError::Transport)?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LanguageModel for ChatCompletionClient {
    fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, ChatError> {
        let body = request_body(&self.model, system_prompt, user_content);
        let mut request = self.client.post(&self.api_url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().map_err(ChatError::Transport)?;
        let status = response.status();
        let text = response.text().map_err(ChatError::Transport)?;
        if !status.is_success() {
            warn!(
                "event=chat_completion module=client status=error http_status={}",
                status.as_u16()
            );
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

/// JSON request body for one completion.
pub fn request_body(model: &str, system_prompt: &str, user_content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system_prompt },
            { "role": "user", "content": user_content },
        ],
        "temperature": TEMPERATURE,
    })
}

/// Extracts `choices[0].message.content`, trimmed.
pub fn parse_completion(body: &str) -> Result<String, ChatError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(ChatError::Decode)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .ok_or(ChatError::EmptyChoices)
}
