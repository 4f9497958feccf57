//! Assistant client: prompt in, reply text out.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. No conversation
//! state — every call is a single user message.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::AssistantConfig;
use crate::error::WidgetError;

/// Quick prompts offered on the dashboard's assistant card.
pub const QUICK_PROMPTS: [&str; 3] = [
    "When should I sleep?",
    "Optimize my travel",
    "Summarize today",
];

/// Reply used when the model returns an empty choice list.
const EMPTY_REPLY: &str = "No response";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

fn request_body(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
    })
}

fn extract_reply(raw: ChatResponse) -> String {
    raw.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

/// Forward a text prompt and return the reply text.
pub async fn ask_assistant(
    client: &reqwest::Client,
    config: &AssistantConfig,
    prompt: &str,
) -> Result<String, WidgetError> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or(WidgetError::NotConfigured("Assistant"))?;

    let response = client
        .post(&config.endpoint)
        .bearer_auth(api_key)
        .json(&request_body(&config.model, prompt))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WidgetError::Unavailable(format!(
            "assistant returned {}: {}",
            status, body
        )));
    }

    let raw: ChatResponse = response
        .json()
        .await
        .map_err(|e| WidgetError::Invalid(format!("assistant payload: {}", e)))?;
    Ok(extract_reply(raw))
}
