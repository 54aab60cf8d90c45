//! Non-streaming completion calls to hosted LLM APIs.
//!
//! Anthropic's Messages API takes the system prompt as a separate field;
//! OpenAI's chat completions take it as the first message.

use std::time::Duration;

use archgraph_core::{Error, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::LlmConfig;
use crate::types::{ChatMessage, LlmProvider};

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Something that turns a conversation into a reply.
#[allow(async_fn_in_trait)]
pub trait ModelClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Label for logs, e.g. `anthropic/claude-sonnet-4`.
    fn describe(&self) -> String;
}

/// HTTP client for the configured provider.
pub struct HttpModelClient {
    client: Client,
    provider: LlmProvider,
    model: String,
    api_key: String,
    temperature: f64,
    max_tokens: usize,
}

impl HttpModelClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let (provider, model, api_key) = config.resolve_provider().ok_or_else(|| {
            Error::Config(
                "No LLM API key configured; set ANTHROPIC_API_KEY or OPENAI_API_KEY".into(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            client,
            provider,
            model,
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn complete_anthropic(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = anthropic_body(messages, &self.model, self.temperature, self.max_tokens);
        let response = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let parsed = read_json(response).await?;
        anthropic_text(&parsed)
    }

    async fn complete_openai(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = openai_body(messages, &self.model, self.temperature, self.max_tokens);
        let response = self
            .client
            .post(OPENAI_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let parsed = read_json(response).await?;
        openai_text(&parsed)
    }
}

impl ModelClient for HttpModelClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(
            "Requesting completion from {} ({} messages)",
            self.describe(),
            messages.len()
        );
        match self.provider {
            LlmProvider::Anthropic => self.complete_anthropic(messages).await,
            LlmProvider::OpenAI => self.complete_openai(messages).await,
        }
    }

    fn describe(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Http(format!("API error {}: {}", status, body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Http(format!("Invalid response body: {}", e)))
}

fn anthropic_body(messages: &[ChatMessage], model: &str, temperature: f64, max_tokens: usize) -> Value {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == "system")
        .map(|m| m.content.as_str())
        .collect();
    let conversation: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    let mut body = json!({
        "model": model,
        "messages": conversation,
        "temperature": temperature,
        "max_tokens": max_tokens,
    });
    if !system.is_empty() {
        body["system"] = json!(system.join("\n\n"));
    }
    body
}

fn openai_body(messages: &[ChatMessage], model: &str, temperature: f64, max_tokens: usize) -> Value {
    let msgs: Vec<Value> = messages
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();
    json!({
        "model": model,
        "messages": msgs,
        "temperature": temperature,
        "max_tokens": max_tokens,
        "response_format": {"type": "json_object"},
    })
}

fn anthropic_text(body: &Value) -> Result<String> {
    if body["type"] == "error" {
        let msg = body["error"]["message"].as_str().unwrap_or("Unknown error");
        return Err(Error::Model(msg.to_string()));
    }
    let blocks = body["content"]
        .as_array()
        .ok_or_else(|| Error::Model("Response has no content blocks".into()))?;
    let text: String = blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect();
    if body["stop_reason"] == "max_tokens" {
        debug!("Anthropic reply hit max_tokens; output may be truncated");
    }
    if text.is_empty() {
        return Err(Error::Model("Response contained no text".into()));
    }
    Ok(text)
}

fn openai_text(body: &Value) -> Result<String> {
    if let Some(msg) = body["error"]["message"].as_str() {
        return Err(Error::Model(msg.to_string()));
    }
    body["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| Error::Model("Response contained no message content".into()))
}
