use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::VisionModel;
use crate::config::ModelSettings;

pub const MAX_COMPLETION_TOKENS: u32 = 1024;
pub const TEMPERATURE: f32 = 1.0;
pub const TOP_P: f32 = 1.0;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
    top_p: f32,
    stream: bool,
    stop: Option<Vec<String>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// Groq chat completions client (OpenAI-compatible API).
pub struct GroqClient {
    settings: ModelSettings,
    client: reqwest::Client,
}

impl GroqClient {
    pub fn new(settings: ModelSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build model HTTP client")?;

        Ok(Self { settings, client })
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            top_p: TOP_P,
            stream: false,
            stop: None,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        }
    }
}

#[async_trait::async_trait]
impl VisionModel for GroqClient {
    async fn complete_json(&self, prompt: &str) -> Result<Option<String>> {
        let request = self.build_request(prompt);

        log::info!("🤖 Sending request to Groq with model: {}", self.settings.model);
        log::debug!("📤 Prompt size: {} bytes", prompt.len());

        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .context("Groq request failed")?;

        log::debug!("📥 Groq response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Groq API error response: {}", error_text);
            anyhow::bail!("Groq API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to decode Groq response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        match &content {
            Some(text) => log::debug!("💬 Groq response content: {}", text),
            None => log::warn!("⚠️ Groq returned no content"),
        }

        Ok(content)
    }
}
