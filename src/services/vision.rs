use anyhow::Result;

/// Trait for hosted vision/language models (Groq, OpenAI-compatible, ...)
#[async_trait::async_trait]
pub trait VisionModel: Send + Sync {
    /// Sends one user prompt in JSON-object mode and returns the first
    /// choice's content. `None` when the model produced no content.
    async fn complete_json(&self, prompt: &str) -> Result<Option<String>>;
}
