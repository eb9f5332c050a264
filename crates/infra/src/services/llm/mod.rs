mod chat_completions;
mod scripted;

pub use chat_completions::ChatCompletionsClient;
pub use scripted::ScriptedLlmClient;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_message: String,
    /// Ask the model for a single JSON object
    pub json_response: bool,
}

/// A chat completion backend
#[async_trait::async_trait]
pub trait ILlmClient: Send + Sync {
    /// Returns the text content of the first choice
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<String>;
}
