mod llm;
mod notifier;

pub use llm::{ChatCompletionsClient, ChatRequest, ILlmClient, ScriptedLlmClient};
pub use notifier::{DeliveredMessage, INotifier, InMemoryNotifier, LogNotifier, WebhookNotifier};
