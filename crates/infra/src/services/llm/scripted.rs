use super::{ChatRequest, ILlmClient};
use anyhow::anyhow;
use std::sync::Mutex;

/// Offline stand-in for a language model. Replies are picked by the first
/// rule whose needle occurs in the user message. Unmatched requests fail.
#[derive(Default)]
pub struct ScriptedLlmClient {
    rules: Mutex<Vec<(String, Option<String>)>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_to(&self, needle: &str, reply: &str) -> &Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Some(reply.to_string())));
        self
    }

    pub fn fail_on(&self, needle: &str) -> &Self {
        self.rules.lock().unwrap().push((needle.to_string(), None));
        self
    }

    /// Every request seen so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ILlmClient for ScriptedLlmClient {
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        let rules = self.rules.lock().unwrap();
        match rules
            .iter()
            .find(|(needle, _)| request.user_message.contains(needle.as_str()))
        {
            Some((_, Some(reply))) => Ok(reply.clone()),
            Some((needle, None)) => Err(anyhow!("Scripted failure for: {}", needle)),
            None => Err(anyhow!("No scripted reply for: {}", request.user_message)),
        }
    }
}
