use super::{ChatRequest, ILlmClient};
use crate::config::LlmEndpoint;
use anyhow::anyhow;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI compatible chat completions over HTTP. When the primary endpoint
/// fails the request is retried once against the backup endpoint.
pub struct ChatCompletionsClient {
    client: Client,
    primary: Option<LlmEndpoint>,
    backup: Option<LlmEndpoint>,
}

impl ChatCompletionsClient {
    pub fn new(
        primary: Option<LlmEndpoint>,
        backup: Option<LlmEndpoint>,
        timeout_millis: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_millis))
            .build()?;
        Ok(Self {
            client,
            primary,
            backup,
        })
    }

    async fn call(&self, endpoint: &LlmEndpoint, request: &ChatRequest) -> anyhow::Result<String> {
        let body = ChatCompletionsBody {
            model: &endpoint.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            response_format: if request.json_response {
                Some(ResponseFormat {
                    kind: "json_object",
                })
            } else {
                None
            },
        };

        let res = self
            .client
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let res = res.json::<ChatCompletionsResponse>().await?;

        res.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Model {} returned no content", endpoint.model))
    }
}

#[async_trait::async_trait]
impl ILlmClient for ChatCompletionsClient {
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<String> {
        let primary = self
            .primary
            .as_ref()
            .ok_or_else(|| anyhow!("No language model is configured"))?;

        let primary_err = match self.call(primary, request).await {
            Ok(content) => return Ok(content),
            Err(e) => e,
        };

        match &self.backup {
            Some(backup) => {
                warn!(
                    "Primary model {} failed, switching to backup model {}. Error: {:?}",
                    primary.model, backup.model, primary_err
                );
                self.call(backup, request).await.map_err(|e| {
                    error!("Backup model {} failed as well. Error: {:?}", backup.model, e);
                    e
                })
            }
            None => {
                error!("Primary model {} failed. Error: {:?}", primary.model, primary_err);
                Err(primary_err)
            }
        }
    }
}
