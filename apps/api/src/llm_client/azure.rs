//! Azure OpenAI adapter for `GenerationBackend`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CompletionRequest, GenerationBackend, LlmError, Tier};
use crate::config::{AzureDeployment, Config};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessageOut<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessageOut<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ResponseFormat {
    #[serde(rename = "json_object")]
    JsonObject,
}

/// Every reply shape the deployments can return. Normalised by `into_content`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompletionReply {
    Chat {
        choices: Vec<ChatChoice>,
        usage: Option<Usage>,
    },
    Text {
        choices: Vec<TextChoice>,
    },
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageIn,
}

#[derive(Debug, Deserialize)]
struct ChatMessageIn {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextChoice {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl CompletionReply {
    fn into_content(self) -> Result<String, LlmError> {
        let content = match self {
            CompletionReply::Chat { choices, usage } => {
                if let Some(usage) = usage {
                    debug!(
                        "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
                choices.into_iter().next().and_then(|c| c.message.content)
            }
            CompletionReply::Text { choices } => choices.into_iter().next().and_then(|c| c.text),
        };

        content
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingReply {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct AzureError {
    error: AzureErrorBody,
}

#[derive(Debug, Deserialize)]
struct AzureErrorBody {
    message: String,
}

/// Chat deployments per tier plus one embedding deployment.
pub struct AzureOpenAiBackend {
    client: Client,
    primary: AzureDeployment,
    economy: AzureDeployment,
    embedding: AzureDeployment,
}

impl AzureOpenAiBackend {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            primary: config.primary.clone(),
            economy: config.economy.clone(),
            embedding: config.embedding.clone(),
        })
    }

    fn deployment(&self, tier: Tier) -> &AzureDeployment {
        match tier {
            Tier::Primary => &self.primary,
            Tier::Economy => &self.economy,
        }
    }

    async fn post<B: Serialize>(
        &self,
        deployment: &AzureDeployment,
        operation: &str,
        body: &B,
    ) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(deployment_url(deployment, operation))
            .header("api-key", &deployment.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Azure OpenAI returned {} for {}: {}", status, operation, body);
        let message = serde_json::from_str::<AzureError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(LlmError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn deployment_url(deployment: &AzureDeployment, operation: &str) -> String {
    format!(
        "{}/openai/deployments/{}/{}?api-version={}",
        deployment.endpoint.trim_end_matches('/'),
        deployment.deployment,
        operation,
        deployment.api_version
    )
}

#[async_trait]
impl GenerationBackend for AzureOpenAiBackend {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let deployment = self.deployment(request.tier);
        debug!(
            model = %deployment.model,
            schema = request.schema_hint,
            "dispatching chat completion"
        );

        let body = ChatRequest {
            messages: [
                ChatMessageOut {
                    role: "system",
                    content: request.system,
                },
                ChatMessageOut {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat::JsonObject,
        };

        let reply: CompletionReply = self
            .post(deployment, "chat/completions", &body)
            .await?
            .json()
            .await?;
        reply.into_content()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let reply: EmbeddingReply = self
            .post(&self.embedding, "embeddings", &EmbeddingRequest { input: text })
            .await?
            .json()
            .await?;
        reply
            .data
            .into_iter()
            .next()
            .map(|datum| datum.embedding)
            .ok_or(LlmError::EmptyEmbedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_reply_normalises_to_content() {
        let reply: CompletionReply = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "{\"a\": 1}"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}}"#,
        )
        .unwrap();
        assert_eq!(reply.into_content().unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_text_reply_normalises_to_content() {
        let reply: CompletionReply =
            serde_json::from_str(r#"{"choices": [{"text": "{\"b\": 2}", "index": 0}]}"#).unwrap();
        assert_eq!(reply.into_content().unwrap(), "{\"b\": 2}");
    }

    #[test]
    fn test_null_content_is_empty() {
        let reply: CompletionReply =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(reply.into_content(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_no_choices_is_empty() {
        let reply: CompletionReply = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(reply.into_content(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_deployment_url_shape() {
        let deployment = AzureDeployment {
            api_key: "k".into(),
            endpoint: "https://acme.openai.azure.com/".into(),
            api_version: "2024-06-01".into(),
            deployment: "gpt-4o".into(),
            model: "gpt-4o".into(),
        };
        assert_eq!(
            deployment_url(&deployment, "chat/completions"),
            "https://acme.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_request_uses_json_mode_and_zero_temperature() {
        let body = ChatRequest {
            messages: [
                ChatMessageOut { role: "system", content: "s" },
                ChatMessageOut { role: "user", content: "u" },
            ],
            temperature: 0.0,
            response_format: ResponseFormat::JsonObject,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][1]["role"], "user");
    }
}
