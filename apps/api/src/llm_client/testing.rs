//! In-memory generation backend for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{CompletionRequest, GenerationBackend, LlmError, Tier};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub tier: Tier,
    pub schema_hint: String,
}

#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Fail { status: u16, message: String },
}

#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    outcome: Outcome,
    delay: Option<Duration>,
}

/// Replies to prompts by substring match. The first matching rule wins.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    rules: Vec<Rule>,
    embeddings: Vec<(String, Vec<f32>)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needle: &str, reply: &str) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            outcome: Outcome::Reply(reply.to_string()),
            delay: None,
        });
        self
    }

    /// Like `reply`, but the reply arrives after `delay`.
    pub fn slow_reply(mut self, needle: &str, reply: &str, delay: Duration) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            outcome: Outcome::Reply(reply.to_string()),
            delay: Some(delay),
        });
        self
    }

    pub fn fail(mut self, needle: &str, status: u16, message: &str) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            outcome: Outcome::Fail {
                status,
                message: message.to_string(),
            },
            delay: None,
        });
        self
    }

    pub fn embedding(mut self, needle: &str, vector: Vec<f32>) -> Self {
        self.embeddings.push((needle.to_string(), vector));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Calls whose prompt contains `needle`.
    pub fn calls_matching(&self, needle: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.prompt.contains(needle))
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system: request.system.to_string(),
                prompt: request.prompt.to_string(),
                tier: request.tier,
                schema_hint: request.schema_hint.to_string(),
            });
        }

        let rule = self
            .rules
            .iter()
            .find(|rule| request.prompt.contains(&rule.needle))
            .cloned();

        let Some(rule) = rule else {
            return Err(LlmError::Api {
                status: 404,
                message: format!("no scripted reply for {} prompt", request.schema_hint),
            });
        };

        if let Some(delay) = rule.delay {
            tokio::time::sleep(delay).await;
        }

        match rule.outcome {
            Outcome::Reply(reply) => Ok(reply),
            Outcome::Fail { status, message } => Err(LlmError::Api { status, message }),
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embeddings
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map(|(_, vector)| vector.clone())
            .ok_or_else(|| LlmError::Api {
                status: 404,
                message: "no scripted embedding".to_string(),
            })
    }
}
