//! Scripted completion backend for tests: answers are chosen by matching
//! substrings of the prompt, first rule wins.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{CompletionBackend, LlmError};

struct Rule {
    needles: Vec<String>,
    reply: Option<String>,
}

#[derive(Default)]
pub struct ScriptedBackend {
    rules: Vec<Rule>,
    delays: Vec<(Vec<String>, Duration)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, needle: &str, reply: &str) -> Self {
        self.reply_all(&[needle], reply)
    }

    /// Answers `reply` when the prompt contains every needle.
    pub fn reply_all(mut self, needles: &[&str], reply: &str) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            reply: Some(reply.to_string()),
        });
        self
    }

    pub fn fail(self, needle: &str) -> Self {
        self.fail_all(&[needle])
    }

    pub fn fail_all(mut self, needles: &[&str]) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            reply: None,
        });
        self
    }

    /// Holds back the answer to prompts containing every needle.
    pub fn delay_all(mut self, needles: &[&str], delay: Duration) -> Self {
        self.delays
            .push((needles.iter().map(|n| n.to_string()).collect(), delay));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let delay = self
            .delays
            .iter()
            .find(|(needles, _)| needles.iter().all(|n| prompt.contains(n.as_str())))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.needles.iter().all(|n| prompt.contains(n.as_str())));

        match rule {
            Some(Rule {
                reply: Some(reply), ..
            }) => Ok(reply.clone()),
            Some(_) => Err(LlmError::Api {
                status: 503,
                message: "scripted failure".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}
