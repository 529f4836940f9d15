//! Summary Generator: a short recruiter-facing rationale for one candidate.

use std::sync::Arc;

use crate::analysis::prompts::SUMMARY_PROMPT;
use crate::llm_client::prompts::RECRUITER_SYSTEM;
use crate::llm_client::{CompletionBackend, LlmError};

pub struct SummaryGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl SummaryGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Returns the LLM's answer untouched. Failures are left to the caller.
    pub async fn summarize(&self, job_text: &str, cv_text: &str) -> Result<String, LlmError> {
        let prompt = SUMMARY_PROMPT
            .replace("{job_description}", job_text)
            .replace("{cv_text}", cv_text);
        self.backend.complete(&prompt, RECRUITER_SYSTEM).await
    }
}
