//! Structured Extractor: turns free text into `JobRequirements` / `CandidateProfile`
//! through the LLM, then decodes the JSON answer field by field.
//!
//! Degrade-not-crash: any failure (LLM call, malformed JSON, non-object answer)
//! yields an empty record. Missing or mistyped fields fall back to their defaults.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::analysis::models::{CandidateProfile, JobRequirements, SkillSet, UNKNOWN_CANDIDATE};
use crate::analysis::prompts::{CANDIDATE_EXTRACTION_PROMPT, JOB_EXTRACTION_PROMPT};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, CompletionBackend, LlmError};

/// Which record the LLM is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Job,
    Candidate,
}

impl Schema {
    fn prompt(self, text: &str) -> String {
        let template = match self {
            Schema::Job => JOB_EXTRACTION_PROMPT,
            Schema::Candidate => CANDIDATE_EXTRACTION_PROMPT,
        };
        template.replace("{text}", text)
    }
}

#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("LLM output is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("LLM output is JSON but not an object")]
    NotAnObject,
}

pub struct StructuredExtractor {
    backend: Arc<dyn CompletionBackend>,
}

impl StructuredExtractor {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Asks the LLM for `schema` and returns the raw JSON object.
    pub async fn extract(
        &self,
        text: &str,
        schema: Schema,
    ) -> Result<Map<String, Value>, ExtractionFailure> {
        let raw = self
            .backend
            .complete(&schema.prompt(text), JSON_ONLY_SYSTEM)
            .await?;
        parse_json_object(&raw)
    }

    pub async fn extract_job(&self, text: &str) -> JobRequirements {
        match self.extract(text, Schema::Job).await {
            Ok(object) => decode_job(&object),
            Err(e) => {
                warn!("Job description extraction degraded to empty record: {e}");
                JobRequirements::default()
            }
        }
    }

    pub async fn extract_candidate(&self, text: &str) -> CandidateProfile {
        match self.extract(text, Schema::Candidate).await {
            Ok(object) => decode_candidate(&object),
            Err(e) => {
                warn!("Résumé extraction degraded to empty record: {e}");
                CandidateProfile::default()
            }
        }
    }
}

/// Parses an LLM answer into a JSON object, tolerating code fences and
/// chatter around the object.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>, ExtractionFailure> {
    let cleaned = strip_json_fences(raw);
    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => value,
        Err(e) => embedded_object(cleaned).ok_or(ExtractionFailure::MalformedJson(e))?,
    };
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ExtractionFailure::NotAnObject),
    }
}

/// Last resort: the outermost `{ … }` span of a chatty answer.
fn embedded_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

pub fn decode_job(object: &Map<String, Value>) -> JobRequirements {
    JobRequirements {
        skills: decode_skills(object.get("skills")),
        experience_years: decode_years(object.get("experience_years")),
        diploma: decode_string(object.get("diploma")).unwrap_or_default(),
    }
}

pub fn decode_candidate(object: &Map<String, Value>) -> CandidateProfile {
    CandidateProfile {
        name: decode_string(object.get("name")).unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string()),
        skills: decode_skills(object.get("skills")),
        experience_years: decode_years(object.get("experience_years")),
        diploma: decode_string(object.get("diploma")).unwrap_or_default(),
    }
}

fn decode_skills(value: Option<&Value>) -> SkillSet {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(list)) => list.split([',', ';']).collect(),
        _ => SkillSet::new(),
    }
}

fn decode_years(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(years) = n.as_u64() {
                years.min(u32::MAX as u64) as u32
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f.trunc().min(u32::MAX as f64) as u32)
                    .unwrap_or(0)
            }
        }
        Some(Value::String(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn decode_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::ScriptedBackend;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_full_job_object_round_trips() {
        let job = decode_job(&object(json!({
            "skills": ["python", "sql"],
            "experience_years": 3,
            "diploma": "Master en Informatique"
        })));
        assert_eq!(job.skills.iter().collect::<Vec<_>>(), vec!["python", "sql"]);
        assert_eq!(job.experience_years, 3);
        assert_eq!(job.diploma, "Master en Informatique");
    }

    #[test]
    fn test_full_candidate_object_round_trips() {
        let cv = decode_candidate(&object(json!({
            "name": "Jeanne Dupont",
            "skills": ["python", "java"],
            "experience_years": 5,
            "diploma": "Master Informatique"
        })));
        assert_eq!(cv.name, "Jeanne Dupont");
        assert_eq!(cv.skills.len(), 2);
        assert_eq!(cv.experience_years, 5);
        assert_eq!(cv.diploma, "Master Informatique");
    }

    #[test]
    fn test_missing_fields_default() {
        let cv = decode_candidate(&object(json!({})));
        assert_eq!(cv, CandidateProfile::default());
        assert_eq!(cv.name, "Unknown");

        let job = decode_job(&object(json!({"skills": null, "diploma": 42})));
        assert_eq!(job, JobRequirements::default());
    }

    #[test]
    fn test_blank_name_is_unknown() {
        let cv = decode_candidate(&object(json!({"name": "   "})));
        assert_eq!(cv.name, "Unknown");
    }

    #[test]
    fn test_skills_accepts_comma_separated_string() {
        let job = decode_job(&object(json!({"skills": "Rust, SQL; Kafka"})));
        assert_eq!(job.skills.iter().collect::<Vec<_>>(), vec!["kafka", "rust", "sql"]);
    }

    #[test]
    fn test_skills_ignores_non_strings() {
        let job = decode_job(&object(json!({"skills": ["Rust", 3, null, {"x": 1}]})));
        assert_eq!(job.skills.iter().collect::<Vec<_>>(), vec!["rust"]);
    }

    #[test]
    fn test_years_tolerant_decoding() {
        assert_eq!(decode_years(Some(&json!(4))), 4);
        assert_eq!(decode_years(Some(&json!(4.9))), 4);
        assert_eq!(decode_years(Some(&json!(-2))), 0);
        assert_eq!(decode_years(Some(&json!("5"))), 5);
        assert_eq!(decode_years(Some(&json!("3+ ans"))), 3);
        assert_eq!(decode_years(Some(&json!("plusieurs"))), 0);
        assert_eq!(decode_years(Some(&json!(true))), 0);
        assert_eq!(decode_years(None), 0);
    }

    #[test]
    fn test_parse_json_object_strips_fences() {
        let parsed = parse_json_object("```json\n{\"diploma\": \"BTS\"}\n```").unwrap();
        assert_eq!(parsed["diploma"], "BTS");
    }

    #[test]
    fn test_parse_json_object_finds_embedded_object() {
        let parsed = parse_json_object("Here is the JSON:\n{\"experience_years\": 2}\nHope it helps.")
            .unwrap();
        assert_eq!(parsed["experience_years"], 2);
    }

    #[test]
    fn test_parse_json_object_rejects_garbage() {
        let result = parse_json_object("Sorry, I cannot help with that.");
        assert!(matches!(result, Err(ExtractionFailure::MalformedJson(_))));
    }

    #[test]
    fn test_parse_json_object_rejects_arrays() {
        let result = parse_json_object("[\"python\", \"sql\"]");
        assert!(matches!(result, Err(ExtractionFailure::NotAnObject)));
    }

    #[tokio::test]
    async fn test_extract_candidate_from_well_formed_answer() {
        let backend = ScriptedBackend::new().reply(
            "RÉSUMÉ:",
            r#"```json
{"name": "Jeanne Dupont", "skills": ["Python", "Java"], "experience_years": 5, "diploma": "Master Informatique"}
```"#,
        );
        let extractor = StructuredExtractor::new(Arc::new(backend));

        let cv = extractor.extract_candidate("Jeanne Dupont, développeuse").await;
        assert_eq!(cv.name, "Jeanne Dupont");
        assert_eq!(cv.skills.iter().collect::<Vec<_>>(), vec!["java", "python"]);
        assert_eq!(cv.experience_years, 5);
    }

    #[tokio::test]
    async fn test_malformed_answer_degrades_to_defaults() {
        let backend = ScriptedBackend::new().reply("RÉSUMÉ:", "I could not read this résumé.");
        let extractor = StructuredExtractor::new(Arc::new(backend));

        let cv = extractor.extract_candidate("???").await;
        assert_eq!(cv, CandidateProfile::default());
    }

    #[tokio::test]
    async fn test_llm_failure_degrades_to_defaults() {
        let backend = ScriptedBackend::new().fail("JOB OFFER:");
        let extractor = StructuredExtractor::new(Arc::new(backend));

        let job = extractor.extract_job("Senior Rust engineer").await;
        assert!(job.is_empty());
    }

    #[tokio::test]
    async fn test_extract_surfaces_failure_kind() {
        let backend = ScriptedBackend::new().fail("JOB OFFER:");
        let extractor = StructuredExtractor::new(Arc::new(backend));

        let result = extractor.extract("Senior Rust engineer", Schema::Job).await;
        assert!(matches!(result, Err(ExtractionFailure::Llm(_))));
    }

    #[tokio::test]
    async fn test_prompt_embeds_input_text() {
        let backend = Arc::new(ScriptedBackend::new().reply("Kubernetes wizard", "{}"));
        let extractor = StructuredExtractor::new(backend.clone());

        extractor.extract_job("Kubernetes wizard wanted").await;
        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"experience_years\""));
        assert!(prompts[0].ends_with("Kubernetes wizard wanted"));
    }
}
