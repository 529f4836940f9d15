// All LLM prompt templates for the Analysis module.

/// Job description extraction prompt. Replace `{text}` before sending.
pub const JOB_EXTRACTION_PROMPT: &str = r#"Analyze the following job offer and extract its requirements.

Return ONLY a valid JSON object with EXACTLY these keys (no extra fields):
{
  "skills": ["key technical and non-technical skills, one string each"],
  "experience_years": 3,
  "diploma": "the required degree, as written in the offer"
}

Rules:
- "experience_years" is an integer: the MINIMUM number of years required. Use 0 if none is stated.
- "diploma" is an empty string if the offer does not mention one.
- Keep skill names short ("Python", "SQL", "project management").

JOB OFFER:
{text}"#;

/// Résumé extraction prompt. Replace `{text}` before sending.
pub const CANDIDATE_EXTRACTION_PROMPT: &str = r#"Analyze the following résumé and extract the candidate's profile.

Return ONLY a valid JSON object with EXACTLY these keys (no extra fields):
{
  "name": "the candidate's full name",
  "skills": ["every skill listed or clearly demonstrated, one string each"],
  "experience_years": 5,
  "diploma": "the candidate's highest degree"
}

Rules:
- "experience_years" is an integer: the TOTAL years of professional experience.
- Use an empty string for "name" or "diploma" if the résumé does not state them.
- Keep skill names short ("Python", "SQL", "project management").

RÉSUMÉ:
{text}"#;

/// Recruiter summary prompt. Replace `{job_description}` and `{cv_text}` before sending.
pub const SUMMARY_PROMPT: &str = r#"Based on the job offer and the résumé below, write a concise 3-sentence summary for a recruiter.
Highlight the candidate's strengths with respect to the offer and justify why the candidate is relevant.
Write in the same language as the job offer.

JOB OFFER:
{job_description}
---
RÉSUMÉ:
{cv_text}"#;
