//! Score Calculator: deterministic weighted compatibility between a job and a candidate.
//!
//! total = floor(0.6 × skills + 0.3 × experience + 0.1 × diploma), each sub-score in [0, 100].
//!
//! - skills: |job ∩ cv| / |job| × 100, or 0 when the job lists no skills
//! - experience: min(cv / job × 100, 100), or 100 when the job requires no experience
//! - diploma: 100 if any job-diploma word longer than 3 chars appears in the cv diploma, else 0

use crate::analysis::models::{
    CandidateProfile, ExperienceMatch, JobRequirements, ScoreBreakdown, SkillMatch,
};

/// Absorbs float noise such as 69.99999999999999 before truncation.
const TRUNCATION_EPSILON: f64 = 1e-9;

/// Diploma words of this many characters or fewer are ignored ("en", "de", "of", "in").
const MIN_DIPLOMA_TOKEN_CHARS: usize = 3;

#[derive(Debug, Clone)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub diploma: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.6,
            experience: 0.3,
            diploma: 0.1,
        }
    }
}

/// Scores a candidate with the default weights.
pub fn score(job: &JobRequirements, cv: &CandidateProfile) -> ScoreBreakdown {
    score_with_weights(job, cv, &ScoringWeights::default())
}

pub fn score_with_weights(
    job: &JobRequirements,
    cv: &CandidateProfile,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let matched_skills = job.skills.intersection(&cv.skills);
    let skill_score = compute_skill_score(matched_skills.len(), job.skills.len());
    let experience_score = compute_experience_score(cv.experience_years, job.experience_years);
    let diploma_match = diploma_matches(&job.diploma, &cv.diploma);
    let diploma_score = if diploma_match { 100.0 } else { 0.0 };

    let weighted = weights.skills * skill_score
        + weights.experience * experience_score
        + weights.diploma * diploma_score;
    let total_score = (weighted + TRUNCATION_EPSILON).floor().clamp(0.0, 100.0) as u32;

    ScoreBreakdown {
        total_score,
        skill_match: SkillMatch {
            matched_count: matched_skills.len(),
            total_count: job.skills.len(),
            matched_skills,
        },
        experience_match: ExperienceMatch {
            candidate_years: cv.experience_years,
            required_years: job.experience_years,
        },
        diploma_match,
        skill_score,
        experience_score,
        diploma_score,
    }
}

fn compute_skill_score(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    matched as f64 / required as f64 * 100.0
}

fn compute_experience_score(candidate_years: u32, required_years: u32) -> f64 {
    if required_years == 0 {
        return 100.0;
    }
    (candidate_years as f64 / required_years as f64 * 100.0).min(100.0)
}

fn diploma_matches(job_diploma: &str, cv_diploma: &str) -> bool {
    let cv_diploma = cv_diploma.to_lowercase();
    job_diploma
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_DIPLOMA_TOKEN_CHARS)
        .any(|word| cv_diploma.contains(word))
}
