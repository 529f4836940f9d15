use std::collections::BTreeSet;

use serde::Serialize;

/// Name reported when the résumé does not yield one.
pub const UNKNOWN_CANDIDATE: &str = "Unknown";

/// Case-insensitive skill set. Skills are trimmed and lower-cased on insert;
/// blanks are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: &str) {
        let normalized = skill.trim().to_lowercase();
        if !normalized.is_empty() {
            self.0.insert(normalized);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

/// Structured requirements extracted from a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobRequirements {
    pub skills: SkillSet,
    pub experience_years: u32,
    pub diploma: String,
}

impl JobRequirements {
    /// True when extraction produced nothing usable.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.experience_years == 0 && self.diploma.trim().is_empty()
    }
}

/// Structured profile extracted from one résumé.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub skills: SkillSet,
    pub experience_years: u32,
    pub diploma: String,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            name: UNKNOWN_CANDIDATE.to_string(),
            skills: SkillSet::new(),
            experience_years: 0,
            diploma: String::new(),
        }
    }
}

impl CandidateProfile {
    /// True when every field still holds its default.
    pub fn is_empty(&self) -> bool {
        self.name == UNKNOWN_CANDIDATE
            && self.skills.is_empty()
            && self.experience_years == 0
            && self.diploma.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub matched_count: usize,
    pub total_count: usize,
    pub matched_skills: SkillSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceMatch {
    pub candidate_years: u32,
    pub required_years: u32,
}

/// Deterministic score for one (job, candidate) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub total_score: u32, // 0 – 100
    pub skill_match: SkillMatch,
    pub experience_match: ExperienceMatch,
    pub diploma_match: bool,
    pub skill_score: f64,
    pub experience_score: f64,
    pub diploma_score: f64,
}

/// Human-readable breakdown shown by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetails {
    pub skill_match: String,
    pub common_skills: Vec<String>,
    pub experience_match: String,
    pub diploma_match: String,
}

impl From<&ScoreBreakdown> for MatchDetails {
    fn from(breakdown: &ScoreBreakdown) -> Self {
        let skills = &breakdown.skill_match;
        let experience = &breakdown.experience_match;
        Self {
            skill_match: format!(
                "{}% ({}/{} compétences)",
                breakdown.skill_score as u32, skills.matched_count, skills.total_count
            ),
            common_skills: skills.matched_skills.iter().map(str::to_string).collect(),
            experience_match: format!(
                "{} ans vs {} requis",
                experience.candidate_years, experience.required_years
            ),
            diploma_match: if breakdown.diploma_match {
                "Correspond".to_string()
            } else {
                "Ne correspond pas".to_string()
            },
        }
    }
}

/// One ranked entry of the analysis response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub candidate_name: String,
    pub filename: String,
    pub score: u32,
    pub summary: String,
    pub details: MatchDetails,
}
