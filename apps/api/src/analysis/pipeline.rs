//! Analysis Pipeline: ranks a batch of résumés against one job description.
//!
//! Flow: extract job → for each résumé (concurrently, bounded):
//!       read text → extract profile → score → summarize → rank.
//!
//! Only the job description is fatal. A résumé that cannot be read or
//! understood is dropped from the ranking; it never fails the request.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::extractor::StructuredExtractor;
use crate::analysis::models::{CandidateResult, JobRequirements, MatchDetails};
use crate::analysis::scoring::score;
use crate::analysis::summary::SummaryGenerator;
use crate::documents::{DocumentFormat, TextExtractor};
use crate::llm_client::CompletionBackend;

/// One uploaded résumé file.
#[derive(Debug, Clone)]
pub struct UploadedCv {
    pub filename: String,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unable to analyze the job description.")]
    JobExtractionFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnreadableDocument,
    EmptyText,
    EmptyProfile,
}

#[derive(Debug)]
enum CandidateOutcome {
    Scored(CandidateResult),
    Skipped(SkipReason),
}

pub struct AnalysisPipeline {
    extractor: StructuredExtractor,
    summarizer: SummaryGenerator,
    text_extractor: Arc<dyn TextExtractor>,
    concurrency: usize,
}

impl AnalysisPipeline {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        text_extractor: Arc<dyn TextExtractor>,
        concurrency: usize,
    ) -> Self {
        Self {
            extractor: StructuredExtractor::new(backend.clone()),
            summarizer: SummaryGenerator::new(backend),
            text_extractor,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs the full analysis and returns candidates best-first.
    /// Equal scores keep upload order.
    pub async fn analyze(
        &self,
        job_description: &str,
        cvs: Vec<UploadedCv>,
    ) -> Result<Vec<CandidateResult>, AnalysisError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, "Analyzing job description against {} résumés", cvs.len());

        let job = self.extractor.extract_job(job_description).await;
        if job.is_empty() {
            warn!(%request_id, "Job description yielded no usable requirements, aborting");
            return Err(AnalysisError::JobExtractionFailed);
        }
        info!(
            %request_id,
            "Job extracted: {} skills, {} years, diploma={:?}",
            job.skills.len(),
            job.experience_years,
            job.diploma
        );

        let job = &job;
        let outcomes: Vec<(usize, String, CandidateOutcome)> =
            stream::iter(cvs.into_iter().enumerate())
                .map(|(index, cv)| async move {
                    let filename = cv.filename.clone();
                    let outcome = self.process_candidate(job, job_description, cv).await;
                    (index, filename, outcome)
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut scored = Vec::with_capacity(outcomes.len());
        for (index, filename, outcome) in outcomes {
            match outcome {
                CandidateOutcome::Scored(result) => {
                    info!(%request_id, "Scored {filename}: {}/100", result.score);
                    scored.push((index, result));
                }
                CandidateOutcome::Skipped(reason) => {
                    info!(%request_id, "Skipped {filename}: {reason:?}");
                }
            }
        }

        Ok(rank(scored))
    }

    async fn process_candidate(
        &self,
        job: &JobRequirements,
        job_description: &str,
        cv: UploadedCv,
    ) -> CandidateOutcome {
        let format = DocumentFormat::from_filename(&cv.filename);
        let cv_text = match self.text_extractor.extract(cv.data, format).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read {}: {e}", cv.filename);
                return CandidateOutcome::Skipped(SkipReason::UnreadableDocument);
            }
        };
        if cv_text.trim().is_empty() {
            return CandidateOutcome::Skipped(SkipReason::EmptyText);
        }

        let profile = self.extractor.extract_candidate(&cv_text).await;
        if profile.is_empty() {
            return CandidateOutcome::Skipped(SkipReason::EmptyProfile);
        }

        let breakdown = score(job, &profile);

        // A missing rationale does not invalidate the score.
        let summary = match self.summarizer.summarize(job_description, &cv_text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summary generation failed for {}: {e}", cv.filename);
                String::new()
            }
        };

        CandidateOutcome::Scored(CandidateResult {
            candidate_name: profile.name,
            filename: cv.filename,
            score: breakdown.total_score,
            summary,
            details: MatchDetails::from(&breakdown),
        })
    }
}

/// Sorts by score descending, then by original upload index.
pub fn rank(mut scored: Vec<(usize, CandidateResult)>) -> Vec<CandidateResult> {
    scored.sort_by(|(a_index, a), (b_index, b)| {
        b.score.cmp(&a.score).then(a_index.cmp(b_index))
    });
    scored.into_iter().map(|(_, result)| result).collect()
}
