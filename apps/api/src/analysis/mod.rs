// Résumé analysis: structured extraction, weighted scoring, summaries, ranking.
// All LLM calls go through the llm_client::CompletionBackend seam.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;
