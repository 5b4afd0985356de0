//! Ranking aggregator. Fans out one analysis per resume and ranks the results.
//!
//! Flow: spawn one task per resume → join all → failed slots become zero-score
//! placeholders → stable sort by score descending → assign 1-based ranks.
//!
//! Concurrency is bounded by the gateway's limiter, not here. A failing resume
//! never fails the batch: every input filename appears exactly once in the output.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::evaluation::analysis::analyze_for_ranking;
use crate::llm_client::{LlmError, ModelGateway};
use crate::models::analysis::{RankedResult, RankingAnalysis, RankingResponse};
use crate::models::resume::{JobRequirement, ResumeInput};

/// Outcome of one spawned analysis, tagged with the resume's input position.
type Slot = (usize, Result<RankingAnalysis, LlmError>);

/// Analyzes every resume concurrently and returns them ranked.
pub async fn rank_resumes(
    llm: &ModelGateway,
    resumes: &[ResumeInput],
    job: &JobRequirement,
    criteria: &[String],
) -> RankingResponse {
    let started = Instant::now();
    let job = Arc::new(job.clone());
    let criteria: Arc<[String]> = criteria.into();

    let mut set: JoinSet<Slot> = JoinSet::new();
    for (index, resume) in resumes.iter().enumerate() {
        let llm = llm.clone();
        let job = Arc::clone(&job);
        let criteria = Arc::clone(&criteria);
        let content = resume.content.clone();
        set.spawn(async move {
            let outcome = analyze_for_ranking(&llm, &content, &job, &criteria).await;
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<RankingAnalysis>> = vec![None; resumes.len()];
    let mut failures = 0usize;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, Ok(analysis))) => slots[index] = Some(analysis),
            Ok((index, Err(e))) => {
                failures += 1;
                warn!("Ranking analysis failed for {}: {e}", resumes[index].filename);
                slots[index] = Some(RankingAnalysis::failed(&e.to_string()));
            }
            // The slot stays empty and is filled with a placeholder below.
            Err(e) => warn!("Ranking task aborted: {e}"),
        }
    }

    let scored: Vec<(String, RankingAnalysis)> = resumes
        .iter()
        .zip(slots)
        .map(|(resume, slot)| {
            let analysis = slot.unwrap_or_else(|| {
                RankingAnalysis::failed("analysis task aborted before completing")
            });
            (resume.filename.clone(), analysis)
        })
        .collect();

    let ranked_resumes = assign_ranks(scored);
    let processing_time = started.elapsed().as_secs_f64();

    info!(
        "Ranked {} resumes ({} failed) in {:.2}s",
        ranked_resumes.len(),
        failures,
        processing_time
    );

    RankingResponse {
        ranked_resumes,
        total_resumes: resumes.len(),
        processing_time,
    }
}

/// Sorts by score descending (ties keep input order) and numbers from 1.
pub fn assign_ranks(mut scored: Vec<(String, RankingAnalysis)>) -> Vec<RankedResult> {
    scored.sort_by(|(_, a), (_, b)| b.overall_score.total_cmp(&a.overall_score));
    scored
        .into_iter()
        .enumerate()
        .map(|(position, (filename, analysis))| RankedResult {
            filename,
            ranking: analysis.into(),
            rank: position + 1,
        })
        .collect()
}
