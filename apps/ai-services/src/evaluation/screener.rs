//! Single-resume screening with a deterministic override on the model's verdict.

use std::time::Instant;

use tracing::info;

use crate::evaluation::analysis::screen;
use crate::llm_client::{LlmError, ModelGateway};
use crate::models::analysis::{ScreeningAnalysis, ScreeningResponse};
use crate::models::resume::{JobRequirement, ResumeInput};

/// At or above this score, with no critical red flag, the resume passes.
pub const PASS_THRESHOLD: f64 = 60.0;
/// Below this score the resume fails.
pub const FAIL_THRESHOLD: f64 = 50.0;

/// Overrides the model's `passed` verdict.
///
/// - score ≥ 60 and no critical red flag → pass
/// - score < 50 or a critical red flag → fail
/// - 50 ≤ score < 60 without red flag → the model's own verdict stands
pub fn apply_decision_policy(mut analysis: ScreeningAnalysis) -> ScreeningAnalysis {
    let critical = analysis.breakdown.red_flags.found;
    let score = analysis.overall_score;

    let decided = if score >= PASS_THRESHOLD && !critical {
        Some(true)
    } else if score < FAIL_THRESHOLD || critical {
        Some(false)
    } else {
        None
    };

    if let Some(passed) = decided {
        if passed != analysis.passed {
            info!(
                "Overriding model screening verdict {} -> {} (score {score}, red flag {critical})",
                analysis.passed, passed
            );
        }
        analysis.passed = passed;
    }
    analysis
}

/// Screens one resume and applies the decision policy.
pub async fn screen_resume(
    llm: &ModelGateway,
    resume: &ResumeInput,
    job: &JobRequirement,
    criteria: &[String],
) -> Result<ScreeningResponse, LlmError> {
    let started = Instant::now();

    let analysis = screen(llm, &resume.content, job, criteria).await?;
    let analysis = apply_decision_policy(analysis);

    info!(
        "Screened {}: passed={} score={}",
        resume.filename, analysis.passed, analysis.overall_score
    );

    Ok(ScreeningResponse {
        result: analysis.into(),
        processing_time: started.elapsed().as_secs_f64(),
    })
}
