//! The two model-backed analyses. Both go through the gateway's limiter and retry loop.

use crate::evaluation::prompts::{build_ranking_prompt, build_screening_prompt};
use crate::llm_client::prompts::{RANKING_SYSTEM, SCREENING_SYSTEM};
use crate::llm_client::{LlmError, ModelGateway};
use crate::models::analysis::{RankingAnalysis, ScreeningAnalysis};
use crate::models::resume::JobRequirement;

/// Scores one resume against a job for ranking.
pub async fn analyze_for_ranking(
    llm: &ModelGateway,
    resume_text: &str,
    job: &JobRequirement,
    criteria: &[String],
) -> Result<RankingAnalysis, LlmError> {
    let prompt = build_ranking_prompt(resume_text, job, criteria);
    llm.complete_json(RANKING_SYSTEM, &prompt).await
}

/// Asks the model for a pass/fail screening. The verdict is raw; callers apply
/// the decision policy on top.
pub async fn screen(
    llm: &ModelGateway,
    resume_text: &str,
    job: &JobRequirement,
    criteria: &[String],
) -> Result<ScreeningAnalysis, LlmError> {
    let prompt = build_screening_prompt(resume_text, job, criteria);
    llm.complete_json(SCREENING_SYSTEM, &prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{gateway, policy, ScriptedBackend};
    use crate::llm_client::UpstreamError;
    use std::sync::Arc;

    fn job() -> JobRequirement {
        JobRequirement {
            title: "Data Scientist".to_string(),
            required_skills: vec!["Python".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ranking_analysis_decoded_from_wrapped_reply() {
        let reply = r#"Here is my analysis:
{"overall_score": 82.5, "breakdown": {"skills_match": 90, "experience": 80, "education": 75, "overall_fit": 85}, "reasoning": "Solid fit"}
Let me know if you need more."#;
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(reply.to_string())], ""));
        let llm = gateway(backend, 1, policy(0));

        let analysis = analyze_for_ranking(&llm, "resume", &job(), &[]).await.unwrap();
        assert_eq!(analysis.overall_score, 82.5);
        assert_eq!(analysis.breakdown["overall_fit"], 85.0);
        assert_eq!(analysis.reasoning, "Solid fit");
    }

    #[tokio::test]
    async fn test_screen_decodes_nested_breakdown() {
        let reply = r#"{"passed": false, "overall_score": 58, "breakdown": {"red_flags": {"found": false, "issues": []}}, "strengths": ["SQL"]}"#;
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(reply.to_string())], ""));
        let llm = gateway(backend, 1, policy(0));

        let analysis = screen(&llm, "resume", &job(), &[]).await.unwrap();
        assert!(!analysis.passed);
        assert_eq!(analysis.overall_score, 58.0);
        assert_eq!(analysis.strengths, vec!["SQL"]);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let backend = Arc::new(ScriptedBackend::new(
            vec![Err(UpstreamError::Other("bad deployment".into()))],
            "",
        ));
        let llm = gateway(backend, 1, policy(0));

        let err = screen(&llm, "resume", &job(), &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Upstream(UpstreamError::Other(_))));
    }
}
