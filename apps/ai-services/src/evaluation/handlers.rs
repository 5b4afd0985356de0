//! Axum route handlers for ranking and screening.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::evaluation::ranker::rank_resumes;
use crate::evaluation::screener::screen_resume;
use crate::evaluation::validation::{validate_ranking, validate_screening};
use crate::models::analysis::{RankingResponse, ScreeningResponse};
use crate::models::resume::{JobRequirement, ResumeInput};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

fn default_ranking_criteria() -> Vec<String> {
    ["skills_match", "experience", "education", "overall_fit"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_screening_criteria() -> Vec<String> {
    ["skills_match", "experience", "education", "red_flags"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub resumes: Vec<ResumeInput>,
    pub job_requirements: JobRequirement,
    #[serde(default = "default_ranking_criteria")]
    pub ranking_criteria: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScreenRequest {
    pub resume: ResumeInput,
    pub job_requirements: JobRequirement,
    #[serde(default = "default_screening_criteria")]
    pub screening_criteria: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/rank
///
/// Ranks a batch of resumes against one job. Individual analysis failures are
/// reported inside the ranking (score 0), never as a request failure.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankingResponse>, AppError> {
    validate_ranking(&request.resumes, &request.job_requirements)?;

    let response = rank_resumes(
        &state.llm,
        &request.resumes,
        &request.job_requirements,
        &request.ranking_criteria,
    )
    .await;

    Ok(Json(response))
}

/// POST /api/v1/resume/screen
///
/// Screens one resume. Upstream failures surface as 429 / 504 / 500.
pub async fn handle_screen(
    State(state): State<AppState>,
    Json(request): Json<ScreenRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    validate_screening(&request.resume, &request.job_requirements)?;

    let response = screen_resume(
        &state.llm,
        &request.resume,
        &request.job_requirements,
        &request.screening_criteria,
    )
    .await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rank_request_defaults_criteria() {
        let request: RankRequest = serde_json::from_value(json!({
            "resumes": [{"content": "Rust", "filename": "a.txt", "format": "text"}],
            "job_requirements": {"title": "Engineer", "description": "x", "required_skills": ["Rust"]}
        }))
        .unwrap();
        assert_eq!(
            request.ranking_criteria,
            vec!["skills_match", "experience", "education", "overall_fit"]
        );
    }

    #[test]
    fn test_screen_request_defaults_criteria() {
        let request: ScreenRequest = serde_json::from_value(json!({
            "resume": {"content": "Rust", "filename": "a.txt", "format": "pdf"},
            "job_requirements": {"title": "Engineer", "description": "x", "required_skills": ["Rust"]}
        }))
        .unwrap();
        assert_eq!(
            request.screening_criteria,
            vec!["skills_match", "experience", "education", "red_flags"]
        );
    }

    #[test]
    fn test_caller_criteria_kept() {
        let request: ScreenRequest = serde_json::from_value(json!({
            "resume": {"content": "Rust", "filename": "a.txt", "format": "docx"},
            "job_requirements": {"required_skills": ["Rust"]},
            "screening_criteria": ["culture_fit"]
        }))
        .unwrap();
        assert_eq!(request.screening_criteria, vec!["culture_fit"]);
    }
}
