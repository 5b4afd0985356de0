use crate::errors::AppError;
use crate::models::resume::{JobRequirement, ResumeInput};

/// Largest batch accepted by the ranking endpoint.
pub const MAX_RESUMES_PER_RANKING: usize = 50;

pub fn validate_ranking(resumes: &[ResumeInput], job: &JobRequirement) -> Result<(), AppError> {
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "At least one resume must be provided".to_string(),
        ));
    }
    if resumes.len() > MAX_RESUMES_PER_RANKING {
        return Err(AppError::Validation(format!(
            "Maximum {MAX_RESUMES_PER_RANKING} resumes can be ranked at once, got {}",
            resumes.len()
        )));
    }
    require_skills(job)?;
    if let Some(empty) = resumes.iter().find(|r| r.content.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "Resume {} has empty content",
            empty.filename
        )));
    }
    Ok(())
}

pub fn validate_screening(resume: &ResumeInput, job: &JobRequirement) -> Result<(), AppError> {
    if resume.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume content cannot be empty".to_string(),
        ));
    }
    require_skills(job)?;
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("Job title is required".to_string()));
    }
    if job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required".to_string(),
        ));
    }
    Ok(())
}

fn require_skills(job: &JobRequirement) -> Result<(), AppError> {
    if job.required_skills.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::Validation(
            "At least one required skill must be specified".to_string(),
        ));
    }
    Ok(())
}
