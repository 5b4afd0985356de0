// Prompt construction for ranking and screening.
// Pure string building: identical inputs always yield identical prompts.

use crate::models::resume::JobRequirement;

const NOT_SPECIFIED: &str = "Not specified";
const NONE_SPECIFIED: &str = "None specified";

const RANKING_SHAPE: &str = r#"{
    "overall_score": <float between 0-100>,
    "breakdown": {
        "skills_match": <float between 0-100>,
        "experience": <float between 0-100>,
        "education": <float between 0-100>,
        "overall_fit": <float between 0-100>
    },
    "reasoning": "<detailed explanation of the ranking>"
}"#;

const RANKING_FOCUS: &str = "\
1. Skills match with required and preferred skills
2. Relevant experience and years of experience
3. Education level and relevance
4. Overall fit for the position";

const SCREENING_SHAPE: &str = r#"{
    "passed": <boolean>,
    "overall_score": <float between 0-100>,
    "breakdown": {
        "skills_match": {
            "score": <float between 0-100>,
            "matched_skills": ["skill1", "skill2"],
            "missing_skills": ["skill1", "skill2"]
        },
        "experience": {
            "score": <float between 0-100>,
            "years_found": <int>,
            "relevance": "<high/medium/low>"
        },
        "education": {
            "score": <float between 0-100>,
            "level": "<degree level>",
            "relevance": "<high/medium/low>"
        },
        "red_flags": {
            "found": <boolean>,
            "issues": ["issue1", "issue2"]
        }
    },
    "recommendations": ["recommendation1", "recommendation2"],
    "red_flags": ["flag1", "flag2"],
    "strengths": ["strength1", "strength2"]
}"#;

const SCREENING_FOCUS: &str = "\
1. Whether the candidate meets minimum requirements
2. Skills gap analysis
3. Experience relevance and duration
4. Education requirements
5. Any red flags or concerns
6. Candidate strengths";

/// Instruction for scoring one resume against a job.
pub fn build_ranking_prompt(resume: &str, job: &JobRequirement, criteria: &[String]) -> String {
    format!(
        "Please analyze the following resume for ranking purposes based on the job requirements.\n\
         \n\
         {job}\n\
         \n\
         RESUME CONTENT:\n\
         {resume}\n\
         \n\
         RANKING CRITERIA: {criteria}\n\
         \n\
         Please provide a detailed analysis in the following JSON format:\n\
         {RANKING_SHAPE}\n\
         \n\
         Focus on:\n\
         {RANKING_FOCUS}\n",
        job = job_block(job),
        criteria = join_or(criteria, NONE_SPECIFIED),
    )
}

/// Instruction for a pass/fail screening of one resume.
pub fn build_screening_prompt(resume: &str, job: &JobRequirement, criteria: &[String]) -> String {
    format!(
        "Please screen the following resume for the job position and provide a pass/fail \
         decision with detailed analysis.\n\
         \n\
         {job}\n\
         \n\
         RESUME CONTENT:\n\
         {resume}\n\
         \n\
         SCREENING CRITERIA: {criteria}\n\
         \n\
         Please provide a detailed screening analysis in the following JSON format:\n\
         {SCREENING_SHAPE}\n\
         \n\
         Focus on:\n\
         {SCREENING_FOCUS}\n",
        job = job_block(job),
        criteria = join_or(criteria, NONE_SPECIFIED),
    )
}

/// The `JOB REQUIREMENTS:` section with defaults for anything missing.
fn job_block(job: &JobRequirement) -> String {
    let title = non_blank_or(&job.title, "Position");
    let description = non_blank_or(&job.description, "No description provided");
    let experience = job
        .experience_years
        .map(|years| format!("{years} years"))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let education = job
        .education_level
        .as_deref()
        .map(|level| non_blank_or(level, NOT_SPECIFIED))
        .unwrap_or(NOT_SPECIFIED);

    format!(
        "JOB REQUIREMENTS:\n\
         Title: {title}\n\
         Description: {description}\n\
         Required Skills: {}\n\
         Preferred Skills: {}\n\
         Experience Required: {experience}\n\
         Education Level: {education}",
        join_or(&job.required_skills, NONE_SPECIFIED),
        join_or(&job.preferred_skills, NONE_SPECIFIED),
    )
}

fn non_blank_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn join_or(items: &[String], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}
