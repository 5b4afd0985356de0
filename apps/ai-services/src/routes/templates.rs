use std::collections::BTreeMap;

use axum::Json;
use serde_json::{json, Value};

use crate::models::resume::JobRequirement;

fn template(
    title: &str,
    description: &str,
    required: &[&str],
    preferred: &[&str],
    years: u32,
    education: &str,
) -> JobRequirement {
    let owned = |skills: &[&str]| skills.iter().map(|s| s.to_string()).collect();
    JobRequirement {
        title: title.to_string(),
        description: description.to_string(),
        required_skills: owned(required),
        preferred_skills: owned(preferred),
        experience_years: Some(years),
        education_level: Some(education.to_string()),
    }
}

/// Starter job descriptions offered to the frontend.
pub fn job_templates() -> BTreeMap<&'static str, JobRequirement> {
    BTreeMap::from([
        (
            "software_engineer",
            template(
                "Software Engineer",
                "Develop and maintain software applications using modern technologies",
                &["JavaScript", "Python", "React", "Node.js", "Git"],
                &["TypeScript", "AWS", "Docker", "Kubernetes", "MongoDB"],
                3,
                "Bachelor's Degree",
            ),
        ),
        (
            "data_scientist",
            template(
                "Data Scientist",
                "Analyze complex data sets to help organizations make better decisions",
                &["Python", "SQL", "Machine Learning", "Statistics", "Pandas"],
                &["TensorFlow", "PyTorch", "AWS", "Spark", "Tableau"],
                2,
                "Master's Degree",
            ),
        ),
        (
            "product_manager",
            template(
                "Product Manager",
                "Lead product development and strategy for software products",
                &[
                    "Product Strategy",
                    "Agile",
                    "User Research",
                    "Data Analysis",
                    "Stakeholder Management",
                ],
                &["SQL", "A/B Testing", "Design Thinking", "Technical Background"],
                4,
                "Bachelor's Degree",
            ),
        ),
        (
            "hr_specialist",
            template(
                "HR Specialist",
                "Manage human resources functions including recruitment, employee relations, and compliance",
                &[
                    "Recruitment",
                    "Employee Relations",
                    "HR Policies",
                    "Compliance",
                    "Communication",
                ],
                &[
                    "HRIS",
                    "Benefits Administration",
                    "Training",
                    "Performance Management",
                ],
                3,
                "Bachelor's Degree",
            ),
        ),
    ])
}

/// GET /api/v1/job-templates
pub async fn templates_handler() -> Json<Value> {
    Json(json!({ "templates": job_templates() }))
}
