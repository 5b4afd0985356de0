use serde::{Deserialize, Serialize};

/// Source format of a resume. Metadata only; text is already extracted upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeFormat {
    Text,
    Pdf,
    Docx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeInput {
    pub content: String,
    pub filename: String,
    pub format: ResumeFormat,
}

/// What the position asks for. Blank title/description fall back to
/// prompt defaults rather than failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub education_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_format_is_lowercase_on_the_wire() {
        let format: ResumeFormat = serde_json::from_str(r#""docx""#).unwrap();
        assert_eq!(format, ResumeFormat::Docx);
        assert_eq!(serde_json::to_string(&ResumeFormat::Pdf).unwrap(), r#""pdf""#);
        assert!(serde_json::from_str::<ResumeFormat>(r#""rtf""#).is_err());
    }

    #[test]
    fn test_job_requirement_optional_fields_default() {
        let job: JobRequirement =
            serde_json::from_str(r#"{"required_skills": ["Rust"]}"#).unwrap();
        assert_eq!(job.title, "");
        assert!(job.preferred_skills.is_empty());
        assert!(job.experience_years.is_none());
        assert!(job.education_level.is_none());
    }

    #[test]
    fn test_job_requirement_requires_skill_list() {
        assert!(serde_json::from_str::<JobRequirement>(r#"{"title": "Engineer"}"#).is_err());
    }
}
