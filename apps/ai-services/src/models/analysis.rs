//! Typed model output for ranking and screening, plus the response shapes built from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sub-score names every ranking breakdown carries.
pub const RANKING_SUBSCORES: [&str; 4] = ["skills_match", "experience", "education", "overall_fit"];

/// One resume's ranking analysis as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingAnalysis {
    pub overall_score: f64,
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub reasoning: String,
}

impl RankingAnalysis {
    /// Zero-score stand-in for a resume whose analysis failed.
    pub fn failed(reason: &str) -> Self {
        Self {
            overall_score: 0.0,
            breakdown: RANKING_SUBSCORES
                .iter()
                .map(|k| (k.to_string(), 0.0))
                .collect(),
            reasoning: format!("Analysis failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedFlagSummary {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Screening breakdown. `red_flags` drives the decision policy; every other
/// section (skills_match, experience, education, ...) passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningBreakdown {
    #[serde(default)]
    pub red_flags: RedFlagSummary,
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningAnalysis {
    #[serde(default)]
    pub passed: bool,
    pub overall_score: f64,
    #[serde(default)]
    pub breakdown: ScreeningBreakdown,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Response shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingScore {
    pub score: f64,
    pub breakdown: BTreeMap<String, f64>,
    pub reasoning: String,
}

impl From<RankingAnalysis> for RankingScore {
    fn from(analysis: RankingAnalysis) -> Self {
        Self {
            score: analysis.overall_score,
            breakdown: analysis.breakdown,
            reasoning: analysis.reasoning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub filename: String,
    pub ranking: RankingScore,
    /// 1-based position after sorting.
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    pub ranked_resumes: Vec<RankedResult>,
    pub total_resumes: usize,
    /// Seconds.
    pub processing_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    pub passed: bool,
    pub score: f64,
    pub breakdown: ScreeningBreakdown,
    pub recommendations: Vec<String>,
    pub red_flags: Vec<String>,
    pub strengths: Vec<String>,
}

impl From<ScreeningAnalysis> for ScreeningResult {
    fn from(analysis: ScreeningAnalysis) -> Self {
        Self {
            passed: analysis.passed,
            score: analysis.overall_score,
            breakdown: analysis.breakdown,
            recommendations: analysis.recommendations,
            red_flags: analysis.red_flags,
            strengths: analysis.strengths,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResponse {
    pub result: ScreeningResult,
    /// Seconds.
    pub processing_time: f64,
}
