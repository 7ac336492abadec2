use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The two texts compared by one analysis. Both are non-empty once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub resume: String,
    pub job_description: String,
}

impl AnalysisRequest {
    /// Trims both texts and rejects the pair if either ends up empty.
    pub fn new(resume: &str, job_description: &str) -> Result<Self, AppError> {
        let resume = resume.trim();
        let job_description = job_description.trim();
        if resume.is_empty() || job_description.is_empty() {
            return Err(AppError::MissingInput);
        }
        Ok(Self {
            resume: resume.to_string(),
            job_description: job_description.to_string(),
        })
    }
}

/// Successful `/analyze` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis: String,
}

/// JSON body accepted by `/analyze`. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeJsonBody {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
}
