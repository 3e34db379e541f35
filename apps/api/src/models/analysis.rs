use serde::{Deserialize, Serialize};

/// JSON body of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub resume: String,
    pub job_description: String,
}

/// A single learning-plan video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    pub video: String,
    pub thumbnail: String,
}

/// Structured outcome of one analysis call. Built fresh per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub match_score: u32, // 0 – 100
    pub reason: String,
    pub learning_plan: Vec<VideoRecord>,
}
