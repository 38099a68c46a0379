// src/models/stats.rs

use serde::Serialize;

/// Score band used by the distribution chart.
/// Variant order is the display order, best band first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    Excellent,
    Good,
    Average,
    Pass,
    Fail,
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::Excellent,
        Grade::Good,
        Grade::Average,
        Grade::Pass,
        Grade::Fail,
    ];

    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 90 => Grade::Excellent,
            s if s >= 80 => Grade::Good,
            s if s >= 70 => Grade::Average,
            s if s >= 60 => Grade::Pass,
            _ => Grade::Fail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeCount {
    pub grade: Grade,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionErrorRate {
    /// 1-based label, e.g. "Question 3".
    pub question: String,
    pub error_rate: f64,
}

/// Response body of `GET /api/dashboard/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_count: i64,
    pub avg_score: f64,
    pub max_score: i32,
    pub pass_rate: f64,
    pub score_distribution: Vec<GradeCount>,
    pub error_rates: Vec<QuestionErrorRate>,
}
