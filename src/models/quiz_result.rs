// src/models/quiz_result.rs

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Per-question correctness of one submission, in question order.
/// Persisted in the `answers` column as a JSON array text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(pub Vec<bool>);

impl AnswerSheet {
    pub fn encode(&self) -> AppResult<String> {
        serde_json::to_string(&self.0)
            .map_err(|e| AppError::InternalServerError(format!("cannot encode answers: {}", e)))
    }

    /// Parses the stored column text. `id` is only used to name the bad row.
    pub fn decode(id: i64, raw: &str) -> AppResult<Self> {
        serde_json::from_str::<Vec<bool>>(raw)
            .map(AnswerSheet)
            .map_err(|e| {
                AppError::DataIntegrity(format!("answers of result {} are malformed: {}", id, e))
            })
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for AnswerSheet {
    fn from(answers: Vec<bool>) -> Self {
        AnswerSheet(answers)
    }
}

/// One stored submission, as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResult {
    pub id: i64,
    pub class_name: String,
    pub student_name: String,
    pub seat_number: String,
    pub score: i32,
    pub answers: AnswerSheet,
    pub submit_time: String,
}

/// Raw `quiz_results` row before the answers column is decoded.
#[derive(Debug, FromRow)]
pub struct QuizResultRow {
    pub id: i64,
    pub class_name: String,
    pub student_name: String,
    pub seat_number: String,
    pub score: i32,
    pub answers: String,
    pub submit_time: String,
}

impl TryFrom<QuizResultRow> for QuizResult {
    type Error = AppError;

    fn try_from(row: QuizResultRow) -> AppResult<Self> {
        let answers = AnswerSheet::decode(row.id, &row.answers)?;
        Ok(QuizResult {
            id: row.id,
            class_name: row.class_name,
            student_name: row.student_name,
            seat_number: row.seat_number,
            score: row.score,
            answers,
            submit_time: row.submit_time,
        })
    }
}

/// A submission about to be inserted. `submit_time` falls back to "now".
#[derive(Debug, Clone, Default)]
pub struct NewQuizResult {
    pub class_name: String,
    pub student_name: String,
    pub seat_number: String,
    pub score: i32,
    pub answers: AnswerSheet,
    pub submit_time: Option<String>,
}

/// Student identity block of a submission.
/// Front-ends send seat numbers (and sometimes classes) as JSON numbers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    #[serde(deserialize_with = "text_or_number")]
    pub class: String,
    #[serde(deserialize_with = "text_or_number")]
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub number: String,
}

/// Accepts a string, a number (kept as its decimal text) or null (empty).
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected text or number, got {}", other))),
    }
}

/// Accepts an integer, a fractional number (rounded) or a numeric string.
fn lenient_score<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value.map(f64::round) {
        Some(v) if v >= i32::MIN as f64 && v <= i32::MAX as f64 => Ok(v as i32),
        _ => Err(D::Error::custom("score must be a number within integer range")),
    }
}

/// DTO for `POST /api/submit`. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
    #[serde(rename = "userInfo")]
    pub user_info: UserInfo,
    #[serde(deserialize_with = "lenient_score")]
    pub score: i32,
    pub answers: Vec<bool>,
    #[serde(rename = "submitTime")]
    pub submit_time: Option<String>,
}

impl From<SubmitRequest> for NewQuizResult {
    fn from(req: SubmitRequest) -> Self {
        NewQuizResult {
            class_name: req.user_info.class,
            student_name: req.user_info.name,
            seat_number: req.user_info.number,
            score: req.score,
            answers: AnswerSheet(req.answers),
            submit_time: req.submit_time,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Query parameters for listing student records.
#[derive(Debug, Deserialize, Validate)]
pub struct StudentListParams {
    /// Restrict to one class. Empty means no filter.
    pub class: Option<String>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: i64,

    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    pub per_page: i64,
}

impl StudentListParams {
    pub fn class_filter(&self) -> Option<&str> {
        self.class.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// `per_page` must already be positive.
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = total / per_page + i64::from(total % per_page != 0);
        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }

    /// Row offset of a 1-based page.
    /// Rejects non-positive values and windows past the representable range.
    pub fn offset(page: i64, per_page: i64) -> AppResult<i64> {
        if page < 1 {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }
        if per_page < 1 {
            return Err(AppError::BadRequest("per_page must be at least 1".to_string()));
        }
        (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| AppError::BadRequest("page is out of range".to_string()))
    }
}

/// One page of student records plus the pre-pagination count.
#[derive(Debug, Serialize)]
pub struct StudentPage {
    pub students: Vec<QuizResult>,
    pub pagination: Pagination,
}
