//! Q&A thread models and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub farm_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `question_answers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionAnswer {
    pub id: DbId,
    pub question_id: DbId,
    pub answered_by: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for opening a question thread.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestion {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// DTO for answering a question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnswer {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// A question with its answers, for detail responses.
#[derive(Debug, Serialize)]
pub struct QuestionWithAnswers {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<QuestionAnswer>,
}
