//! Repository for Q&A threads (`questions`, `question_answers`).

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::question::{Question, QuestionAnswer};
use crate::repositories::Page;

/// Column list for `questions` queries.
const COLUMNS: &str = "id, farm_id, created_by, title, content, created_at, updated_at";

/// Provides CRUD operations for questions and their answers.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Open a new question thread.
    pub async fn create(
        pool: &PgPool,
        farm_id: DbId,
        created_by: DbId,
        title: &str,
        content: &str,
    ) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions (farm_id, created_by, title, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(farm_id)
            .bind(created_by)
            .bind(title)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Find a question by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a farm's questions, newest first, with keyword match on title.
    pub async fn list_for_farm(
        pool: &PgPool,
        farm_id: DbId,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Question>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM questions \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::text IS NULL OR title ILIKE $2)",
        )
        .bind(farm_id)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM questions \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::text IS NULL OR title ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Question>(&query)
            .bind(farm_id)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Append an answer to a question.
    pub async fn add_answer(
        pool: &PgPool,
        question_id: DbId,
        answered_by: DbId,
        content: &str,
    ) -> Result<QuestionAnswer, sqlx::Error> {
        sqlx::query_as::<_, QuestionAnswer>(
            "INSERT INTO question_answers (question_id, answered_by, content) \
             VALUES ($1, $2, $3) \
             RETURNING id, question_id, answered_by, content, created_at",
        )
        .bind(question_id)
        .bind(answered_by)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    /// All answers of a question, oldest first.
    pub async fn list_answers(
        pool: &PgPool,
        question_id: DbId,
    ) -> Result<Vec<QuestionAnswer>, sqlx::Error> {
        sqlx::query_as::<_, QuestionAnswer>(
            "SELECT id, question_id, answered_by, content, created_at \
             FROM question_answers \
             WHERE question_id = $1 \
             ORDER BY created_at, id",
        )
        .bind(question_id)
        .fetch_all(pool)
        .await
    }

    /// Soft-delete a question. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE questions SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
