//! PostgreSQL-backed store

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{DbError, TriviaStore};
use crate::models::{Category, NewQuestion, Paginated, Pagination, Question};

const QUESTION_COLUMNS: &str = "id, question, answer, difficulty, category";

/// Store over a sqlx connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escape LIKE metacharacters so the term matches literally, then wrap in `%`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl TriviaStore for PgStore {
    async fn categories(&self) -> Result<Vec<Category>, DbError> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn category(&self, id: i32) -> Result<Category, DbError> {
        sqlx::query_as::<_, Category>("SELECT id, type FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("category", id))
    }

    /// Single query with COUNT(*) OVER() for the total.
    async fn list_questions(&self, page: Pagination) -> Result<Paginated<Question>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {QUESTION_COLUMNS}, COUNT(*) OVER() AS total \
             FROM questions ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        // past the last page the window count is unavailable
        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            None => self.count_questions().await?,
        };

        let items = rows
            .into_iter()
            .map(|r| {
                Ok(Question {
                    id: r.try_get("id")?,
                    question: r.try_get("question")?,
                    answer: r.try_get("answer")?,
                    difficulty: r.try_get("difficulty")?,
                    category: r.try_get("category")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
        })
    }

    async fn questions_in_category(&self, category: &str) -> Result<Vec<Question>, DbError> {
        let rows = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, DbError> {
        let rows = sqlx::query_as::<_, Question>(&format!(
            r"SELECT {QUESTION_COLUMNS} FROM questions WHERE question ILIKE $1 ESCAPE '\' ORDER BY id"
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn quiz_candidates(
        &self,
        category: Option<&str>,
        exclude: &[i32],
    ) -> Result<Vec<Question>, DbError> {
        let rows = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE ($1::TEXT IS NULL OR category = $1) AND NOT (id = ANY($2)) \
             ORDER BY id"
        ))
        .bind(category)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, DbError> {
        let row = sqlx::query_as::<_, Question>(&format!(
            "INSERT INTO questions (question, answer, category, difficulty) \
             VALUES ($1, $2, $3, $4) RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(question.question())
        .bind(question.answer())
        .bind(question.category())
        .bind(question.difficulty())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_question(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("question", id));
        }
        Ok(())
    }

    async fn count_questions(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn seed_categories(&self, labels: &[&str]) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for label in labels {
            inserted += sqlx::query("INSERT INTO categories (type) VALUES ($1)")
                .bind(*label)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
