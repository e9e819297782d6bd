//! Store trait shared by the PostgreSQL and in-memory backends
//!
//! Handlers only talk to `dyn TriviaStore`, so tests can swap in
//! `MemoryStore` or a failing double.

use async_trait::async_trait;

use crate::models::{Category, NewQuestion, Paginated, Pagination, Question};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Persistence operations the HTTP layer needs
#[async_trait]
pub trait TriviaStore: Send + Sync + 'static {
    /// All categories ordered by id.
    async fn categories(&self) -> Result<Vec<Category>, DbError>;

    /// Single category, `NotFound` when absent.
    async fn category(&self, id: i32) -> Result<Category, DbError>;

    /// One page of questions ordered by id, with the total row count.
    async fn list_questions(&self, page: Pagination) -> Result<Paginated<Question>, DbError>;

    /// Questions whose category text equals `category`, ordered by id.
    async fn questions_in_category(&self, category: &str) -> Result<Vec<Question>, DbError>;

    /// Case-insensitive substring match over question text, ordered by id.
    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, DbError>;

    /// Questions in `category` (or all when `None`) whose id is not in `exclude`.
    async fn quiz_candidates(
        &self,
        category: Option<&str>,
        exclude: &[i32],
    ) -> Result<Vec<Question>, DbError>;

    /// Insert a question and return it with its assigned id.
    async fn insert_question(&self, question: NewQuestion) -> Result<Question, DbError>;

    /// Hard-delete a question, `NotFound` when absent.
    async fn delete_question(&self, id: i32) -> Result<(), DbError>;

    async fn count_questions(&self) -> Result<i64, DbError>;

    /// Insert `labels` as categories if none exist yet. Returns rows inserted.
    async fn seed_categories(&self, labels: &[&str]) -> Result<u64, DbError>;
}
