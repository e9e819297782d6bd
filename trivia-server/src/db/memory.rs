//! In-memory store for local runs and tests

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{DbError, TriviaStore};
use crate::models::{Category, NewQuestion, Paginated, Pagination, Question};

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<Category>,
    questions: Vec<Question>,
    next_category_id: i32,
    next_question_id: i32,
}

/// Store backed by vectors behind a lock
///
/// Ids are assigned sequentially from 1 and never reused, like a SERIAL column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given category labels (ids 1..).
    pub fn with_categories(labels: &[&str]) -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.write() {
            for label in labels {
                insert_category(&mut tables, label);
            }
        }
        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DbError> {
        self.tables
            .read()
            .map_err(|_| DbError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DbError> {
        self.tables
            .write()
            .map_err(|_| DbError::Unavailable("memory store lock poisoned".into()))
    }
}

fn insert_category(tables: &mut Tables, label: &str) {
    tables.next_category_id += 1;
    tables.categories.push(Category {
        id: tables.next_category_id,
        kind: label.to_owned(),
    });
}

#[async_trait]
impl TriviaStore for MemoryStore {
    async fn categories(&self) -> Result<Vec<Category>, DbError> {
        Ok(self.read()?.categories.clone())
    }

    async fn category(&self, id: i32) -> Result<Category, DbError> {
        self.read()?
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| DbError::not_found("category", id))
    }

    async fn list_questions(&self, page: Pagination) -> Result<Paginated<Question>, DbError> {
        let tables = self.read()?;
        let items = tables
            .questions
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok(Paginated {
            items,
            total: tables.questions.len() as i64,
            page: page.page,
        })
    }

    async fn questions_in_category(&self, category: &str) -> Result<Vec<Question>, DbError> {
        Ok(self
            .read()?
            .questions
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, DbError> {
        let needle = term.to_lowercase();
        Ok(self
            .read()?
            .questions
            .iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn quiz_candidates(
        &self,
        category: Option<&str>,
        exclude: &[i32],
    ) -> Result<Vec<Question>, DbError> {
        Ok(self
            .read()?
            .questions
            .iter()
            .filter(|q| category.map_or(true, |c| q.category == c))
            .filter(|q| !exclude.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, DbError> {
        let mut tables = self.write()?;
        tables.next_question_id += 1;
        let created = question.with_id(tables.next_question_id);
        tables.questions.push(created.clone());
        Ok(created)
    }

    async fn delete_question(&self, id: i32) -> Result<(), DbError> {
        let mut tables = self.write()?;
        let before = tables.questions.len();
        tables.questions.retain(|q| q.id != id);
        if tables.questions.len() == before {
            return Err(DbError::not_found("question", id));
        }
        Ok(())
    }

    async fn count_questions(&self) -> Result<i64, DbError> {
        Ok(self.read()?.questions.len() as i64)
    }

    async fn seed_categories(&self, labels: &[&str]) -> Result<u64, DbError> {
        let mut tables = self.write()?;
        if !tables.categories.is_empty() {
            return Ok(0);
        }
        for label in labels {
            insert_category(&mut tables, label);
        }
        Ok(labels.len() as u64)
    }
}
