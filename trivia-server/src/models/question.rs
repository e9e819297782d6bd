//! Question records and validated input for new questions

use serde::Serialize;
use sqlx::FromRow;

use super::{CategoryRef, ValidationError};

/// Question record
///
/// Serializes to the wire shape `{id, question, answer, difficulty, category}`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub difficulty: i32,
    /// Category id in text form; not enforced against existing categories
    pub category: String,
}

/// Validated input for inserting a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    question: String,
    answer: String,
    category: String,
    difficulty: i32,
}

impl NewQuestion {
    /// Validate raw request fields.
    ///
    /// # Rules
    /// - All four fields are required
    /// - Strings must be non-empty, difficulty non-zero, category non-empty/non-zero
    ///
    /// # Example
    /// ```
    /// use trivia_server::models::{CategoryRef, NewQuestion};
    ///
    /// let ok = NewQuestion::new(
    ///     Some("Q?".into()),
    ///     Some("A".into()),
    ///     Some(CategoryRef::Text("1".into())),
    ///     Some(2),
    /// );
    /// assert!(ok.is_ok());
    ///
    /// let empty_answer = NewQuestion::new(Some("Q?".into()), Some("".into()), Some(CategoryRef::Id(1)), Some(2));
    /// assert!(empty_answer.is_err());
    /// ```
    pub fn new(
        question: Option<String>,
        answer: Option<String>,
        category: Option<CategoryRef>,
        difficulty: Option<i32>,
    ) -> Result<Self, ValidationError> {
        let question = required_text("question", question)?;
        let answer = required_text("answer", answer)?;

        let category = category.ok_or(ValidationError::Missing { field: "category" })?;
        if !category.is_truthy() {
            return Err(ValidationError::Empty { field: "category" });
        }

        let difficulty = difficulty.ok_or(ValidationError::Missing { field: "difficulty" })?;
        if difficulty == 0 {
            return Err(ValidationError::Empty { field: "difficulty" });
        }

        Ok(Self {
            question,
            answer,
            category: category.into_text(),
            difficulty,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> i32 {
        self.difficulty
    }

    /// Attach a store-assigned id.
    pub fn with_id(self, id: i32) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            difficulty: self.difficulty,
            category: self.category,
        }
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::Missing { field }),
        Some(s) if s.is_empty() => Err(ValidationError::Empty { field }),
        Some(s) => Ok(s),
    }
}
