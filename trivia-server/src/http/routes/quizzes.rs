//! Quiz endpoint - one random unseen question per call

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::{CategoryRef, Question, ValidationError};

/// Category id meaning "every category"
pub const ALL_CATEGORIES: i32 = 0;

/// Quiz request
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    /// Ids already asked in this quiz
    pub previous_questions: Option<Vec<i32>>,
    pub quiz_category: Option<QuizCategory>,
}

/// Category the quiz draws from
#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    pub id: Option<CategoryRef>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl QuizCategory {
    /// Category text to filter on, `None` for all categories.
    fn filter(&self) -> Result<Option<String>, ValidationError> {
        let id = self
            .id
            .as_ref()
            .ok_or(ValidationError::Missing { field: "quiz_category.id" })?
            .id("quiz_category.id")?;

        Ok((id != ALL_CATEGORIES).then(|| id.to_string()))
    }
}

/// Next question, or `null` once every candidate has been asked
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub success: bool,
    pub question: Option<Question>,
}

/// Uniform draw over the remaining candidates.
pub fn pick_question<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}

/// POST /quizzes - random question not in `previous_questions`
async fn next_quiz_question(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz_category = req
        .quiz_category
        .ok_or(ValidationError::Missing { field: "quiz_category" })?;
    let category = quiz_category.filter()?;
    let previous = req.previous_questions.unwrap_or_default();

    let candidates = state
        .store
        .quiz_candidates(category.as_deref(), &previous)
        .await?;
    let question = pick_question(&candidates, &mut rand::thread_rng());

    tracing::debug!(
        category = ?quiz_category.kind,
        asked = previous.len(),
        remaining = candidates.len(),
        "quiz question drawn"
    );

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

/// Quiz routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/quizzes", post(next_quiz_question))
}
