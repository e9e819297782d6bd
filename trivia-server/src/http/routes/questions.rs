//! Question endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{IdPath, JsonBody, PageQuery};
use crate::http::server::AppState;
use crate::models::{CategoryMap, CategoryRef, NewQuestion, Pagination, Question, ValidationError};

/// Create question request; fields are optional here and checked by `NewQuestion`
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<CategoryRef>,
    pub difficulty: Option<i32>,
}

/// Search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// Paginated listing response
#[derive(Serialize)]
pub struct QuestionPageResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub categories: CategoryMap,
    pub current_category: Option<String>,
}

/// Search response
#[derive(Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: i32,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i32,
}

/// GET /questions?page=N - ten questions per page, ordered by id
async fn list_questions(
    State(state): State<Arc<AppState>>,
    PageQuery(params): PageQuery,
) -> Result<Json<QuestionPageResponse>, ApiError> {
    let requested = params.page();
    let page = Pagination::for_page(requested).ok_or_else(|| ApiError::not_found("page", requested))?;

    let result = state.store.list_questions(page).await?;
    // an empty first page just means an empty store
    if result.items.is_empty() && !page.is_first() {
        return Err(ApiError::not_found("page", requested));
    }

    let categories = state.store.categories().await?.into_iter().collect();

    Ok(Json(QuestionPageResponse {
        success: true,
        questions: result.items,
        total_questions: result.total,
        categories,
        current_category: None,
    }))
}

/// POST /questions - add a question
async fn create_question(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let new_question = NewQuestion::new(req.question, req.answer, req.category, req.difficulty)?;
    let question = state.store.insert_question(new_question).await?;
    tracing::info!(id = question.id, category = %question.category, "question created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            created: question.id,
        }),
    ))
}

/// DELETE /questions/{id} - remove a question permanently
async fn delete_question(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.store.delete_question(id).await?;
    tracing::info!(id, "question deleted");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
    }))
}

/// POST /questions/search - case-insensitive substring match on question text
async fn search_questions(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let term = match req.search_term {
        Some(term) if !term.is_empty() => term,
        Some(_) => return Err(ValidationError::Empty { field: "searchTerm" }.into()),
        None => return Err(ValidationError::Missing { field: "searchTerm" }.into()),
    };

    let questions = state.store.search_questions(&term).await?;
    tracing::debug!(term = %term, matches = questions.len(), "question search");

    Ok(Json(SearchResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: None,
    }))
}

/// Question routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
}
