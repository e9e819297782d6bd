//! Category endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::IdPath;
use crate::http::server::AppState;
use crate::models::{CategoryMap, Question};

/// Category listing response
#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: CategoryMap,
}

/// Questions in one category
#[derive(Serialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
}

/// GET /categories - id -> label for every category
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = state.store.categories().await?.into_iter().collect();
    Ok(Json(CategoriesResponse { categories }))
}

/// GET /categories/{id}/questions - every question filed under the category
async fn questions_for_category(
    State(state): State<Arc<AppState>>,
    IdPath(category_id): IdPath,
) -> Result<Json<CategoryQuestionsResponse>, ApiError> {
    let category = state.store.category(category_id).await?;
    let questions = state.store.questions_in_category(&category.key()).await?;

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: category.kind,
    }))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
}
