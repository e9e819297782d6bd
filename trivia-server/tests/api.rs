//! Router-level tests driving every endpoint against in-memory stores

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use trivia_server::db::{DbError, MemoryStore, TriviaStore};
use trivia_server::models::{
    Category, CategoryRef, NewQuestion, Paginated, Pagination, Question, DEFAULT_CATEGORIES,
};
use trivia_server::build_router;

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(body)).await
}

async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, None).await
}

fn assert_error(res: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(res.status, status, "body: {}", res.body);
    assert_eq!(
        res.body,
        json!({"success": false, "error": status.as_u16(), "message": message})
    );
}

/// Store seeded with the default categories and `n` questions cycling categories 1..=3
async fn seeded_store(n: usize) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::with_categories(&DEFAULT_CATEGORIES));
    for i in 0..n {
        let question = NewQuestion::new(
            Some(format!("Question number {i}?")),
            Some(format!("Answer {i}")),
            Some(CategoryRef::Id((i % 3 + 1) as i64)),
            Some(1 + (i % 5) as i32),
        )
        .unwrap();
        store.insert_question(question).await.unwrap();
    }
    store
}

fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}

// === Categories ===

#[tokio::test]
async fn categories_are_an_id_to_label_map() {
    let app = build_router(seeded_store(0).await);

    let res = get(&app, "/categories").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["categories"]["1"], "Science");
    assert_eq!(res.body["categories"]["6"], "Sports");
    assert_eq!(res.body["categories"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn questions_by_category_carry_label() {
    let app = build_router(seeded_store(9).await);

    let res = get(&app, "/categories/2/questions").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["current_category"], "Art");
    assert_eq!(res.body["total_questions"], 3);
    for q in res.body["questions"].as_array().unwrap() {
        assert_eq!(q["category"], "2");
    }
}

#[tokio::test]
async fn questions_by_unknown_category_is_404() {
    let app = build_router(seeded_store(3).await);

    assert_error(
        &get(&app, "/categories/99/questions").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
    assert_error(
        &get(&app, "/categories/science/questions").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
}

#[tokio::test]
async fn empty_category_returns_empty_list() {
    let app = build_router(seeded_store(3).await);

    let res = get(&app, "/categories/5/questions").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["questions"], json!([]));
    assert_eq!(res.body["current_category"], "Entertainment");
}

// === Listing ===

#[tokio::test]
async fn first_page_of_empty_store_is_ok() {
    let app = build_router(seeded_store(0).await);

    let res = get(&app, "/questions?page=1").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["questions"], json!([]));
    assert_eq!(res.body["total_questions"], 0);
    assert_eq!(res.body["current_category"], Value::Null);

    let res = get(&app, "/questions").await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn page_past_the_end_is_404() {
    let app = build_router(seeded_store(10).await);

    assert_error(
        &get(&app, "/questions?page=2").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
}

#[tokio::test]
async fn pages_hold_ten_and_total_counts_all() {
    let app = build_router(seeded_store(15).await);

    let first = get(&app, "/questions?page=1").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(ids(&first.body["questions"]), (1..=10).collect::<Vec<_>>());
    assert_eq!(first.body["total_questions"], 15);
    assert_eq!(first.body["categories"]["3"], "Geography");

    let second = get(&app, "/questions?page=2").await;
    assert_eq!(ids(&second.body["questions"]), (11..=15).collect::<Vec<_>>());
    assert_eq!(second.body["total_questions"], 15);

    let q = &second.body["questions"][0];
    assert_eq!(q["question"], "Question number 10?");
    assert_eq!(q["answer"], "Answer 10");
    assert_eq!(q["category"], "2");
    assert_eq!(q["difficulty"], 1);
}

#[tokio::test]
async fn malformed_page_is_422() {
    let app = build_router(seeded_store(3).await);

    assert_error(
        &get(&app, "/questions?page=abc").await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "Unprocessable entity",
    );
}

#[tokio::test]
async fn page_below_one_is_404() {
    let app = build_router(seeded_store(3).await);

    assert_error(
        &get(&app, "/questions?page=0").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
    assert_error(
        &get(&app, "/questions?page=-1").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
}

// === Create ===

#[tokio::test]
async fn created_question_is_searchable() {
    let store = seeded_store(0).await;
    let app = build_router(store.clone());

    let res = post(
        &app,
        "/questions",
        json!({"question": "Q?", "answer": "A", "category": "1", "difficulty": 2}),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);
    let created = res.body["created"].as_i64().unwrap();

    let res = post(&app, "/questions/search", json!({"searchTerm": "Q"})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(ids(&res.body["questions"]).contains(&created));
    assert_eq!(store.count_questions().await.unwrap(), 1);
}

#[tokio::test]
async fn numeric_category_is_stored_as_text() {
    let app = build_router(seeded_store(0).await);

    let res = post(
        &app,
        "/questions",
        json!({"question": "Q?", "answer": "A", "category": 4, "difficulty": 3}),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = get(&app, "/categories/4/questions").await;
    assert_eq!(res.body["total_questions"], 1);
    assert_eq!(res.body["questions"][0]["category"], "4");
}

#[tokio::test]
async fn create_rejects_missing_or_falsy_fields_without_writing() {
    let store = seeded_store(2).await;
    let app = build_router(store.clone());

    let invalid = [
        json!({"answer": "A", "category": "1", "difficulty": 2}),
        json!({"question": "Q?", "category": "1", "difficulty": 2}),
        json!({"question": "Q?", "answer": "A", "difficulty": 2}),
        json!({"question": "Q?", "answer": "A", "category": "1"}),
        json!({"question": "", "answer": "A", "category": "1", "difficulty": 2}),
        json!({"question": "Q?", "answer": "", "category": "1", "difficulty": 2}),
        json!({"question": "Q?", "answer": "A", "category": "", "difficulty": 2}),
        json!({"question": "Q?", "answer": "A", "category": "1", "difficulty": 0}),
        json!({"question": "Q?", "answer": null, "category": "1", "difficulty": 2}),
        json!({}),
    ];

    for body in invalid {
        let res = post(&app, "/questions", body.clone()).await;
        assert_error(&res, StatusCode::BAD_REQUEST, "Bad request");
    }

    assert_eq!(store.count_questions().await.unwrap(), 2);
}

#[tokio::test]
async fn create_with_malformed_body_is_400() {
    let app = build_router(seeded_store(0).await);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/questions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let res = send(&app, Method::POST, "/questions", None).await;
    assert_error(&res, StatusCode::BAD_REQUEST, "Bad request");

    let res = post(
        &app,
        "/questions",
        json!({"question": "Q?", "answer": "A", "category": "1", "difficulty": "hard"}),
    )
    .await;
    assert_error(&res, StatusCode::BAD_REQUEST, "Bad request");
}

// === Delete ===

#[tokio::test]
async fn deleted_question_disappears() {
    let store = seeded_store(5).await;
    let app = build_router(store.clone());

    let res = delete(&app, "/questions/3").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"success": true, "deleted": 3}));

    let listing = get(&app, "/questions").await;
    assert!(!ids(&listing.body["questions"]).contains(&3));
    assert_eq!(listing.body["total_questions"], 4);

    let by_category = get(&app, "/categories/3/questions").await;
    assert!(!ids(&by_category.body["questions"]).contains(&3));

    assert_error(
        &delete(&app, "/questions/3").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
}

#[tokio::test]
async fn delete_non_integer_id_is_404() {
    let app = build_router(seeded_store(1).await);

    assert_error(
        &delete(&app, "/questions/abc").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
}

// === Search ===

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let store = seeded_store(0).await;
    for text in [
        "What is the title of the 1990 fantasy?",
        "Whose autobiography is entitled 'I Know Why'?",
        "How many planets?",
    ] {
        let q = NewQuestion::new(
            Some(text.into()),
            Some("x".into()),
            Some(CategoryRef::Id(1)),
            Some(1),
        )
        .unwrap();
        store.insert_question(q).await.unwrap();
    }
    let app = build_router(store);

    let res = post(&app, "/questions/search", json!({"searchTerm": "TITLE"})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.body["questions"]), vec![1, 2]);
    assert_eq!(res.body["total_questions"], 2);
    assert_eq!(res.body["current_category"], Value::Null);

    let res = post(&app, "/questions/search", json!({"searchTerm": "zzz"})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["total_questions"], 0);
}

#[tokio::test]
async fn empty_search_term_is_400() {
    let app = build_router(seeded_store(3).await);

    assert_error(
        &post(&app, "/questions/search", json!({"searchTerm": ""})).await,
        StatusCode::BAD_REQUEST,
        "Bad request",
    );
    assert_error(
        &post(&app, "/questions/search", json!({})).await,
        StatusCode::BAD_REQUEST,
        "Bad request",
    );
}

// === Quizzes ===

#[tokio::test]
async fn quiz_over_all_categories_draws_from_full_set() {
    let app = build_router(seeded_store(6).await);

    let res = post(
        &app,
        "/quizzes",
        json!({"previous_questions": [], "quiz_category": {"id": 0, "type": "click"}}),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    let id = res.body["question"]["id"].as_i64().unwrap();
    assert!((1..=6).contains(&id));
}

#[tokio::test]
async fn quiz_is_null_once_everything_was_asked() {
    let app = build_router(seeded_store(6).await);

    let res = post(
        &app,
        "/quizzes",
        json!({"previous_questions": [1, 2, 3, 4, 5, 6], "quiz_category": {"id": 0}}),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"success": true, "question": null}));
}

#[tokio::test]
async fn quiz_respects_category_and_previous() {
    let app = build_router(seeded_store(9).await);

    // category 1 holds ids 1, 4, 7
    for _ in 0..20 {
        let res = post(
            &app,
            "/quizzes",
            json!({"previous_questions": [1, 7], "quiz_category": {"id": "1", "type": "Science"}}),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["question"]["id"], 4);
        assert_eq!(res.body["question"]["category"], "1");
    }
}

#[tokio::test]
async fn quiz_walks_every_question_exactly_once() {
    let app = build_router(seeded_store(8).await);
    let mut asked: Vec<i64> = Vec::new();

    loop {
        let res = post(
            &app,
            "/quizzes",
            json!({"previous_questions": asked, "quiz_category": {"id": 0}}),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
        match res.body["question"]["id"].as_i64() {
            Some(id) => {
                assert!(!asked.contains(&id));
                asked.push(id);
            }
            None => break,
        }
    }

    asked.sort_unstable();
    assert_eq!(asked, (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn quiz_requires_a_well_formed_category() {
    let app = build_router(seeded_store(3).await);

    let invalid = [
        json!({"previous_questions": []}),
        json!({"previous_questions": [], "quiz_category": null}),
        json!({"previous_questions": [], "quiz_category": {"type": "Science"}}),
        json!({"previous_questions": [], "quiz_category": {"id": "science"}}),
        json!({"previous_questions": [], "quiz_category": "Science"}),
    ];

    for body in invalid {
        assert_error(
            &post(&app, "/quizzes", body).await,
            StatusCode::BAD_REQUEST,
            "Bad request",
        );
    }
}

#[tokio::test]
async fn quiz_previous_questions_default_to_empty() {
    let app = build_router(seeded_store(1).await);

    let res = post(&app, "/quizzes", json!({"quiz_category": {"id": 0}})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["question"]["id"], 1);
}

// === Cross-cutting ===

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let app = build_router(seeded_store(1).await);

    for res in [
        get(&app, "/categories").await,
        get(&app, "/questions?page=9").await,
        post(&app, "/questions", json!({})).await,
    ] {
        assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            res.headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type,Authorization"
        );
        assert_eq!(
            res.headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET,PUT,POST,DELETE,OPTIONS"
        );
    }
}

#[tokio::test]
async fn preflight_is_answered() {
    let app = build_router(seeded_store(0).await);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/questions/1")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("DELETE"));
}

#[tokio::test]
async fn unknown_route_is_404_envelope() {
    let app = build_router(seeded_store(0).await);

    assert_error(
        &get(&app, "/nope").await,
        StatusCode::NOT_FOUND,
        "Resource not found",
    );
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_router(seeded_store(0).await);

    let res = get(&app, "/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["questions"], 0);
}

/// Store whose every operation fails like a dropped connection
struct FailingStore;

fn unavailable() -> DbError {
    DbError::Unavailable("connection reset".into())
}

#[async_trait]
impl TriviaStore for FailingStore {
    async fn categories(&self) -> Result<Vec<Category>, DbError> {
        Err(unavailable())
    }
    async fn category(&self, _: i32) -> Result<Category, DbError> {
        Err(unavailable())
    }
    async fn list_questions(&self, _: Pagination) -> Result<Paginated<Question>, DbError> {
        Err(unavailable())
    }
    async fn questions_in_category(&self, _: &str) -> Result<Vec<Question>, DbError> {
        Err(unavailable())
    }
    async fn search_questions(&self, _: &str) -> Result<Vec<Question>, DbError> {
        Err(unavailable())
    }
    async fn quiz_candidates(&self, _: Option<&str>, _: &[i32]) -> Result<Vec<Question>, DbError> {
        Err(unavailable())
    }
    async fn insert_question(&self, _: NewQuestion) -> Result<Question, DbError> {
        Err(unavailable())
    }
    async fn delete_question(&self, _: i32) -> Result<(), DbError> {
        Err(unavailable())
    }
    async fn count_questions(&self) -> Result<i64, DbError> {
        Err(unavailable())
    }
    async fn seed_categories(&self, _: &[&str]) -> Result<u64, DbError> {
        Err(unavailable())
    }
}

#[tokio::test]
async fn store_failures_are_422() {
    let app = build_router(Arc::new(FailingStore));

    let responses = [
        get(&app, "/categories").await,
        get(&app, "/questions").await,
        get(&app, "/categories/1/questions").await,
        delete(&app, "/questions/1").await,
        post(
            &app,
            "/questions",
            json!({"question": "Q?", "answer": "A", "category": "1", "difficulty": 2}),
        )
        .await,
        post(&app, "/questions/search", json!({"searchTerm": "a"})).await,
        post(&app, "/quizzes", json!({"quiz_category": {"id": 0}})).await,
    ];

    for res in &responses {
        assert_error(res, StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable entity");
    }
}

#[tokio::test]
async fn health_is_degraded_when_store_fails() {
    let app = build_router(Arc::new(FailingStore));

    let res = get(&app, "/health").await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["status"], "degraded");
    assert_eq!(res.body["questions"], Value::Null);
}

#[tokio::test]
async fn validation_runs_before_the_store() {
    let app = build_router(Arc::new(FailingStore));

    assert_error(
        &post(&app, "/questions", json!({"question": "Q?"})).await,
        StatusCode::BAD_REQUEST,
        "Bad request",
    );
    assert_error(
        &post(&app, "/quizzes", json!({})).await,
        StatusCode::BAD_REQUEST,
        "Bad request",
    );
}

/// Store that panics mid-request
struct PanickingStore;

#[async_trait]
impl TriviaStore for PanickingStore {
    async fn categories(&self) -> Result<Vec<Category>, DbError> {
        panic!("categories table exploded")
    }
    async fn category(&self, _: i32) -> Result<Category, DbError> {
        Err(unavailable())
    }
    async fn list_questions(&self, _: Pagination) -> Result<Paginated<Question>, DbError> {
        Err(unavailable())
    }
    async fn questions_in_category(&self, _: &str) -> Result<Vec<Question>, DbError> {
        Err(unavailable())
    }
    async fn search_questions(&self, _: &str) -> Result<Vec<Question>, DbError> {
        Err(unavailable())
    }
    async fn quiz_candidates(&self, _: Option<&str>, _: &[i32]) -> Result<Vec<Question>, DbError> {
        Err(unavailable())
    }
    async fn insert_question(&self, _: NewQuestion) -> Result<Question, DbError> {
        Err(unavailable())
    }
    async fn delete_question(&self, _: i32) -> Result<(), DbError> {
        Err(unavailable())
    }
    async fn count_questions(&self) -> Result<i64, DbError> {
        Err(unavailable())
    }
    async fn seed_categories(&self, _: &[&str]) -> Result<u64, DbError> {
        Err(unavailable())
    }
}

#[tokio::test]
async fn panics_become_500_with_cors() {
    let app = build_router(Arc::new(PanickingStore));

    let res = get(&app, "/categories").await;
    assert_error(&res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
