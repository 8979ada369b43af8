//! HTTP handlers for the dashboard API

use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::dashboard::Dashboard;
use crate::favorites::{FavoritesError, FavoritesEvent, FavoritesResult, Transition};
use crate::store::YearRange;

/// Year-range query parameters; missing bounds default to the dataset limits
#[derive(Debug, Deserialize, Default)]
pub struct RangeParams {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl RangeParams {
    fn range(&self) -> YearRange {
        YearRange::from_bounds(self.start, self.end)
    }
}

#[derive(Debug, Deserialize)]
pub struct KeywordParams {
    pub keyword: String,
    pub start: Option<i32>,
    pub end: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UniversityParams {
    pub university: String,
}

#[derive(Debug, Deserialize)]
pub struct FacultyParams {
    pub faculty: String,
    pub start: Option<i32>,
    pub end: Option<i32>,
}

/// Body of `POST /api/favorites`
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub keyword: String,
}

/// Body of `PUT /api/favorites`: the favorites table as currently displayed
#[derive(Debug, Deserialize)]
pub struct TableEditRequest {
    pub keywords: Vec<String>,
}

/// Handler for system status
pub async fn status_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
    }))
}

/// Dropdown choices
pub async fn options_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    Json(dashboard.options().await)
}

/// Top keywords by publication count
pub async fn top_keywords_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Query(params): Query<RangeParams>,
) -> impl IntoResponse {
    Json(dashboard.top_keywords(params.range()).await)
}

/// Top universities for a keyword
pub async fn top_universities_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Query(params): Query<KeywordParams>,
) -> impl IntoResponse {
    Json(
        dashboard
            .top_universities(&params.keyword, YearRange::from_bounds(params.start, params.end))
            .await,
    )
}

/// Keyword-score pie chart for a university
pub async fn university_keywords_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Query(params): Query<UniversityParams>,
) -> impl IntoResponse {
    Json(dashboard.university_keyword_scores(&params.university).await)
}

/// Keyword scores for a faculty member
pub async fn faculty_keywords_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Query(params): Query<FacultyParams>,
) -> impl IntoResponse {
    Json(
        dashboard
            .faculty_keyword_scores(&params.faculty, YearRange::from_bounds(params.start, params.end))
            .await,
    )
}

/// Current favorites panel
pub async fn list_favorites_handler(
    State(dashboard): State<Arc<Dashboard>>,
) -> impl IntoResponse {
    Json(dashboard.favorites().await)
}

/// Add-to-favorites button
pub async fn add_favorite_handler(
    State(dashboard): State<Arc<Dashboard>>,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> axum::response::Response {
    match payload {
        Ok(Json(payload)) => {
            transition_response(dashboard.apply(FavoritesEvent::Add(payload.keyword)).await)
        }
        Err(rejection) => bad_request(rejection),
    }
}

/// Row delete gesture
pub async fn remove_favorite_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Path(keyword): Path<String>,
) -> impl IntoResponse {
    transition_response(dashboard.apply(FavoritesEvent::Remove(keyword)).await)
}

/// Whole-table edit reported by a grid widget
pub async fn edit_favorites_handler(
    State(dashboard): State<Arc<Dashboard>>,
    payload: Result<Json<TableEditRequest>, JsonRejection>,
) -> axum::response::Response {
    match payload {
        Ok(Json(payload)) => transition_response(
            dashboard
                .apply(FavoritesEvent::TableEdited(payload.keywords))
                .await,
        ),
        Err(rejection) => bad_request(rejection),
    }
}

/// Malformed or mistyped request bodies are reported as 400
fn bad_request(rejection: JsonRejection) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}

fn transition_response(result: FavoritesResult<Transition>) -> axum::response::Response {
    match result {
        Ok(transition) => Json(transition).into_response(),
        Err(FavoritesError::Store(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
