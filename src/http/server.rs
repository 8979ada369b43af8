//! HTTP server for the dashboard API and page

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{delete, get},
    Router,
};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handler::{
    add_favorite_handler, edit_favorites_handler, faculty_keywords_handler,
    list_favorites_handler, options_handler, remove_favorite_handler, status_handler,
    top_keywords_handler, top_universities_handler, university_keywords_handler,
};
use crate::dashboard::Dashboard;

#[derive(RustEmbed)]
#[folder = "src/http/static/"]
struct Assets;

async fn static_handler() -> impl IntoResponse {
    match Assets::get("index.html") {
        Some(page) => Html(String::from_utf8_lossy(page.data.as_ref()).into_owned()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "dashboard page not bundled",
        )
            .into_response(),
    }
}

/// Build the dashboard router
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(static_handler))
        .route("/api/status", get(status_handler))
        .route("/api/options", get(options_handler))
        .route("/api/keywords/top", get(top_keywords_handler))
        .route("/api/universities/top", get(top_universities_handler))
        .route("/api/universities/keyword-scores", get(university_keywords_handler))
        .route("/api/faculty/keyword-scores", get(faculty_keywords_handler))
        .route(
            "/api/favorites",
            get(list_favorites_handler)
                .post(add_favorite_handler)
                .put(edit_favorites_handler),
        )
        .route("/api/favorites/:keyword", delete(remove_favorite_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard)
}

/// HTTP server serving the dashboard
pub struct HttpServer {
    dashboard: Arc<Dashboard>,
    address: String,
}

impl HttpServer {
    /// Create a new HTTP server bound to `address` (`host:port`)
    pub fn new(dashboard: Arc<Dashboard>, address: impl Into<String>) -> Self {
        Self {
            dashboard,
            address: address.into(),
        }
    }

    /// Start the HTTP server
    pub async fn start(&self) -> std::io::Result<()> {
        let app = router(Arc::clone(&self.dashboard));
        let listener = tokio::net::TcpListener::bind(&self.address).await?;

        info!("Dashboard available at http://{}", self.address);

        axum::serve(listener, app).await
    }
}
