//! EmbeddedClient: in-process dashboard client
//!
//! Calls the dashboard directly, no network needed.

use async_trait::async_trait;
use std::sync::Arc;

use academicworld::{Dashboard, FavoritesEvent, MemoryStore};

use crate::client::DashboardClient;
use crate::error::SdkResult;
use crate::models::{DashboardOptions, FavoritesSnapshot, PieChart, ServerStatus, TableView, Transition, YearRange};

/// In-process client that wraps a [`Dashboard`] directly.
pub struct EmbeddedClient {
    dashboard: Arc<Dashboard>,
}

impl EmbeddedClient {
    /// Wrap an existing dashboard
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self { dashboard }
    }

    /// Client over the bundled sample dataset
    pub async fn with_sample_data() -> Self {
        Self::with_store(Arc::new(MemoryStore::with_sample_data())).await
    }

    /// Client over a caller-provided in-memory store
    pub async fn with_store(store: Arc<MemoryStore>) -> Self {
        Self::new(Arc::new(Dashboard::in_memory(store).await))
    }

    /// Get a reference to the underlying dashboard
    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }
}

#[async_trait]
impl DashboardClient for EmbeddedClient {
    async fn top_keywords(&self, range: YearRange) -> SdkResult<TableView> {
        Ok(self.dashboard.top_keywords(range).await)
    }

    async fn top_universities(&self, keyword: &str, range: YearRange) -> SdkResult<TableView> {
        Ok(self.dashboard.top_universities(keyword, range).await)
    }

    async fn university_keyword_scores(&self, university: &str) -> SdkResult<PieChart> {
        Ok(self.dashboard.university_keyword_scores(university).await)
    }

    async fn faculty_keyword_scores(&self, faculty: &str, range: YearRange) -> SdkResult<TableView> {
        Ok(self.dashboard.faculty_keyword_scores(faculty, range).await)
    }

    async fn options(&self) -> SdkResult<DashboardOptions> {
        Ok(self.dashboard.options().await)
    }

    async fn favorites(&self) -> SdkResult<FavoritesSnapshot> {
        Ok(self.dashboard.favorites().await)
    }

    async fn add_favorite(&self, keyword: &str) -> SdkResult<Transition> {
        Ok(self
            .dashboard
            .apply(FavoritesEvent::Add(keyword.to_string()))
            .await?)
    }

    async fn remove_favorite(&self, keyword: &str) -> SdkResult<Transition> {
        Ok(self
            .dashboard
            .apply(FavoritesEvent::Remove(keyword.to_string()))
            .await?)
    }

    async fn edit_favorites(&self, keywords: Vec<String>) -> SdkResult<Transition> {
        Ok(self
            .dashboard
            .apply(FavoritesEvent::TableEdited(keywords))
            .await?)
    }

    async fn status(&self) -> SdkResult<ServerStatus> {
        Ok(ServerStatus {
            status: "healthy".to_string(),
            version: academicworld::VERSION.to_string(),
        })
    }
}
