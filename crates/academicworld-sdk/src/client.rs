//! DashboardClient trait: the unified interface for embedded and remote modes

use async_trait::async_trait;

use crate::error::SdkResult;
use crate::models::{DashboardOptions, FavoritesSnapshot, PieChart, ServerStatus, TableView, Transition, YearRange};

/// Unified client interface for the AcademicWorld dashboard.
///
/// Implemented by:
/// - `EmbeddedClient`: in-process, no network (for tests and scripting)
/// - `RemoteClient`: connects to a running dashboard server via HTTP
#[async_trait]
pub trait DashboardClient: Send + Sync {
    /// Top 10 keywords by publication count in `range`
    async fn top_keywords(&self, range: YearRange) -> SdkResult<TableView>;

    /// Top 10 universities by publications labelled `keyword` in `range`
    async fn top_universities(&self, keyword: &str, range: YearRange) -> SdkResult<TableView>;

    /// Keyword-score pie chart for one university
    async fn university_keyword_scores(&self, university: &str) -> SdkResult<PieChart>;

    /// Citation-weighted keyword scores of one faculty member in `range`
    async fn faculty_keyword_scores(&self, faculty: &str, range: YearRange) -> SdkResult<TableView>;

    /// Dropdown choices
    async fn options(&self) -> SdkResult<DashboardOptions>;

    /// Current favorites panel
    async fn favorites(&self) -> SdkResult<FavoritesSnapshot>;

    /// Add a keyword to favorites
    async fn add_favorite(&self, keyword: &str) -> SdkResult<Transition>;

    /// Remove a keyword from favorites
    async fn remove_favorite(&self, keyword: &str) -> SdkResult<Transition>;

    /// Report the favorites table as currently displayed
    async fn edit_favorites(&self, keywords: Vec<String>) -> SdkResult<Transition>;

    /// Get server status
    async fn status(&self) -> SdkResult<ServerStatus>;
}
