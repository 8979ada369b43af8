//! The dashboard: widget queries and the favorites panel
//!
//! Each widget maps its inputs to one adapter call and reshapes the rows
//! into a display record. Favorites events are serialized through a single
//! controller so one event is fully processed before the next starts.

pub mod views;

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{Backend, DashboardConfig};
use crate::favorites::{FavoritesController, FavoritesEvent, FavoritesResult, FavoritesSnapshot, Transition};
use crate::store::{
    AcademicGraph, MemoryStore, MongoPublicationStore, MySqlStore, Neo4jAcademicGraph,
    PublicationStore, QueryOutcome, RelationalStore, StoreResult, YearRange,
};
pub use views::{DashboardOptions, PieChart, TableView, PIE_COLORS};

/// The dashboard over one document store, one graph store and one relational store
pub struct Dashboard {
    publications: Arc<dyn PublicationStore>,
    graph: Arc<dyn AcademicGraph>,
    relational: Arc<dyn RelationalStore>,
    favorites: Mutex<FavoritesController>,
}

impl Dashboard {
    /// Build a dashboard and seed the favorites panel from the relational store
    pub async fn new(
        publications: Arc<dyn PublicationStore>,
        graph: Arc<dyn AcademicGraph>,
        relational: Arc<dyn RelationalStore>,
    ) -> Self {
        let controller = FavoritesController::load(Arc::clone(&relational)).await;
        Self {
            publications,
            graph,
            relational,
            favorites: Mutex::new(controller),
        }
    }

    /// Dashboard whose three stores are all backed by one [`MemoryStore`]
    pub async fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), store).await
    }

    /// Dashboard for the configured backend
    pub async fn from_config(config: &DashboardConfig) -> StoreResult<Self> {
        match config.backend {
            Backend::Memory => {
                info!("Using in-memory sample stores");
                Ok(Self::in_memory(Arc::new(MemoryStore::with_sample_data())).await)
            }
            Backend::Live => {
                info!(
                    "Using live stores (mongo {}, neo4j {})",
                    config.mongo.uri, config.neo4j.uri
                );
                let publications = MongoPublicationStore::connect(&config.mongo).await?;
                let graph = Neo4jAcademicGraph::new(config.neo4j.clone());
                let relational = MySqlStore::connect_lazy(&config.mysql)?;
                Ok(Self::new(Arc::new(publications), Arc::new(graph), Arc::new(relational)).await)
            }
        }
    }

    /// Top keywords by publication count in `range`
    pub async fn top_keywords(&self, range: YearRange) -> TableView {
        let outcome = if range.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::from_result("top keywords", self.publications.top_keywords(range).await)
        };
        TableView::from_outcome(&["Keyword", "Publication Count"], outcome, |row| {
            vec![json!(row.keyword), json!(row.publication_count)]
        })
    }

    /// Top universities by publications labelled `keyword` in `range`
    pub async fn top_universities(&self, keyword: &str, range: YearRange) -> TableView {
        let keyword = keyword.trim();
        let outcome = if keyword.is_empty() || range.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::from_result(
                "top universities for keyword",
                self.graph.top_universities_for_keyword(keyword, range).await,
            )
        };
        TableView::from_outcome(&["University", "Publication Count"], outcome, |row| {
            vec![json!(row.university), json!(row.count)]
        })
    }

    /// Pie chart of a university's top keyword interest scores
    pub async fn university_keyword_scores(&self, university: &str) -> PieChart {
        let outcome = if university.trim().is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::from_result(
                "keyword scores for university",
                self.graph.keyword_scores_for_university(university).await,
            )
        };
        let degraded = outcome.is_degraded();
        let rows = outcome.into_rows();
        PieChart {
            title: format!("Top 10 keyword scores for {}", university),
            labels: rows.iter().map(|r| r.keyword.clone()).collect(),
            values: rows.iter().map(|r| r.total_score).collect(),
            colors: PIE_COLORS.iter().take(rows.len()).map(|c| c.to_string()).collect(),
            degraded,
        }
    }

    /// Citation-weighted keyword scores of one faculty member in `range`
    pub async fn faculty_keyword_scores(&self, faculty: &str, range: YearRange) -> TableView {
        let outcome = if faculty.trim().is_empty() || range.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::from_result(
                "keyword scores for faculty",
                self.graph.keyword_scores_for_faculty(faculty, range).await,
            )
        };
        TableView::from_outcome(&["Keyword", "Total Score"], outcome, |row| {
            vec![json!(row.keyword), json!(row.total_score)]
        })
    }

    /// Dropdown choices for keywords, universities and faculty.
    ///
    /// Keywords fall back to the relational keyword table when the graph
    /// store cannot enumerate them.
    pub async fn options(&self) -> DashboardOptions {
        let (keywords, universities, faculty) = tokio::join!(
            self.graph.all_keywords(),
            self.graph.all_universities(),
            self.graph.all_faculty(),
        );
        let keywords = QueryOutcome::from_result("all keywords", keywords);
        let graph_keywords_failed = keywords.is_degraded();
        let keywords = if graph_keywords_failed {
            QueryOutcome::from_result("keyword catalog", self.relational.keyword_catalog().await)
        } else {
            keywords
        };
        let universities = QueryOutcome::from_result("all universities", universities);
        let faculty = QueryOutcome::from_result("all faculty", faculty);
        DashboardOptions {
            degraded: graph_keywords_failed
                || keywords.is_degraded()
                || universities.is_degraded()
                || faculty.is_degraded(),
            keywords: keywords.into_rows(),
            universities: universities.into_rows(),
            faculty: faculty.into_rows(),
        }
    }

    /// Current favorites panel
    pub async fn favorites(&self) -> FavoritesSnapshot {
        self.favorites.lock().await.snapshot()
    }

    /// Apply a favorites event; events are processed one at a time
    pub async fn apply(&self, event: FavoritesEvent) -> FavoritesResult<Transition> {
        let mut controller = self.favorites.lock().await;
        controller.apply(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreOp;

    #[tokio::test]
    async fn test_pie_chart_colors_match_slices() {
        let dashboard = Dashboard::in_memory(Arc::new(MemoryStore::with_sample_data())).await;
        let pie = dashboard
            .university_keyword_scores("University of Illinois at Urbana-Champaign")
            .await;
        assert_eq!(pie.labels.len(), pie.values.len());
        assert_eq!(pie.colors.len(), pie.labels.len());
        assert_eq!(pie.labels[0], "machine learning");
        assert_eq!(
            pie.title,
            "Top 10 keyword scores for University of Illinois at Urbana-Champaign"
        );
    }

    #[tokio::test]
    async fn test_blank_inputs_skip_queries() {
        let store = Arc::new(MemoryStore::with_sample_data());
        store.set_failing(StoreOp::GraphQueries, true);
        let dashboard = Dashboard::in_memory(store).await;

        let table = dashboard.top_universities("  ", YearRange::full()).await;
        assert!(table.is_empty());
        assert!(!table.degraded);
    }

    #[tokio::test]
    async fn test_options_degrade_when_graph_down() {
        let store = Arc::new(MemoryStore::with_sample_data());
        let dashboard = Dashboard::in_memory(store.clone()).await;
        assert_eq!(dashboard.options().await.universities.len(), 4);

        store.set_failing(StoreOp::GraphQueries, true);
        let options = dashboard.options().await;
        assert!(options.degraded);
        assert!(options.universities.is_empty());
        assert_eq!(options.keywords.len(), 6);

        store.set_failing(StoreOp::KeywordCatalog, true);
        let options = dashboard.options().await;
        assert!(options.keywords.is_empty());
    }
}
