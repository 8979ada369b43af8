//! Query adapters for the three AcademicWorld backing stores
//!
//! - [`PublicationStore`]: document store (MongoDB aggregation pipeline)
//! - [`AcademicGraph`]: graph store (Neo4j pattern matching)
//! - [`FavoritesStore`] + [`RecommendationSource`]: relational store (MySQL)
//!
//! Every adapter has a live implementation and an in-process
//! [`MemoryStore`] with the same aggregation semantics.

pub mod document;
pub mod graph;
pub mod memory;
pub mod models;
pub mod relational;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub use document::MongoPublicationStore;
pub use graph::Neo4jAcademicGraph;
pub use memory::{AcademicDataset, FacultyRecord, MemoryStore, PublicationRecord, StoreOp};
pub use models::{
    KeywordCount, KeywordScore, RecommendationEntry, UniversityCount, YearRange, TOP_N,
};
pub use relational::{HardeningStep, MySqlStore};

/// Store adapter errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing store unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed or rejected query
    #[error("Query error: {0}")]
    Query(String),

    /// A returned row did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid adapter configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only queries against the publications collection
#[async_trait]
pub trait PublicationStore: Send + Sync {
    /// Top keywords by number of publications within `range`
    async fn top_keywords(&self, range: YearRange) -> StoreResult<Vec<KeywordCount>>;
}

/// Read-only queries against the institute/faculty/keyword graph
#[async_trait]
pub trait AcademicGraph: Send + Sync {
    /// Universities with the most distinct publications labelled `keyword` in `range`
    async fn top_universities_for_keyword(
        &self,
        keyword: &str,
        range: YearRange,
    ) -> StoreResult<Vec<UniversityCount>>;

    /// Keyword interest scores summed over a university's faculty
    async fn keyword_scores_for_university(
        &self,
        university: &str,
    ) -> StoreResult<Vec<KeywordScore>>;

    /// Citation-weighted keyword scores of a faculty member's publications in `range`
    async fn keyword_scores_for_faculty(
        &self,
        faculty: &str,
        range: YearRange,
    ) -> StoreResult<Vec<KeywordScore>>;

    /// All keyword names, alphabetical
    async fn all_keywords(&self) -> StoreResult<Vec<String>>;

    /// All university names, alphabetical
    async fn all_universities(&self) -> StoreResult<Vec<String>>;

    /// All faculty names, alphabetical
    async fn all_faculty(&self) -> StoreResult<Vec<String>>;
}

/// CRUD over the persisted favorite keywords
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Current favorites in store default order
    async fn list_favorites(&self) -> StoreResult<Vec<String>>;

    /// Insert a favorite; inserting an existing name is not an error
    async fn add_favorite(&self, name: &str) -> StoreResult<()>;

    /// Delete a favorite by exact name; deleting an absent name is not an error
    async fn remove_favorite(&self, name: &str) -> StoreResult<()>;

    /// Every keyword name in the relational `keyword` table, alphabetical
    async fn keyword_catalog(&self) -> StoreResult<Vec<String>>;
}

/// Rankings derived from the persisted favorite keywords
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Top faculty by summed interest score over the favorite keywords
    async fn top_faculty_for_favorites(&self) -> StoreResult<Vec<RecommendationEntry>>;

    /// Top universities by summed interest score of their faculty over the favorite keywords
    async fn top_universities_for_favorites(&self) -> StoreResult<Vec<RecommendationEntry>>;
}

/// The relational store: favorites plus the recommendations derived from them
pub trait RelationalStore: FavoritesStore + RecommendationSource {}

impl<T: FavoritesStore + RecommendationSource> RelationalStore for T {}

/// Typed outcome of a read query as seen by the display layer.
///
/// `Empty` and `Failed` both render as an empty table; only `Failed`
/// marks the view as degraded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum QueryOutcome<T> {
    Rows(Vec<T>),
    Empty,
    Failed(String),
}

impl<T> QueryOutcome<T> {
    /// Classify an adapter result, logging failures under `context`
    pub fn from_result(context: &str, result: StoreResult<Vec<T>>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => QueryOutcome::Empty,
            Ok(rows) => QueryOutcome::Rows(rows),
            Err(e) => {
                warn!("{} failed: {}", context, e);
                QueryOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }

    pub fn rows(&self) -> &[T] {
        match self {
            QueryOutcome::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn into_rows(self) -> Vec<T> {
        match self {
            QueryOutcome::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        let rows: QueryOutcome<i32> = QueryOutcome::from_result("rows", Ok(vec![1, 2]));
        assert_eq!(rows.rows(), &[1, 2]);
        assert!(!rows.is_degraded());

        let empty: QueryOutcome<i32> = QueryOutcome::from_result("empty", Ok(vec![]));
        assert_eq!(empty, QueryOutcome::Empty);

        let failed: QueryOutcome<i32> = QueryOutcome::from_result(
            "failed",
            Err(StoreError::Connection("refused".to_string())),
        );
        assert!(failed.is_degraded());
        assert!(failed.into_rows().is_empty());
    }
}
