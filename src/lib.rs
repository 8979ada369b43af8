//! AcademicWorld Explorer
//!
//! Explore university and faculty research strengths by keyword, year range
//! and institution, and keep a list of favorite keywords that drives faculty
//! and university recommendations.
//!
//! # Architecture
//!
//! - [`store`]: read-only query adapters over the document store (MongoDB),
//!   the graph store (Neo4j) and the relational store (MySQL), plus an
//!   in-memory implementation of all three
//! - [`favorites`]: the favorites state machine; recommendations are always
//!   recomputed in full after the favorites write commits
//! - [`dashboard`]: widget queries reshaped into tables and a pie chart
//! - [`http`]: JSON API and the embedded dashboard page
//! - [`config`]: YAML + environment configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use academicworld::{Dashboard, FavoritesEvent, MemoryStore, YearRange};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let dashboard = Dashboard::in_memory(Arc::new(MemoryStore::with_sample_data())).await;
//!
//! let keywords = dashboard.top_keywords(YearRange::new(1982, 1982)).await;
//! assert_eq!(keywords.len(), 2);
//!
//! let transition = dashboard
//!     .apply(FavoritesEvent::Add("machine learning".to_string()))
//!     .await
//!     .unwrap();
//! assert_eq!(transition.snapshot.favorites, vec!["machine learning"]);
//! assert_eq!(transition.snapshot.top_faculty[0].name, "Alice Chen");
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dashboard;
pub mod favorites;
pub mod http;
pub mod store;

// Re-export main types for convenience
pub use config::{Backend, ConfigError, ConfigResult, DashboardConfig};

pub use dashboard::{Dashboard, DashboardOptions, PieChart, TableView};

pub use favorites::{
    FavoritesController, FavoritesError, FavoritesEvent, FavoritesResult, FavoritesSnapshot,
    NoOpReason, Recommendations, Transition, TransitionKind,
};

pub use http::HttpServer;

pub use store::{
    AcademicGraph, FavoritesStore, KeywordCount, KeywordScore, MemoryStore, MySqlStore,
    PublicationStore, QueryOutcome, RecommendationEntry, RecommendationSource, RelationalStore,
    StoreError, StoreOp, StoreResult, UniversityCount, YearRange,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, env!("CARGO_PKG_VERSION"));
    }
}
