//! Data models for the AcademicWorld SDK
//!
//! Widget and favorites records are the dashboard's own types, so both
//! clients hand back exactly what the server serializes.

use serde::{Deserialize, Serialize};

pub use academicworld::{
    DashboardOptions, FavoritesSnapshot, NoOpReason, PieChart, RecommendationEntry, TableView,
    Transition, TransitionKind, YearRange,
};

/// Server status information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Server version
    pub version: String,
}

impl ServerStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
