//! Recommendation recompute
//!
//! Both lists are always recomputed in full from the persisted favorites.
//! Callers must only invoke this after a favorites write has returned.

use serde::{Deserialize, Serialize};

use crate::store::{QueryOutcome, RecommendationEntry, RecommendationSource};

/// Fresh top-faculty and top-university rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub top_faculty: QueryOutcome<RecommendationEntry>,
    pub top_universities: QueryOutcome<RecommendationEntry>,
}

impl Recommendations {
    pub fn is_degraded(&self) -> bool {
        self.top_faculty.is_degraded() || self.top_universities.is_degraded()
    }
}

/// Run both recommendation queries against the current favorites set
pub async fn recompute<S>(source: &S) -> Recommendations
where
    S: RecommendationSource + ?Sized,
{
    let (faculty, universities) = tokio::join!(
        source.top_faculty_for_favorites(),
        source.top_universities_for_favorites(),
    );
    Recommendations {
        top_faculty: QueryOutcome::from_result("top faculty for favorites", faculty),
        top_universities: QueryOutcome::from_result("top universities for favorites", universities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FavoritesStore, MemoryStore, StoreOp};

    #[tokio::test]
    async fn test_empty_favorites_give_empty_lists() {
        let store = MemoryStore::with_sample_data();
        let recs = recompute(&store).await;
        assert_eq!(recs.top_faculty, QueryOutcome::Empty);
        assert_eq!(recs.top_universities, QueryOutcome::Empty);
        assert!(!recs.is_degraded());
    }

    #[tokio::test]
    async fn test_reflects_committed_favorites() {
        let store = MemoryStore::with_sample_data();
        store.add_favorite("computer vision").await.unwrap();
        let recs = recompute(&store).await;
        assert_eq!(recs.top_faculty.rows()[0].name, "Carol Okafor");
        assert_eq!(
            recs.top_universities.rows()[0].name,
            "Massachusetts Institute of Technology"
        );
    }

    #[tokio::test]
    async fn test_failure_is_degraded() {
        let store = MemoryStore::with_sample_data().with_favorites(["databases"]);
        store.set_failing(StoreOp::Recommendations, true);
        let recs = recompute(&store).await;
        assert!(recs.is_degraded());
        assert!(recs.top_faculty.rows().is_empty());
    }
}
