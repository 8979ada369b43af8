//! Row shapes returned by the store adapters
//!
//! These are ephemeral records: they have no identity beyond their position
//! in the current result set and are never mutated, only re-fetched.

use serde::{Deserialize, Serialize};

/// Maximum number of rows any ranked query returns
pub const TOP_N: usize = 10;

/// Inclusive range of publication years.
///
/// A range whose `start` is after its `end` is empty and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Earliest year covered by the AcademicWorld dataset
    pub const MIN_YEAR: i32 = 1982;
    /// Latest year covered by the AcademicWorld dataset
    pub const MAX_YEAR: i32 = 2023;

    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// The full slider range, `1982..=2023`
    pub fn full() -> Self {
        Self::new(Self::MIN_YEAR, Self::MAX_YEAR)
    }

    /// Build a range from optional bounds, falling back to the dataset limits
    pub fn from_bounds(start: Option<i32>, end: Option<i32>) -> Self {
        Self::new(
            start.unwrap_or(Self::MIN_YEAR),
            end.unwrap_or(Self::MAX_YEAR),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Number of publications labelled with a keyword (document store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub publication_count: i64,
}

/// Number of distinct publications attributed to a university (graph store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityCount {
    pub university: String,
    pub count: i64,
}

/// Aggregated keyword score (graph store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub keyword: String,
    pub total_score: f64,
}

/// A faculty member or university ranked against the favorite keywords.
///
/// `keyword_count` is the number of matching (entity, keyword) pairs and
/// `score` the sum of their association weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub name: String,
    pub keyword_count: i64,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_year_range() {
        let range = YearRange::new(1982, 1982);
        assert!(!range.is_empty());
        assert!(range.contains(1982));
        assert!(!range.contains(1983));
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let range = YearRange::new(2023, 1982);
        assert!(range.is_empty());
        assert!(!range.contains(2000));
    }

    #[test]
    fn test_from_bounds_defaults() {
        assert_eq!(YearRange::from_bounds(None, None), YearRange::full());
        assert_eq!(YearRange::from_bounds(Some(2000), None), YearRange::new(2000, 2023));
    }
}
