//! In-process implementation of every store adapter
//!
//! Mirrors the aggregation semantics of the live queries over plain
//! collections. Used by the `memory` backend and by tests; individual
//! operations can be switched to fail to exercise degraded paths.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    AcademicGraph, FavoritesStore, KeywordCount, KeywordScore, PublicationStore,
    RecommendationEntry, RecommendationSource, StoreError, StoreResult, UniversityCount,
    YearRange, TOP_N,
};

/// A faculty member with affiliation and weighted research interests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub name: String,
    pub university: String,
    /// `(keyword, score)` pairs, the INTERESTED_IN / faculty_keyword rows
    pub interests: Vec<(String, f64)>,
}

/// A publication with its authors and weighted keyword labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub id: u64,
    pub title: String,
    pub year: i32,
    pub num_citations: i64,
    pub authors: Vec<String>,
    /// `(keyword, score)` pairs, the LABEL_BY rows
    pub keywords: Vec<(String, f64)>,
}

/// The data behind all three stores, in one place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcademicDataset {
    pub universities: Vec<String>,
    pub faculty: Vec<FacultyRecord>,
    pub publications: Vec<PublicationRecord>,
}

impl AcademicDataset {
    /// Small dataset spanning the full year range, used by the `memory` backend
    pub fn sample() -> Self {
        fn faculty(name: &str, university: &str, interests: &[(&str, f64)]) -> FacultyRecord {
            FacultyRecord {
                name: name.to_string(),
                university: university.to_string(),
                interests: interests.iter().map(|(k, s)| (k.to_string(), *s)).collect(),
            }
        }

        fn publication(
            id: u64,
            title: &str,
            year: i32,
            num_citations: i64,
            authors: &[&str],
            keywords: &[(&str, f64)],
        ) -> PublicationRecord {
            PublicationRecord {
                id,
                title: title.to_string(),
                year,
                num_citations,
                authors: authors.iter().map(|a| a.to_string()).collect(),
                keywords: keywords.iter().map(|(k, s)| (k.to_string(), *s)).collect(),
            }
        }

        const CMU: &str = "Carnegie Mellon University";
        const MIT: &str = "Massachusetts Institute of Technology";
        const STANFORD: &str = "Stanford University";
        const UIUC: &str = "University of Illinois at Urbana-Champaign";

        Self {
            universities: vec![CMU, MIT, STANFORD, UIUC]
                .into_iter()
                .map(String::from)
                .collect(),
            faculty: vec![
                faculty("Alice Chen", UIUC, &[("machine learning", 0.9), ("databases", 0.4)]),
                faculty("Bob Martinez", CMU, &[("databases", 0.8), ("query optimization", 0.7)]),
                faculty("Carol Okafor", MIT, &[("machine learning", 0.6), ("computer vision", 0.9)]),
                faculty(
                    "David Kim",
                    STANFORD,
                    &[("natural language processing", 0.95), ("machine learning", 0.5)],
                ),
                faculty("Eva Novak", UIUC, &[("distributed systems", 0.7), ("databases", 0.3)]),
            ],
            publications: vec![
                publication(
                    1,
                    "Learning to Index",
                    1982,
                    10,
                    &["Alice Chen", "Bob Martinez"],
                    &[("machine learning", 0.5), ("databases", 0.6)],
                ),
                publication(
                    2,
                    "Cost Models for Joins",
                    1990,
                    40,
                    &["Bob Martinez"],
                    &[("databases", 0.9), ("query optimization", 0.8)],
                ),
                publication(
                    3,
                    "Deep Features for Scenes",
                    2015,
                    120,
                    &["Carol Okafor"],
                    &[("computer vision", 0.9), ("machine learning", 0.6)],
                ),
                publication(
                    4,
                    "Parsing with Transformers",
                    2023,
                    15,
                    &["David Kim"],
                    &[("natural language processing", 0.9), ("machine learning", 0.4)],
                ),
                publication(
                    5,
                    "Consensus at Scale",
                    2010,
                    30,
                    &["Eva Novak"],
                    &[("distributed systems", 0.8)],
                ),
                publication(
                    6,
                    "Learned Cardinality Estimation",
                    2023,
                    5,
                    &["Alice Chen", "Bob Martinez"],
                    &[("machine learning", 0.7), ("databases", 0.7), ("query optimization", 0.5)],
                ),
            ],
        }
    }

    fn keyword_names(&self) -> BTreeSet<String> {
        self.faculty
            .iter()
            .flat_map(|f| f.interests.iter().map(|(k, _)| k.clone()))
            .chain(
                self.publications
                    .iter()
                    .flat_map(|p| p.keywords.iter().map(|(k, _)| k.clone())),
            )
            .collect()
    }
}

/// Operations that can be switched to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    TopKeywords,
    GraphQueries,
    ListFavorites,
    WriteFavorites,
    KeywordCatalog,
    Recommendations,
}

/// In-memory stand-in for the document, graph and relational stores
pub struct MemoryStore {
    dataset: AcademicDataset,
    favorites: RwLock<Vec<String>>,
    failing: RwLock<HashSet<StoreOp>>,
    recommendation_queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new(dataset: AcademicDataset) -> Self {
        Self {
            dataset,
            favorites: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
            recommendation_queries: AtomicUsize::new(0),
        }
    }

    pub fn with_sample_data() -> Self {
        Self::new(AcademicDataset::sample())
    }

    /// Seed the favorites table directly
    pub fn with_favorites<I, S>(self, favorites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut guard) = self.favorites.write() {
            guard.extend(favorites.into_iter().map(Into::into));
        }
        self
    }

    pub fn dataset(&self) -> &AcademicDataset {
        &self.dataset
    }

    /// Make `op` fail with a connection error until switched back
    pub fn set_failing(&self, op: StoreOp, failing: bool) {
        if let Ok(mut guard) = self.failing.write() {
            if failing {
                guard.insert(op);
            } else {
                guard.remove(&op);
            }
        }
    }

    /// Number of recommendation queries served so far
    pub fn recommendation_queries(&self) -> usize {
        self.recommendation_queries.load(AtomicOrdering::SeqCst)
    }

    fn check(&self, op: StoreOp) -> StoreResult<()> {
        let failing = self
            .failing
            .read()
            .map(|guard| guard.contains(&op))
            .unwrap_or(false);
        if failing {
            Err(StoreError::Connection(format!("{:?} unavailable", op)))
        } else {
            Ok(())
        }
    }

    fn favorite_set(&self) -> StoreResult<HashSet<String>> {
        self.favorites
            .read()
            .map(|guard| guard.iter().cloned().collect())
            .map_err(|_| StoreError::Query("favorites lock poisoned".to_string()))
    }

    fn faculty_named(&self, name: &str) -> Option<&FacultyRecord> {
        self.dataset.faculty.iter().find(|f| f.name == name)
    }

    fn university_of(&self, author: &str) -> Option<&str> {
        self.faculty_named(author).map(|f| f.university.as_str())
    }

    fn recommend<F>(&self, group_of: F) -> StoreResult<Vec<RecommendationEntry>>
    where
        F: Fn(&FacultyRecord) -> String,
    {
        self.recommendation_queries.fetch_add(1, AtomicOrdering::SeqCst);
        self.check(StoreOp::Recommendations)?;
        let favorites = self.favorite_set()?;

        let mut groups: HashMap<String, (i64, f64)> = HashMap::new();
        for faculty in &self.dataset.faculty {
            for (keyword, score) in &faculty.interests {
                if favorites.contains(keyword) {
                    let entry = groups.entry(group_of(faculty)).or_insert((0, 0.0));
                    entry.0 += 1;
                    entry.1 += score;
                }
            }
        }

        let mut entries: Vec<RecommendationEntry> = groups
            .into_iter()
            .map(|(name, (keyword_count, score))| RecommendationEntry {
                name,
                keyword_count,
                score,
            })
            .collect();
        entries.sort_by(|a, b| by_score_desc(a.score, b.score).then_with(|| a.name.cmp(&b.name)));
        entries.truncate(TOP_N);
        Ok(entries)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_sample_data()
    }
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn ranked_scores(scores: HashMap<String, f64>) -> Vec<KeywordScore> {
    let mut rows: Vec<KeywordScore> = scores
        .into_iter()
        .map(|(keyword, total_score)| KeywordScore { keyword, total_score })
        .collect();
    rows.sort_by(|a, b| {
        by_score_desc(a.total_score, b.total_score).then_with(|| a.keyword.cmp(&b.keyword))
    });
    rows.truncate(TOP_N);
    rows
}

#[async_trait]
impl PublicationStore for MemoryStore {
    async fn top_keywords(&self, range: YearRange) -> StoreResult<Vec<KeywordCount>> {
        self.check(StoreOp::TopKeywords)?;

        let mut counts: HashMap<&str, i64> = HashMap::new();
        for publication in self.dataset.publications.iter().filter(|p| range.contains(p.year)) {
            for (keyword, _) in &publication.keywords {
                *counts.entry(keyword.as_str()).or_insert(0) += 1;
            }
        }

        let mut rows: Vec<KeywordCount> = counts
            .into_iter()
            .map(|(keyword, publication_count)| KeywordCount {
                keyword: keyword.to_string(),
                publication_count,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.publication_count
                .cmp(&a.publication_count)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        rows.truncate(TOP_N);
        Ok(rows)
    }
}

#[async_trait]
impl AcademicGraph for MemoryStore {
    async fn top_universities_for_keyword(
        &self,
        keyword: &str,
        range: YearRange,
    ) -> StoreResult<Vec<UniversityCount>> {
        self.check(StoreOp::GraphQueries)?;

        let mut publications: HashMap<&str, HashSet<u64>> = HashMap::new();
        for publication in &self.dataset.publications {
            if !range.contains(publication.year)
                || !publication.keywords.iter().any(|(k, _)| k == keyword)
            {
                continue;
            }
            for author in &publication.authors {
                if let Some(university) = self.university_of(author) {
                    publications.entry(university).or_default().insert(publication.id);
                }
            }
        }

        let mut rows: Vec<UniversityCount> = publications
            .into_iter()
            .map(|(university, ids)| UniversityCount {
                university: university.to_string(),
                count: ids.len() as i64,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.university.cmp(&b.university)));
        rows.truncate(TOP_N);
        Ok(rows)
    }

    async fn keyword_scores_for_university(
        &self,
        university: &str,
    ) -> StoreResult<Vec<KeywordScore>> {
        self.check(StoreOp::GraphQueries)?;

        let mut scores: HashMap<String, f64> = HashMap::new();
        for faculty in self.dataset.faculty.iter().filter(|f| f.university == university) {
            for (keyword, score) in &faculty.interests {
                *scores.entry(keyword.clone()).or_insert(0.0) += score;
            }
        }
        Ok(ranked_scores(scores))
    }

    async fn keyword_scores_for_faculty(
        &self,
        faculty: &str,
        range: YearRange,
    ) -> StoreResult<Vec<KeywordScore>> {
        self.check(StoreOp::GraphQueries)?;

        let Some(record) = self.faculty_named(faculty) else {
            return Ok(Vec::new());
        };

        let mut scores: HashMap<String, f64> = HashMap::new();
        for (interest, _) in &record.interests {
            for publication in self
                .dataset
                .publications
                .iter()
                .filter(|p| range.contains(p.year) && p.authors.iter().any(|a| a == faculty))
            {
                for (label, score) in publication.keywords.iter().filter(|(k, _)| k == interest) {
                    *scores.entry(label.clone()).or_insert(0.0) +=
                        score * publication.num_citations as f64;
                }
            }
        }
        Ok(ranked_scores(scores))
    }

    async fn all_keywords(&self) -> StoreResult<Vec<String>> {
        self.check(StoreOp::GraphQueries)?;
        Ok(self.dataset.keyword_names().into_iter().collect())
    }

    async fn all_universities(&self) -> StoreResult<Vec<String>> {
        self.check(StoreOp::GraphQueries)?;
        let names: BTreeSet<String> = self.dataset.universities.iter().cloned().collect();
        Ok(names.into_iter().collect())
    }

    async fn all_faculty(&self) -> StoreResult<Vec<String>> {
        self.check(StoreOp::GraphQueries)?;
        let names: BTreeSet<String> = self.dataset.faculty.iter().map(|f| f.name.clone()).collect();
        Ok(names.into_iter().collect())
    }
}

#[async_trait]
impl FavoritesStore for MemoryStore {
    async fn list_favorites(&self) -> StoreResult<Vec<String>> {
        self.check(StoreOp::ListFavorites)?;
        self.favorites
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| StoreError::Query("favorites lock poisoned".to_string()))
    }

    async fn add_favorite(&self, name: &str) -> StoreResult<()> {
        self.check(StoreOp::WriteFavorites)?;
        let mut guard = self
            .favorites
            .write()
            .map_err(|_| StoreError::Query("favorites lock poisoned".to_string()))?;
        if !guard.iter().any(|existing| existing == name) {
            guard.push(name.to_string());
        }
        Ok(())
    }

    async fn remove_favorite(&self, name: &str) -> StoreResult<()> {
        self.check(StoreOp::WriteFavorites)?;
        let mut guard = self
            .favorites
            .write()
            .map_err(|_| StoreError::Query("favorites lock poisoned".to_string()))?;
        guard.retain(|existing| existing != name);
        Ok(())
    }

    async fn keyword_catalog(&self) -> StoreResult<Vec<String>> {
        self.check(StoreOp::KeywordCatalog)?;
        Ok(self.dataset.keyword_names().into_iter().collect())
    }
}

#[async_trait]
impl RecommendationSource for MemoryStore {
    async fn top_faculty_for_favorites(&self) -> StoreResult<Vec<RecommendationEntry>> {
        self.recommend(|faculty| faculty.name.clone())
    }

    async fn top_universities_for_favorites(&self) -> StoreResult<Vec<RecommendationEntry>> {
        self.recommend(|faculty| faculty.university.clone())
    }
}
