//! Graph-store adapter over the institute/faculty/publication/keyword graph

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query, Row};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{
    AcademicGraph, KeywordScore, StoreError, StoreResult, UniversityCount, YearRange, TOP_N,
};
use crate::config::Neo4jConfig;

const TOP_UNIVERSITIES_FOR_KEYWORD: &str = "
    MATCH (i:INSTITUTE)<-[:AFFILIATION_WITH]-(f:FACULTY)-[:PUBLISH]->(p:PUBLICATION)-[:LABEL_BY]->(k:KEYWORD)
    WHERE p.year >= $start AND p.year <= $end AND k.name = $keyword
    RETURN i.name AS university, COUNT(DISTINCT p) AS count
    ORDER BY count DESC
    LIMIT $limit";

const KEYWORD_SCORES_FOR_UNIVERSITY: &str = "
    MATCH (i:INSTITUTE)<-[:AFFILIATION_WITH]-(f:FACULTY)-[r:INTERESTED_IN]->(k:KEYWORD)
    WHERE i.name = $university
    RETURN k.name AS keyword, toFloat(SUM(r.score)) AS total_score
    ORDER BY total_score DESC
    LIMIT $limit";

const KEYWORD_SCORES_FOR_FACULTY: &str = "
    MATCH (k1:KEYWORD)<-[:INTERESTED_IN]-(f:FACULTY)-[:PUBLISH]->(p:PUBLICATION)-[l:LABEL_BY]->(k2:KEYWORD)
    WHERE f.name = $faculty AND p.year >= $start AND p.year <= $end AND k2.name = k1.name
    RETURN k2.name AS keyword, toFloat(SUM(l.score * p.numCitations)) AS total_score
    ORDER BY total_score DESC
    LIMIT $limit";

const ALL_KEYWORDS: &str = "MATCH (n:KEYWORD) RETURN n.name AS name ORDER BY name";
const ALL_UNIVERSITIES: &str = "MATCH (n:INSTITUTE) RETURN n.name AS name ORDER BY name";
const ALL_FACULTY: &str = "MATCH (n:FACULTY) RETURN n.name AS name ORDER BY name";

/// Pattern-match queries against Neo4j.
///
/// The driver handle is opened on first use and kept for the lifetime of the
/// adapter; a failed connection attempt is retried on the next call.
pub struct Neo4jAcademicGraph {
    config: Neo4jConfig,
    graph: OnceCell<Graph>,
}

impl Neo4jAcademicGraph {
    pub fn new(config: Neo4jConfig) -> Self {
        Self {
            config,
            graph: OnceCell::new(),
        }
    }

    async fn graph(&self) -> StoreResult<&Graph> {
        self.graph
            .get_or_try_init(|| async {
                let password = self.config.password.clone().unwrap_or_default();
                let config = ConfigBuilder::default()
                    .uri(self.config.uri.as_str())
                    .user(self.config.user.as_str())
                    .password(password.as_str())
                    .db(self.config.database.as_str())
                    .build()
                    .map_err(|e| StoreError::Config(e.to_string()))?;
                let graph = Graph::connect(config)
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
                info!("Connected to Neo4j at {}", self.config.uri);
                Ok::<Graph, StoreError>(graph)
            })
            .await
    }

    async fn fetch<T, F>(&self, q: Query, decode: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&Row) -> StoreResult<T>,
    {
        let graph = self.graph().await?;
        let mut stream = graph
            .execute(q)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
        {
            rows.push(decode(&row)?);
        }
        Ok(rows)
    }

    async fn names(&self, cypher: &str) -> StoreResult<Vec<String>> {
        self.fetch(query(cypher), |row| column(row, "name")).await
    }
}

fn column<T>(row: &Row, key: &str) -> StoreResult<T>
where
    T: serde::de::DeserializeOwned,
{
    row.get::<T>(key)
        .map_err(|e| StoreError::Decode(format!("column {}: {}", key, e)))
}

fn decode_keyword_score(row: &Row) -> StoreResult<KeywordScore> {
    Ok(KeywordScore {
        keyword: column(row, "keyword")?,
        total_score: column(row, "total_score")?,
    })
}

#[async_trait]
impl AcademicGraph for Neo4jAcademicGraph {
    async fn top_universities_for_keyword(
        &self,
        keyword: &str,
        range: YearRange,
    ) -> StoreResult<Vec<UniversityCount>> {
        debug!(
            "neo4j: top universities for {:?} in {}..={}",
            keyword, range.start, range.end
        );
        let q = query(TOP_UNIVERSITIES_FOR_KEYWORD)
            .param("keyword", keyword)
            .param("start", range.start as i64)
            .param("end", range.end as i64)
            .param("limit", TOP_N as i64);
        self.fetch(q, |row| {
            Ok(UniversityCount {
                university: column(row, "university")?,
                count: column(row, "count")?,
            })
        })
        .await
    }

    async fn keyword_scores_for_university(
        &self,
        university: &str,
    ) -> StoreResult<Vec<KeywordScore>> {
        debug!("neo4j: keyword scores for university {:?}", university);
        let q = query(KEYWORD_SCORES_FOR_UNIVERSITY)
            .param("university", university)
            .param("limit", TOP_N as i64);
        self.fetch(q, decode_keyword_score).await
    }

    async fn keyword_scores_for_faculty(
        &self,
        faculty: &str,
        range: YearRange,
    ) -> StoreResult<Vec<KeywordScore>> {
        debug!(
            "neo4j: keyword scores for faculty {:?} in {}..={}",
            faculty, range.start, range.end
        );
        let q = query(KEYWORD_SCORES_FOR_FACULTY)
            .param("faculty", faculty)
            .param("start", range.start as i64)
            .param("end", range.end as i64)
            .param("limit", TOP_N as i64);
        self.fetch(q, decode_keyword_score).await
    }

    async fn all_keywords(&self) -> StoreResult<Vec<String>> {
        self.names(ALL_KEYWORDS).await
    }

    async fn all_universities(&self) -> StoreResult<Vec<String>> {
        self.names(ALL_UNIVERSITIES).await
    }

    async fn all_faculty(&self) -> StoreResult<Vec<String>> {
        self.names(ALL_FACULTY).await
    }
}
