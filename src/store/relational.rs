//! Relational-store adapter: favorite keywords and the recommendations derived from them

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{
    FavoritesStore, RecommendationEntry, RecommendationSource, StoreError, StoreResult, TOP_N,
};
use crate::config::MySqlConfig;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Connection(e.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => StoreError::Decode(e.to_string()),
            sqlx::Error::Configuration(_) => StoreError::Config(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}

const CREATE_FAVORITES_TABLE: &str = "CREATE TABLE IF NOT EXISTS favorite_keywords (
    name VARCHAR(512) NOT NULL,
    PRIMARY KEY (name)
)";

const ALL_KEYWORDS: &str = "SELECT name FROM keyword ORDER BY name";

const TOP_FACULTY_FOR_FAVORITES: &str = "
    SELECT faculty.name AS name,
           COUNT(*) AS keyword_count,
           CAST(SUM(faculty_keyword.score) AS DOUBLE) AS score
    FROM faculty_keyword
    JOIN faculty ON faculty_keyword.faculty_id = faculty.id
    JOIN keyword ON faculty_keyword.keyword_id = keyword.id
    JOIN favorite_keywords ON keyword.name = favorite_keywords.name
    GROUP BY faculty.name
    ORDER BY score DESC
    LIMIT ?";

const TOP_UNIVERSITIES_FOR_FAVORITES: &str = "
    SELECT university.name AS name,
           COUNT(*) AS keyword_count,
           CAST(SUM(faculty_keyword.score) AS DOUBLE) AS score
    FROM faculty_keyword
    JOIN faculty ON faculty_keyword.faculty_id = faculty.id
    JOIN university ON faculty.university_id = university.id
    JOIN keyword ON faculty_keyword.keyword_id = keyword.id
    JOIN favorite_keywords ON keyword.name = favorite_keywords.name
    GROUP BY university.name
    ORDER BY score DESC
    LIMIT ?";

/// One schema-hardening statement applied by `academicworld schema`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardeningStep {
    pub name: &'static str,
    pub statement: &'static str,
}

pub const HARDENING_STEPS: [HardeningStep; 3] = [
    HardeningStep {
        name: "index keyword.name",
        statement: "ALTER TABLE keyword ADD INDEX idx_keyword_name (name)",
    },
    HardeningStep {
        name: "foreign key faculty_keyword.keyword_id",
        statement: "ALTER TABLE faculty_keyword ADD CONSTRAINT fk_keyword_id \
                    FOREIGN KEY (keyword_id) REFERENCES keyword (id)",
    },
    HardeningStep {
        name: "non-negative faculty_keyword.score trigger",
        statement: "CREATE TRIGGER faculty_keyword_score_check BEFORE INSERT ON faculty_keyword \
                    FOR EACH ROW BEGIN \
                    IF NEW.score < 0 THEN \
                    SIGNAL SQLSTATE '45000' SET MESSAGE_TEXT = 'score cannot be negative'; \
                    END IF; \
                    END",
    },
];

/// MySQL-backed favorites and recommendations.
///
/// The pool connects lazily. The `favorite_keywords` table is created on
/// first access if it does not exist yet.
pub struct MySqlStore {
    pool: MySqlPool,
    favorites_table: OnceCell<()>,
}

impl MySqlStore {
    pub fn connect_lazy(config: &MySqlConfig) -> StoreResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.url)?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self {
            pool,
            favorites_table: OnceCell::new(),
        }
    }

    async fn ensure_favorites_table(&self) -> StoreResult<()> {
        self.favorites_table
            .get_or_try_init(|| async {
                sqlx::raw_sql(CREATE_FAVORITES_TABLE)
                    .execute(&self.pool)
                    .await?;
                debug!("favorite_keywords table ready");
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(())
    }

    async fn ranked(&self, sql: &str) -> StoreResult<Vec<RecommendationEntry>> {
        self.ensure_favorites_table().await?;
        let rows: Vec<(String, i64, f64)> = sqlx::query_as(sql)
            .bind(TOP_N as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(name, keyword_count, score)| RecommendationEntry {
                name,
                keyword_count,
                score,
            })
            .collect())
    }

    /// Apply every hardening step, continuing past failures.
    ///
    /// Steps that were already applied fail with a duplicate-object error,
    /// which is reported like any other failure.
    pub async fn apply_hardening(&self) -> Vec<(HardeningStep, StoreResult<()>)> {
        let mut report = Vec::with_capacity(HARDENING_STEPS.len());
        for step in HARDENING_STEPS {
            let outcome = sqlx::raw_sql(step.statement)
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(StoreError::from);
            match &outcome {
                Ok(()) => info!("Applied {}", step.name),
                Err(e) => warn!("Could not apply {}: {}", step.name, e),
            }
            report.push((step, outcome));
        }
        report
    }
}

#[async_trait]
impl FavoritesStore for MySqlStore {
    async fn list_favorites(&self) -> StoreResult<Vec<String>> {
        self.ensure_favorites_table().await?;
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM favorite_keywords")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn add_favorite(&self, name: &str) -> StoreResult<()> {
        self.ensure_favorites_table().await?;
        sqlx::query("INSERT IGNORE INTO favorite_keywords (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_favorite(&self, name: &str) -> StoreResult<()> {
        self.ensure_favorites_table().await?;
        sqlx::query("DELETE FROM favorite_keywords WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn keyword_catalog(&self) -> StoreResult<Vec<String>> {
        debug!("mysql: keyword catalog");
        let names: Vec<String> = sqlx::query_scalar(ALL_KEYWORDS)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }
}

#[async_trait]
impl RecommendationSource for MySqlStore {
    async fn top_faculty_for_favorites(&self) -> StoreResult<Vec<RecommendationEntry>> {
        self.ranked(TOP_FACULTY_FOR_FAVORITES).await
    }

    async fn top_universities_for_favorites(&self) -> StoreResult<Vec<RecommendationEntry>> {
        self.ranked(TOP_UNIVERSITIES_FOR_FAVORITES).await
    }
}
