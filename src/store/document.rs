//! Document-store adapter over the `publications` collection

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::{Client, Collection};
use tracing::debug;

use super::{KeywordCount, PublicationStore, StoreError, StoreResult, YearRange, TOP_N};
use crate::config::MongoConfig;

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
                StoreError::Connection(e.to_string())
            }
            ErrorKind::InvalidArgument { .. } => StoreError::Config(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}

/// Publications aggregation against MongoDB.
///
/// The client is created once and shared; the driver connects lazily on the
/// first operation, so construction succeeds while the server is down.
pub struct MongoPublicationStore {
    publications: Collection<Document>,
}

impl MongoPublicationStore {
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let publications = client
            .database(&config.database)
            .collection::<Document>(&config.collection);
        Ok(Self { publications })
    }

    fn top_keywords_pipeline(range: YearRange) -> Vec<Document> {
        vec![
            doc! { "$match": { "year": { "$gte": range.start, "$lte": range.end } } },
            doc! { "$unwind": "$keywords" },
            doc! { "$group": { "_id": "$keywords.name", "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1 } },
            doc! { "$limit": TOP_N as i64 },
        ]
    }
}

fn decode_keyword_count(row: &Document) -> StoreResult<KeywordCount> {
    let keyword = row
        .get_str("_id")
        .map_err(|e| StoreError::Decode(format!("keyword name: {}", e)))?
        .to_string();
    let publication_count = match row.get("count") {
        Some(Bson::Int32(n)) => *n as i64,
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(n)) => *n as i64,
        other => {
            return Err(StoreError::Decode(format!(
                "publication count for {}: {:?}",
                keyword, other
            )))
        }
    };
    Ok(KeywordCount { keyword, publication_count })
}

#[async_trait]
impl PublicationStore for MongoPublicationStore {
    async fn top_keywords(&self, range: YearRange) -> StoreResult<Vec<KeywordCount>> {
        debug!("mongo: top keywords for {}..={}", range.start, range.end);
        let mut cursor = self
            .publications
            .aggregate(Self::top_keywords_pipeline(range))
            .await?;

        let mut rows = Vec::new();
        while let Some(row) = cursor.try_next().await? {
            rows.push(decode_keyword_count(&row)?);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_filters_inclusive_range() {
        let pipeline = MongoPublicationStore::top_keywords_pipeline(YearRange::new(1990, 2000));
        assert_eq!(pipeline.len(), 5);
        let year = pipeline[0]
            .get_document("$match")
            .and_then(|m| m.get_document("year"))
            .unwrap();
        assert_eq!(year.get_i32("$gte").unwrap(), 1990);
        assert_eq!(year.get_i32("$lte").unwrap(), 2000);
    }

    #[test]
    fn test_decode_counts() {
        let row = doc! { "_id": "databases", "count": 7 };
        let decoded = decode_keyword_count(&row).unwrap();
        assert_eq!(decoded.keyword, "databases");
        assert_eq!(decoded.publication_count, 7);

        let bad = doc! { "_id": "databases" };
        assert!(matches!(decode_keyword_count(&bad), Err(StoreError::Decode(_))));
    }
}
