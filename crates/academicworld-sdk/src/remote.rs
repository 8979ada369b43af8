//! RemoteClient: network client for a running dashboard server
//!
//! Talks to the JSON API under `/api`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::client::DashboardClient;
use crate::error::{SdkError, SdkResult};
use crate::models::{DashboardOptions, FavoritesSnapshot, PieChart, ServerStatus, TableView, Transition, YearRange};

/// Network client that connects to a running dashboard server.
pub struct RemoteClient {
    http_base_url: String,
    http_client: Client,
}

impl RemoteClient {
    /// Create a new RemoteClient connecting to the given HTTP base URL.
    ///
    /// # Example
    /// ```no_run
    /// # use academicworld_sdk::RemoteClient;
    /// let client = RemoteClient::new("http://localhost:8050");
    /// ```
    pub fn new(http_base_url: &str) -> Self {
        Self {
            http_base_url: http_base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.http_base_url
    }

    /// Absolute URL for `path` with `params` appended as query pairs
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> SdkResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.http_base_url, path))
            .map_err(|e| SdkError::InvalidUrl(e.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> SdkResult<T> {
        let url = self.endpoint(path, params)?;
        self.send(self.http_client.get(url)).await
    }

    /// Send a request and decode the body, turning error statuses into `ServerError`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> SdkResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    SdkError::ConnectionError(format!("{} unreachable: {}", self.http_base_url, e))
                } else {
                    SdkError::HttpError(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error_body: serde_json::Value = response
                .json()
                .await
                .unwrap_or_else(|_| json!({ "error": "Unknown error" }));
            let message = error_body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            Err(SdkError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn range_params(range: YearRange) -> [(&'static str, String); 2] {
    [("start", range.start.to_string()), ("end", range.end.to_string())]
}

#[async_trait]
impl DashboardClient for RemoteClient {
    async fn top_keywords(&self, range: YearRange) -> SdkResult<TableView> {
        self.get_json("/api/keywords/top", &range_params(range)).await
    }

    async fn top_universities(&self, keyword: &str, range: YearRange) -> SdkResult<TableView> {
        let [start, end] = range_params(range);
        self.get_json(
            "/api/universities/top",
            &[("keyword", keyword.to_string()), start, end],
        )
        .await
    }

    async fn university_keyword_scores(&self, university: &str) -> SdkResult<PieChart> {
        self.get_json(
            "/api/universities/keyword-scores",
            &[("university", university.to_string())],
        )
        .await
    }

    async fn faculty_keyword_scores(&self, faculty: &str, range: YearRange) -> SdkResult<TableView> {
        let [start, end] = range_params(range);
        self.get_json(
            "/api/faculty/keyword-scores",
            &[("faculty", faculty.to_string()), start, end],
        )
        .await
    }

    async fn options(&self) -> SdkResult<DashboardOptions> {
        self.get_json("/api/options", &[]).await
    }

    async fn favorites(&self) -> SdkResult<FavoritesSnapshot> {
        self.get_json("/api/favorites", &[]).await
    }

    async fn add_favorite(&self, keyword: &str) -> SdkResult<Transition> {
        let url = self.endpoint("/api/favorites", &[])?;
        self.send(self.http_client.post(url).json(&json!({ "keyword": keyword })))
            .await
    }

    async fn remove_favorite(&self, keyword: &str) -> SdkResult<Transition> {
        let mut url = self.endpoint("/api/favorites", &[])?;
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(self.http_base_url.clone()))?
            .push(keyword);
        self.send(self.http_client.delete(url)).await
    }

    async fn edit_favorites(&self, keywords: Vec<String>) -> SdkResult<Transition> {
        let url = self.endpoint("/api/favorites", &[])?;
        self.send(self.http_client.put(url).json(&json!({ "keywords": keywords })))
            .await
    }

    async fn status(&self) -> SdkResult<ServerStatus> {
        self.get_json("/api/status", &[]).await
    }
}
