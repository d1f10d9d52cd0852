use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{CircleStatsError, Result};
use crate::types::{Build, BuildDetail};

const USER_AGENT: &str = concat!("circlestats/", env!("CARGO_PKG_VERSION"));

/// CircleCI REST API client.
///
/// Issues authenticated GET requests against
/// `{api_root}/{project}[/{build_num}]` and decodes the JSON responses into
/// typed records. One request at a time; no retry, no pagination.
pub struct CircleClient {
    client: Client,
    api_root: String,
    project: String,
    key: String,
}

impl CircleClient {
    /// Creates a client from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the underlying HTTP client cannot be
    /// built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CircleStatsError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_root: config.api_root.clone(),
            project: config.project.clone(),
            key: config.key.clone(),
        })
    }

    /// Project slug this client is bound to.
    pub fn project(&self) -> &str {
        &self.project
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = if path.is_empty() {
            format!("{}/{}", self.api_root, self.project)
        } else {
            format!("{}/{}/{}", self.api_root, self.project, path)
        };

        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.key, Some(""))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CircleStatsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetches recent builds, most recent first, optionally filtered by the
    /// API's status filter (e.g. "failed").
    pub async fn recent_builds(&self, limit: usize, filter: Option<&str>) -> Result<Vec<Build>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(filter) = filter {
            query.push(("filter", filter.to_string()));
        }

        self.fetch("", &query).await
    }

    /// Fetches the most recent failed builds.
    pub async fn failed_builds(&self, limit: usize) -> Result<Vec<Build>> {
        self.recent_builds(limit, Some("failed")).await
    }

    /// Fetches the detail record for one build, including its steps and
    /// actions.
    pub async fn build_detail(&self, build_num: u64) -> Result<BuildDetail> {
        self.fetch(&build_num.to_string(), &[]).await
    }
}
