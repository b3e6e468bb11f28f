//! Per-operation request context.

use serde::de::DeserializeOwned;

use super::client::{ApiResponse, GitHubClient};
use super::pagination::PageRequest;
use super::types::RateLimitInfo;
use crate::error::Result;

/// State owned by one top-level operation.
///
/// Carries the client and the latest rate limit snapshot seen by any request
/// of the operation. The snapshot is handed back to the caller with the
/// result; nothing outlives the operation.
pub struct Session<'a> {
    client: &'a GitHubClient,
    rate_limit: Option<RateLimitInfo>,
}

impl<'a> Session<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self {
            client,
            rate_limit: None,
        }
    }

    /// Record a snapshot if one was reported.
    pub fn observe(&mut self, rate_limit: Option<RateLimitInfo>) {
        if rate_limit.is_some() {
            self.rate_limit = rate_limit;
        }
    }

    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    pub fn into_rate_limit(self) -> Option<RateLimitInfo> {
        self.rate_limit
    }

    /// Walk a list endpoint to completion.
    pub async fn collect<T: DeserializeOwned>(&mut self, request: PageRequest) -> Result<Vec<T>> {
        let paged = self.client.paginate::<T>(request).collect_all().await?;
        self.observe(paged.rate_limit);
        Ok(paged.items)
    }

    /// GET a single, non-paginated endpoint.
    pub async fn get(&mut self, path: &[&str]) -> Result<ApiResponse> {
        let response = self.client.get_path(path).await?;
        self.observe(response.rate_limit.clone());
        Ok(response)
    }
}
