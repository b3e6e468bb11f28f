//! Page-by-page walking of list endpoints.
//!
//! A [`Pager`] starts at page 1 and follows the `rel="next"` page number from
//! the Link header until a page comes back empty, no next link is present, or
//! the advertised next page would not move forward. Any failed page aborts
//! the run; items from earlier pages are dropped with it.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::client::GitHubClient;
use super::types::RateLimitInfo;
use crate::error::Result;

/// Items requested per page. GitHub's maximum.
pub const PER_PAGE: u32 = 100;

/// A list endpoint plus its fixed query parameters.
///
/// The endpoint is kept as raw path segments; the client encodes each one.
/// The page number is owned by the [`Pager`], not by the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: Vec<String>,
    pub params: Vec<(String, String)>,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new<I>(path: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            params: Vec::new(),
            per_page: PER_PAGE,
        }
    }

    /// Add a fixed query parameter sent with every page.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Unencoded `/a/b` form, for logs.
    pub fn endpoint(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    /// Organisations the authenticated user belongs to.
    pub fn user_orgs() -> Self {
        Self::new(["user", "orgs"])
    }

    /// Repositories visible to the authenticated user.
    pub fn user_repos() -> Self {
        Self::new(["user", "repos"])
    }

    /// Public repositories of a named user.
    pub fn named_user_repos(username: &str) -> Self {
        Self::new(["users", username, "repos"])
    }

    pub fn org_repos(org: &str) -> Self {
        Self::new(["orgs", org, "repos"])
    }

    pub fn org_members(org: &str) -> Self {
        Self::new(["orgs", org, "members"])
    }

    fn query_for(&self, page: u32) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        params.push(("per_page".to_string(), self.per_page.to_string()));
        params.push(("page".to_string(), page.to_string()));
        params
    }
}

/// One fetched page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Page number (1-indexed).
    pub number: u32,
    pub items: Vec<T>,
    pub rate_limit: Option<RateLimitInfo>,
}

/// Result of walking an endpoint to completion.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// Number of requests issued.
    pub pages: u32,
    /// Rate limit snapshot from the last page.
    pub rate_limit: Option<RateLimitInfo>,
}

/// Cursor over the pages of one list endpoint.
///
/// Every pager starts from page 1; create a new one to restart.
pub struct Pager<'a, T> {
    client: &'a GitHubClient,
    request: PageRequest,
    next: Option<u32>,
    pages_fetched: u32,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Pager<'a, T> {
    pub fn new(client: &'a GitHubClient, request: PageRequest) -> Self {
        Self {
            client,
            request,
            next: Some(1),
            pages_fetched: 0,
            _item: PhantomData,
        }
    }

    /// Number of requests issued so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Fetch the next page, or `None` once the endpoint is exhausted.
    ///
    /// After an error the pager is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        let Some(number) = self.next.take() else {
            return Ok(None);
        };

        let url = self
            .client
            .endpoint_url(self.request.path.as_slice(), &self.request.query_for(number))?;
        let response = self.client.get(&url).await?;
        self.pages_fetched += 1;

        let items: Vec<T> = response.items()?;

        tracing::debug!(
            endpoint = %self.request.endpoint(),
            page = number,
            count = items.len(),
            last_page = ?response.pagination.total_pages(),
            "Fetched page"
        );

        self.next = match response.pagination.next_page {
            Some(next) if !items.is_empty() && next > number => Some(next),
            _ => None,
        };

        Ok(Some(Page {
            number,
            items,
            rate_limit: response.rate_limit,
        }))
    }

    /// Walk every remaining page and flatten the items in API order.
    pub async fn collect_all(mut self) -> Result<Paged<T>> {
        let mut items = Vec::new();
        let mut rate_limit = None;

        while let Some(page) = self.next_page().await? {
            items.extend(page.items);
            if page.rate_limit.is_some() {
                rate_limit = page.rate_limit;
            }
        }

        Ok(Paged {
            items,
            pages: self.pages_fetched,
            rate_limit,
        })
    }
}

impl GitHubClient {
    /// Start a fresh pager over `request`.
    pub fn paginate<T: DeserializeOwned>(&self, request: PageRequest) -> Pager<'_, T> {
        Pager::new(self, request)
    }
}
