//! GitHub REST API access.
//!
//! # Module Structure
//!
//! - [`client`] - Request building, status mapping, Link and rate limit headers
//! - [`pagination`] - The [`Pager`] that walks list endpoints to completion
//! - [`session`] - Per-operation context carrying the rate limit snapshot
//! - [`types`] - Records decoded from API responses
//! - [`user`] - Authenticated user and token queries

pub mod client;
pub mod pagination;
pub mod session;
pub mod types;
pub mod user;

pub use client::{
    ApiResponse, DEFAULT_TIMEOUT, GITHUB_API_BASE, GitHubClient, PageLinks,
    parse_link_header, parse_rate_limit_headers,
};
pub use pagination::{PER_PAGE, Page, PageRequest, Paged, Pager};
pub use session::Session;
pub use types::{
    AuthenticatedUser, Branch, Contributor, Member, Organization, Owner, RateLimitInfo, Release,
    Repository, Tag, TokenInfo, Workflow,
};
