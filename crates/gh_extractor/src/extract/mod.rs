//! Extraction operations.
//!
//! Each operation validates its configuration before any request, then
//! composes the Pager, the name filters and the enricher:
//!
//! ```text
//! Pager(primary listing) -> filter -> slugs | enrich -> Listing
//! ```
//!
//! Every call owns its own [`Session`]; nothing is shared between calls.

mod listing;
mod organizations;
mod repositories;
mod account;

use std::sync::Arc;

use url::Url;

pub use listing::{Extracted, Listing, OrgFailure, OrganizationResult};

use crate::config::ExtractConfig;
use crate::enrich::{EnrichedRepository, enrich_all};
use crate::error::{ExtractorError, Result};
use crate::github::{GITHUB_API_BASE, GitHubClient, Repository, Session};
use crate::http::HttpTransport;
use crate::http::reqwest_transport::ReqwestTransport;

const USER_AGENT: &str = concat!("gh-extractor/", env!("CARGO_PKG_VERSION"));

/// Entry point for all extraction operations.
///
/// Holds the transport and API root. Credentials and options arrive per call
/// in an [`ExtractConfig`].
#[derive(Clone)]
pub struct Extractor {
    transport: Arc<dyn HttpTransport>,
    api_base: Url,
}

impl Extractor {
    /// Extractor over the public GitHub API using reqwest.
    pub fn new() -> Result<Self> {
        Self::for_api_base(GITHUB_API_BASE)
    }

    /// Extractor over another API root using reqwest.
    pub fn for_api_base(api_base: &str) -> Result<Self> {
        let transport = ReqwestTransport::with_user_agent(USER_AGENT)
            .map_err(|e| ExtractorError::request(format!("Failed to build HTTP client: {e}")))?;
        Self::with_api_base(Arc::new(transport), api_base)
    }

    /// Extractor over the public GitHub API using a custom transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Self::with_api_base(transport, GITHUB_API_BASE)
    }

    /// Extractor against a different API root, such as GitHub Enterprise.
    pub fn with_api_base(transport: Arc<dyn HttpTransport>, api_base: &str) -> Result<Self> {
        let mut base = api_base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_base = Url::parse(&base)
            .map_err(|e| ExtractorError::request(format!("Invalid API base {api_base}: {e}")))?;
        Ok(Self {
            transport,
            api_base,
        })
    }

    /// The API root, always ending in `/`.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn client(&self, config: &ExtractConfig) -> GitHubClient {
        GitHubClient::new(
            self.transport.clone(),
            self.api_base.clone(),
            config.token(),
            config.timeout_duration(),
        )
    }
}

/// Fail with [`ExtractorError::MissingToken`] unless a token is configured.
fn require_token(config: &ExtractConfig, action: &str) -> Result<()> {
    match config.token() {
        Some(_) => Ok(()),
        None => Err(ExtractorError::missing_token(action)),
    }
}

/// Collapse kept repositories to slugs, or enrich them.
async fn finish_repositories(
    session: &mut Session<'_>,
    config: &ExtractConfig,
    repositories: Vec<Repository>,
) -> Result<Extracted<EnrichedRepository>> {
    if config.slugs {
        return Ok(Extracted::Slugs(
            repositories.into_iter().map(|r| r.full_name).collect(),
        ));
    }

    let request = config.enrichment_request();
    Ok(Extracted::Full(
        enrich_all(session, repositories, &request).await?,
    ))
}
