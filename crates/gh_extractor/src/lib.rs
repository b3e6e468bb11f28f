//! gh_extractor - Paginated extraction of GitHub organisations and repositories.
//!
//! This library walks GitHub list endpoints to completion, filters the results
//! with include/exclude glob patterns and optionally enriches each kept
//! repository with its branches, contributors, languages, releases, tags,
//! topics and workflows. The authenticated user record can likewise be
//! expanded with its emails, keys, followers and repository lists.
//!
//! All requests for one operation are issued sequentially. Authentication and
//! rate limit failures abort the operation; other failures during enrichment
//! or the per-organisation fan-out are attached to the affected item.
//!
//! # Example
//!
//! ```ignore
//! use gh_extractor::{ExtractConfig, Extractor};
//!
//! let extractor = Extractor::new()?;
//! let config = ExtractConfig {
//!     token: Some(token),
//!     include_repos: vec!["rust-lang/*".into()],
//!     get_topics: true,
//!     ..Default::default()
//! };
//!
//! let listing = extractor.list_all_visible_repositories(&config).await?;
//! println!("{}", serde_json::to_string_pretty(&listing.items)?);
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod filter;
pub mod github;
pub mod http;
pub mod profile;

pub use config::ExtractConfig;
pub use enrich::{EnrichedRepository, EnrichmentKind, EnrichmentRequest, WorkflowsByState};
pub use error::{ExtractorError, Result, SubError};
pub use extract::{Extracted, Extractor, Listing, OrgFailure, OrganizationResult};
pub use filter::{FilterSpec, NamePattern, RepositoryFilter};
pub use github::{AuthenticatedUser, RateLimitInfo, Repository, TokenInfo};
pub use http::{HttpError, HttpRequest, HttpResponse, HttpTransport};
pub use profile::{ProfileKind, ProfileRequest, UserProfile};
