//! Result shapes returned by the extraction operations.

use serde::Serialize;

use crate::error::SubError;
use crate::github::{Member, Organization, RateLimitInfo};

/// Kept items, either whole or collapsed to their qualifying names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Extracted<T> {
    Full(Vec<T>),
    Slugs(Vec<String>),
}

impl<T> Extracted<T> {
    pub fn len(&self) -> usize {
        match self {
            Self::Full(items) => items.len(),
            Self::Slugs(slugs) => slugs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full items, or `None` in slug mode.
    pub fn full(&self) -> Option<&[T]> {
        match self {
            Self::Full(items) => Some(items),
            Self::Slugs(_) => None,
        }
    }

    /// The slugs, or `None` when full items were kept.
    pub fn slugs(&self) -> Option<&[String]> {
        match self {
            Self::Full(_) => None,
            Self::Slugs(slugs) => Some(slugs),
        }
    }
}

/// An organisation whose repositories could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgFailure {
    pub org: String,
    #[serde(flatten)]
    pub error: SubError,
}

/// Output of one list operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub items: Extracted<T>,
    /// Per-organisation failures from the fan-out listing. Empty elsewhere.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<OrgFailure>,
    /// Latest quota snapshot seen during the operation.
    pub rate_limit: Option<RateLimitInfo>,
}

impl<T> Listing<T> {
    pub fn new(items: Extracted<T>, rate_limit: Option<RateLimitInfo>) -> Self {
        Self {
            items,
            failures: Vec::new(),
            rate_limit,
        }
    }
}

/// An organisation, optionally expanded with its members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationResult {
    #[serde(flatten)]
    pub organization: Organization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Member>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_error: Option<SubError>,
}
