//! Optional collections attached to the authenticated user.
//!
//! Works like repository enrichment: each requested kind is one Pager run
//! under `/user`, kinds run in [`ProfileKind::ALL`] order, and a failed kind
//! leaves an empty collection plus a [`SubError`]. Authentication and rate
//! limit failures abort.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{Result, SubError, attach_or_propagate};
use crate::github::{AuthenticatedUser, PageRequest, Session};

/// A `/user/*` list that can be attached to the user record.
///
/// Serialized names are the keys used in the output record. Followers and
/// following get a `_list` suffix because `/user` already reports their
/// counts under the bare names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Emails,
    #[serde(rename = "followers_list")]
    Followers,
    #[serde(rename = "following_list")]
    Following,
    GpgKeys,
    SshKeys,
    Repos,
    StarredRepos,
    Subscriptions,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 8] = [
        Self::Emails,
        Self::Followers,
        Self::Following,
        Self::GpgKeys,
        Self::SshKeys,
        Self::Repos,
        Self::StarredRepos,
        Self::Subscriptions,
    ];

    /// Output key, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emails => "emails",
            Self::Followers => "followers_list",
            Self::Following => "following_list",
            Self::GpgKeys => "gpg_keys",
            Self::SshKeys => "ssh_keys",
            Self::Repos => "repos",
            Self::StarredRepos => "starred_repos",
            Self::Subscriptions => "subscriptions",
        }
    }

    fn resource(self) -> &'static str {
        match self {
            Self::Emails => "emails",
            Self::Followers => "followers",
            Self::Following => "following",
            Self::GpgKeys => "gpg_keys",
            Self::SshKeys => "keys",
            Self::Repos => "repos",
            Self::StarredRepos => "starred",
            Self::Subscriptions => "subscriptions",
        }
    }

    pub fn request(self) -> PageRequest {
        PageRequest::new(["user", self.resource()])
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of kinds to attach to the user record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRequest {
    kinds: BTreeSet<ProfileKind>,
}

impl ProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Requested kinds in fetch order.
    pub fn kinds(&self) -> impl Iterator<Item = ProfileKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl FromIterator<ProfileKind> for ProfileRequest {
    fn from_iter<I: IntoIterator<Item = ProfileKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// The authenticated user with any requested collections alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: AuthenticatedUser,
    #[serde(flatten)]
    pub collections: BTreeMap<ProfileKind, Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<ProfileKind, SubError>,
}

impl UserProfile {
    pub fn bare(user: AuthenticatedUser) -> Self {
        Self {
            user,
            collections: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn collection(&self, kind: ProfileKind) -> Option<&[serde_json::Value]> {
        self.collections.get(&kind).map(Vec::as_slice)
    }
}

/// Attach every requested kind to `user`.
///
/// Only authentication and rate limit failures return `Err`.
pub async fn expand(
    session: &mut Session<'_>,
    user: AuthenticatedUser,
    request: &ProfileRequest,
) -> Result<UserProfile> {
    let mut profile = UserProfile::bare(user);

    for kind in request.kinds() {
        let items = match session.collect::<serde_json::Value>(kind.request()).await {
            Ok(items) => items,
            Err(e) => {
                let sub_error = attach_or_propagate(e)?;
                tracing::warn!(
                    user = %profile.user.login,
                    kind = %kind,
                    error = %sub_error.error,
                    "Profile fetch failed"
                );
                profile.errors.insert(kind, sub_error);
                Vec::new()
            }
        };
        profile.collections.insert(kind, items);
    }

    Ok(profile)
}
