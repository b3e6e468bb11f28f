//! Per-call extraction options.

use std::time::Duration;

use serde::Deserialize;

use crate::enrich::{EnrichmentKind, EnrichmentRequest};
use crate::github::DEFAULT_TIMEOUT;
use crate::profile::{ProfileKind, ProfileRequest};

/// Options consumed by every extraction operation.
///
/// Deserializable with every field optional, so partial config files and
/// environment overlays fill in only what they name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Bearer credential attached to every request.
    pub token: Option<String>,
    /// Per-request deadline in seconds.
    pub timeout: u64,
    /// Collapse results to qualifying names and skip enrichment.
    pub slugs: bool,
    /// Subject of the user repository listing. Defaults to the token's owner.
    pub username: Option<String>,
    /// Subject of the organisation repository listing.
    pub org_name: Option<String>,

    pub include_orgs: Vec<String>,
    pub ignore_orgs: Vec<String>,
    /// Expand each kept organisation with its member list.
    pub get_members: bool,

    /// Patterns over the full `owner/name`.
    pub include_repos: Vec<String>,
    pub ignore_repos: Vec<String>,
    /// Patterns over the bare repository name.
    pub include_names: Vec<String>,
    pub ignore_names: Vec<String>,
    pub skip_private: bool,

    pub get_branches: bool,
    pub get_contributors: bool,
    pub get_languages: bool,
    pub get_releases: bool,
    pub get_tags: bool,
    pub get_topics: bool,
    pub get_workflows: bool,

    /// Collections attached to the authenticated user record.
    pub get_emails: bool,
    pub get_followers: bool,
    pub get_following: bool,
    pub get_gpg_keys: bool,
    pub get_ssh_keys: bool,
    pub get_repos: bool,
    pub get_starred_repos: bool,
    pub get_subscriptions: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            token: None,
            timeout: DEFAULT_TIMEOUT.as_secs(),
            slugs: false,
            username: None,
            org_name: None,
            include_orgs: Vec::new(),
            ignore_orgs: Vec::new(),
            get_members: false,
            include_repos: Vec::new(),
            ignore_repos: Vec::new(),
            include_names: Vec::new(),
            ignore_names: Vec::new(),
            skip_private: false,
            get_branches: false,
            get_contributors: false,
            get_languages: false,
            get_releases: false,
            get_tags: false,
            get_topics: false,
            get_workflows: false,
            get_emails: false,
            get_followers: false,
            get_following: false,
            get_gpg_keys: false,
            get_ssh_keys: false,
            get_repos: false,
            get_starred_repos: false,
            get_subscriptions: false,
        }
    }
}

impl ExtractConfig {
    /// The token, if set and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// The org name, if set and non-empty.
    pub fn org_name(&self) -> Option<&str> {
        self.org_name.as_deref().filter(|o| !o.is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// The enrichment kinds switched on by the `get_*` flags.
    pub fn enrichment_request(&self) -> EnrichmentRequest {
        let flags = [
            (EnrichmentKind::Branches, self.get_branches),
            (EnrichmentKind::Contributors, self.get_contributors),
            (EnrichmentKind::Languages, self.get_languages),
            (EnrichmentKind::Releases, self.get_releases),
            (EnrichmentKind::Tags, self.get_tags),
            (EnrichmentKind::Topics, self.get_topics),
            (EnrichmentKind::Workflows, self.get_workflows),
        ];

        flags
            .into_iter()
            .filter_map(|(kind, on)| on.then_some(kind))
            .collect()
    }

    /// The user collections switched on by the profile `get_*` flags.
    pub fn profile_request(&self) -> ProfileRequest {
        [
            (ProfileKind::Emails, self.get_emails),
            (ProfileKind::Followers, self.get_followers),
            (ProfileKind::Following, self.get_following),
            (ProfileKind::GpgKeys, self.get_gpg_keys),
            (ProfileKind::SshKeys, self.get_ssh_keys),
            (ProfileKind::Repos, self.get_repos),
            (ProfileKind::StarredRepos, self.get_starred_repos),
            (ProfileKind::Subscriptions, self.get_subscriptions),
        ]
        .into_iter()
        .filter_map(|(kind, on)| on.then_some(kind))
        .collect()
    }
}
