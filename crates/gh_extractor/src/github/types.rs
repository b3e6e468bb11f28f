//! Records decoded from GitHub API responses.
//!
//! Each resource kind gets its own record carrying only the fields this crate
//! reads. Everything else lands in a flattened `extra` map so the full object
//! can be emitted again untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields of an API object that are passed through without interpretation.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Rate limit snapshot parsed from `x-ratelimit-*` response headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    /// Maximum requests allowed per period.
    pub limit: usize,
    /// Remaining requests in current period.
    pub remaining: usize,
    /// Requests used in current period, when the API reports it.
    pub used: Option<usize>,
    /// When the rate limit resets.
    pub reset_at: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Whole seconds until the quota resets, clamped at zero.
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> i64 {
        self.reset_at.signed_duration_since(now).num_seconds().max(0)
    }
}

/// An organisation the authenticated user belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A member of an organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub login: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Owner block nested in a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A repository as returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub owner: Owner,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A contributor. Anonymous contributors carry no login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Envelope returned by `/repos/{owner}/{repo}/actions/workflows`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowsPage {
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

/// Envelope returned by `/repos/{owner}/{repo}/topics`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicsPage {
    #[serde(default)]
    pub names: Vec<String>,
}

/// Body of `/repos/{owner}/{repo}/languages`: language name to byte count.
pub type LanguagesPage = serde_json::Map<String, serde_json::Value>;

/// The user a token belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Scopes and quota of the configured token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenInfo {
    /// Granted OAuth scopes. Fine-grained tokens report none.
    pub scopes: Vec<String>,
    pub rate_limit: Option<RateLimitInfo>,
}

/// Parse the comma-separated `x-oauth-scopes` header value.
pub fn parse_scopes(header: Option<&str>) -> Vec<String> {
    header
        .map(|h| {
            h.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repository_keeps_unconsumed_fields() {
        let raw = json!({
            "name": "one",
            "full_name": "Alpha/one",
            "private": true,
            "owner": {"login": "Alpha", "type": "Organization"},
            "stargazers_count": 7
        });
        let repo: Repository = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(repo.full_name, "Alpha/one");
        assert!(repo.private);
        assert_eq!(repo.owner.login, "Alpha");
        assert_eq!(repo.extra.get("stargazers_count"), Some(&json!(7)));

        assert_eq!(serde_json::to_value(&repo).unwrap(), raw);
    }

    #[test]
    fn repository_without_privacy_flag_is_public() {
        let repo: Repository = serde_json::from_value(json!({
            "name": "one",
            "full_name": "Alpha/one",
            "owner": {"login": "Alpha"}
        }))
        .unwrap();
        assert!(!repo.private);
    }

    #[test]
    fn repository_missing_full_name_is_rejected() {
        let result: Result<Repository, _> =
            serde_json::from_value(json!({"name": "one", "owner": {"login": "a"}}));
        assert!(result.is_err());
    }

    #[test]
    fn anonymous_contributor_has_no_login() {
        let c: Contributor =
            serde_json::from_value(json!({"type": "Anonymous", "contributions": 3})).unwrap();
        assert!(c.login.is_none());
    }

    #[test]
    fn parse_scopes_splits_and_trims() {
        assert_eq!(
            parse_scopes(Some("repo, read:org ,  gist")),
            vec!["repo", "read:org", "gist"]
        );
        assert!(parse_scopes(Some("")).is_empty());
        assert!(parse_scopes(None).is_empty());
    }

    #[test]
    fn seconds_until_reset_is_clamped() {
        let now = Utc::now();
        let info = RateLimitInfo {
            limit: 5000,
            remaining: 0,
            used: Some(5000),
            reset_at: now - chrono::Duration::seconds(30),
        };
        assert_eq!(info.seconds_until_reset(now), 0);

        let info = RateLimitInfo {
            reset_at: now + chrono::Duration::seconds(90),
            ..info
        };
        assert_eq!(info.seconds_until_reset(now), 90);
    }
}
