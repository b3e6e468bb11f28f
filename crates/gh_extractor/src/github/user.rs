//! Queries about the token's owner.

use super::session::Session;
use super::types::{AuthenticatedUser, TokenInfo, parse_scopes};
use crate::error::Result;

/// Fetch the user the configured token belongs to.
pub async fn authenticated_user(session: &mut Session<'_>) -> Result<AuthenticatedUser> {
    session.get(&["user"]).await?.json()
}

/// Login of the user the configured token belongs to.
pub async fn authenticated_login(session: &mut Session<'_>) -> Result<String> {
    Ok(authenticated_user(session).await?.login)
}

/// Read granted scopes and quota from a `/user` round trip.
pub async fn token_information(session: &mut Session<'_>) -> Result<TokenInfo> {
    let response = session.get(&["user"]).await?;
    Ok(TokenInfo {
        scopes: parse_scopes(crate::http::header_get(&response.headers, "x-oauth-scopes")),
        rate_limit: response.rate_limit,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::error::ExtractorError;
    use crate::github::client::{DEFAULT_TIMEOUT, GitHubClient};
    use crate::http::MockTransport;

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::new(
            Arc::new(transport.clone()),
            Url::parse("https://api.github.com/").unwrap(),
            Some("token"),
            DEFAULT_TIMEOUT,
        )
    }

    #[tokio::test]
    async fn authenticated_login_reads_login() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/user",
            json!({"login": "octocat", "id": 1}),
            Vec::new(),
        );

        let c = client(&transport);
        let mut session = Session::new(&c);
        assert_eq!(authenticated_login(&mut session).await.unwrap(), "octocat");
    }

    #[tokio::test]
    async fn bad_credentials_are_authentication_errors() {
        let transport = MockTransport::new();
        transport.push_status("https://api.github.com/user", 401, Vec::new());

        let c = client(&transport);
        let mut session = Session::new(&c);
        let err = authenticated_user(&mut session).await.unwrap_err();
        assert!(matches!(err, ExtractorError::Authentication));
    }

    #[tokio::test]
    async fn token_information_reads_scopes_and_quota() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/user",
            json!({"login": "octocat"}),
            vec![
                ("X-OAuth-Scopes".to_string(), "repo, read:org".to_string()),
                ("X-RateLimit-Limit".to_string(), "5000".to_string()),
                ("X-RateLimit-Remaining".to_string(), "4999".to_string()),
                ("X-RateLimit-Used".to_string(), "1".to_string()),
                ("X-RateLimit-Reset".to_string(), "1700000000".to_string()),
            ],
        );

        let c = client(&transport);
        let mut session = Session::new(&c);
        let info = token_information(&mut session).await.unwrap();
        assert_eq!(info.scopes, vec!["repo", "read:org"]);
        let rate = info.rate_limit.expect("rate limit headers present");
        assert_eq!(rate.remaining, 4999);
        assert_eq!(rate.used, Some(1));
        assert_eq!(session.rate_limit().map(|r| r.remaining), Some(4999));
    }
}
