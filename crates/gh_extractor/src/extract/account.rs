//! Queries about the token and its owner.

use super::{Extractor, require_token};
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::github::{Session, TokenInfo, user};
use crate::profile::{UserProfile, expand};

impl Extractor {
    /// Fetch the user the token belongs to.
    ///
    /// The profile `get_*` flags attach the matching `/user/*` lists. A list
    /// that fails is left empty with its error recorded on the profile.
    pub async fn get_authenticated_user(&self, config: &ExtractConfig) -> Result<UserProfile> {
        require_token(config, "get the authenticated user")?;
        let client = self.client(config);
        let mut session = Session::new(&client);
        let user = user::authenticated_user(&mut session).await?;
        expand(&mut session, user, &config.profile_request()).await
    }

    /// Report the token's granted scopes and current quota.
    pub async fn get_token_information(&self, config: &ExtractConfig) -> Result<TokenInfo> {
        require_token(config, "get token information")?;
        let client = self.client(config);
        let mut session = Session::new(&client);
        user::token_information(&mut session).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::error::ExtractorError;
    use crate::http::MockTransport;

    #[tokio::test]
    async fn user_queries_require_a_token() {
        let transport = MockTransport::new();
        let ex = Extractor::with_transport(Arc::new(transport.clone())).unwrap();

        let err = ex
            .get_authenticated_user(&ExtractConfig::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "A token must be provided to get the authenticated user"
        );

        let err = ex
            .get_token_information(&ExtractConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::MissingToken { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn authenticated_user_keeps_profile_fields() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/user",
            json!({"login": "octocat", "name": "The Octocat", "public_repos": 8}),
            Vec::new(),
        );
        let ex = Extractor::with_transport(Arc::new(transport.clone())).unwrap();

        let user = ex
            .get_authenticated_user(&ExtractConfig {
                token: Some("token".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(user.user.login, "octocat");
        assert_eq!(user.user.extra["public_repos"], json!(8));
        assert!(user.collections.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn profile_flags_expand_the_user() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/user",
            json!({"login": "octocat", "followers": 2}),
            Vec::new(),
        );
        transport.push_json(
            "https://api.github.com/user/followers?per_page=100&page=1",
            json!([{"login": "a"}, {"login": "b"}]),
            Vec::new(),
        );
        transport.push_status(
            "https://api.github.com/user/subscriptions?per_page=100&page=1",
            500,
            Vec::new(),
        );
        let ex = Extractor::with_transport(Arc::new(transport.clone())).unwrap();

        let profile = ex
            .get_authenticated_user(&ExtractConfig {
                token: Some("token".into()),
                get_followers: true,
                get_subscriptions: true,
                ..Default::default()
            })
            .await
            .unwrap();

        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["followers"], 2);
        assert_eq!(out["followers_list"][0]["login"], "a");
        assert_eq!(out["subscriptions"], json!([]));
        assert_eq!(out["errors"]["subscriptions"]["error_type"], "RequestError");
    }

    #[tokio::test]
    async fn profile_expansion_stops_on_bad_credentials() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/user",
            json!({"login": "octocat"}),
            Vec::new(),
        );
        transport.push_status(
            "https://api.github.com/user/emails?per_page=100&page=1",
            401,
            Vec::new(),
        );
        let ex = Extractor::with_transport(Arc::new(transport.clone())).unwrap();

        let err = ex
            .get_authenticated_user(&ExtractConfig {
                token: Some("token".into()),
                get_emails: true,
                get_repos: true,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::Authentication));
        assert_eq!(transport.requests().len(), 2);
    }
}
