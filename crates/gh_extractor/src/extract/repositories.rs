//! Repository listings scoped to a user or to everything the token can see.

use super::{Extractor, Listing, finish_repositories, require_token};
use crate::config::ExtractConfig;
use crate::enrich::EnrichedRepository;
use crate::error::Result;
use crate::filter::RepositoryFilter;
use crate::github::{PageRequest, Repository, Session, user};

impl Extractor {
    /// List the repositories owned by a user.
    ///
    /// With `username` set, that user's public listing is read and no token is
    /// required. Otherwise the token's owner is resolved first and their own
    /// repositories are taken from the authenticated listing.
    pub async fn list_user_repositories(
        &self,
        config: &ExtractConfig,
    ) -> Result<Listing<EnrichedRepository>> {
        if config.username().is_none() {
            require_token(config, "list your repositories")?;
        }
        let filter = RepositoryFilter::from_config(config, true)?;

        let client = self.client(config);
        let mut session = Session::new(&client);

        let (login, request) = match config.username() {
            Some(username) => (
                username.to_string(),
                PageRequest::named_user_repos(username),
            ),
            None => (
                user::authenticated_login(&mut session).await?,
                PageRequest::user_repos(),
            ),
        };

        let repos: Vec<Repository> = session.collect(request).await?;
        let total = repos.len();
        let kept: Vec<_> = repos
            .into_iter()
            .filter(|r| r.owner.login.eq_ignore_ascii_case(&login))
            .filter(|r| filter.keeps(r))
            .collect();

        tracing::info!(
            operation = "list_user_repositories",
            user = %login,
            total,
            kept = kept.len(),
            "Listed repositories"
        );

        let items = finish_repositories(&mut session, config, kept).await?;
        Ok(Listing::new(items, session.into_rate_limit()))
    }

    /// List every repository visible to the token.
    ///
    /// Reads the authenticated listing directly rather than walking
    /// organisations, so collaborator and personal repositories are included.
    pub async fn list_all_visible_repositories(
        &self,
        config: &ExtractConfig,
    ) -> Result<Listing<EnrichedRepository>> {
        require_token(config, "list visible repositories")?;
        let filter = RepositoryFilter::from_config(config, true)?;

        let client = self.client(config);
        let mut session = Session::new(&client);

        let repos: Vec<Repository> = session.collect(PageRequest::user_repos()).await?;
        let total = repos.len();
        let kept: Vec<_> = repos.into_iter().filter(|r| filter.keeps(r)).collect();

        tracing::info!(
            operation = "list_all_visible_repositories",
            total,
            kept = kept.len(),
            "Listed repositories"
        );

        let items = finish_repositories(&mut session, config, kept).await?;
        Ok(Listing::new(items, session.into_rate_limit()))
    }
}
