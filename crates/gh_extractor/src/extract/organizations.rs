//! Organisation listings and the per-organisation repository fan-out.

use super::{
    Extracted, Extractor, Listing, OrgFailure, OrganizationResult, finish_repositories,
    require_token,
};
use crate::config::ExtractConfig;
use crate::enrich::{EnrichedRepository, enrich_all};
use crate::error::{ExtractorError, Result, SubError, attach_or_propagate};
use crate::filter::{FilterSpec, RepositoryFilter, organization_filter};
use crate::github::{Member, Organization, PageRequest, Repository, Session};

/// Organisations of the token's owner that survive the org filter.
async fn kept_organizations(
    session: &mut Session<'_>,
    filter: &FilterSpec,
) -> Result<Vec<Organization>> {
    let orgs: Vec<Organization> = session.collect(PageRequest::user_orgs()).await?;
    let total = orgs.len();

    let kept: Vec<_> = orgs
        .into_iter()
        .filter(|org| filter.matches(&org.login))
        .collect();

    tracing::debug!(total, kept = kept.len(), "Filtered organizations");
    Ok(kept)
}

/// Repositories of one organisation that survive the repository filter.
async fn kept_org_repositories(
    session: &mut Session<'_>,
    filter: &RepositoryFilter,
    org: &str,
) -> Result<Vec<Repository>> {
    if org.is_empty() {
        return Err(ExtractorError::MissingOrgName);
    }

    let repos: Vec<Repository> = session.collect(PageRequest::org_repos(org)).await?;
    Ok(repos.into_iter().filter(|r| filter.keeps(r)).collect())
}

impl Extractor {
    /// List the organisations the token's owner belongs to.
    ///
    /// With `get_members`, each kept organisation is expanded with its member
    /// list. A failed member fetch is attached to that organisation.
    pub async fn list_organisations(
        &self,
        config: &ExtractConfig,
    ) -> Result<Listing<OrganizationResult>> {
        require_token(config, "list your organisations")?;
        let filter = organization_filter(config)?;

        let client = self.client(config);
        let mut session = Session::new(&client);
        let orgs = kept_organizations(&mut session, &filter).await?;

        tracing::info!(
            operation = "list_organisations",
            kept = orgs.len(),
            "Listed organizations"
        );

        let items = if config.slugs {
            Extracted::Slugs(orgs.into_iter().map(|o| o.login).collect())
        } else {
            let mut results = Vec::with_capacity(orgs.len());
            for organization in orgs {
                let mut result = OrganizationResult {
                    organization,
                    members: None,
                    member_error: None,
                };
                if config.get_members {
                    attach_members(&mut session, &mut result).await?;
                }
                results.push(result);
            }
            Extracted::Full(results)
        };

        Ok(Listing::new(items, session.into_rate_limit()))
    }

    /// American spelling of [`Extractor::list_organisations`].
    pub async fn list_organizations(
        &self,
        config: &ExtractConfig,
    ) -> Result<Listing<OrganizationResult>> {
        self.list_organisations(config).await
    }

    /// List the repositories of `org_name`.
    ///
    /// `skip_private` has no effect here: visibility inside an organisation is
    /// already scoped by membership.
    pub async fn list_repositories_by_org(
        &self,
        config: &ExtractConfig,
    ) -> Result<Listing<EnrichedRepository>> {
        let org = config.org_name().ok_or(ExtractorError::MissingOrgName)?;
        require_token(config, "list organisation repositories")?;
        let filter = RepositoryFilter::from_config(config, false)?;

        let client = self.client(config);
        let mut session = Session::new(&client);
        let repos = kept_org_repositories(&mut session, &filter, org).await?;

        tracing::info!(
            operation = "list_repositories_by_org",
            org,
            kept = repos.len(),
            "Listed repositories"
        );

        let items = finish_repositories(&mut session, config, repos).await?;
        Ok(Listing::new(items, session.into_rate_limit()))
    }

    /// List repositories across every kept organisation.
    ///
    /// Organisations are processed one at a time. A failure listing one
    /// organisation is reported in [`Listing::failures`] and the rest carry
    /// on; authentication and rate limit failures abort the whole call.
    pub async fn list_all_org_repositories(
        &self,
        config: &ExtractConfig,
    ) -> Result<Listing<EnrichedRepository>> {
        require_token(config, "list organisation repositories")?;
        let org_filter = organization_filter(config)?;
        let filter = RepositoryFilter::from_config(config, false)?;

        let client = self.client(config);
        let mut session = Session::new(&client);
        let orgs = kept_organizations(&mut session, &org_filter).await?;

        let request = config.enrichment_request();
        let mut slugs = Vec::new();
        let mut full = Vec::new();
        let mut failures = Vec::new();

        for org in orgs {
            let repos = match kept_org_repositories(&mut session, &filter, &org.login).await {
                Ok(repos) => repos,
                Err(e) => {
                    let error = attach_or_propagate(e)?;
                    tracing::warn!(
                        org = %org.login,
                        error = %error.error,
                        "Failed to list organization repositories"
                    );
                    failures.push(OrgFailure {
                        org: org.login,
                        error,
                    });
                    continue;
                }
            };

            if config.slugs {
                slugs.extend(repos.into_iter().map(|r| r.full_name));
            } else {
                full.extend(enrich_all(&mut session, repos, &request).await?);
            }
        }

        let items = if config.slugs {
            Extracted::Slugs(slugs)
        } else {
            Extracted::Full(full)
        };

        tracing::info!(
            operation = "list_all_org_repositories",
            kept = items.len(),
            failed_orgs = failures.len(),
            "Listed repositories"
        );

        Ok(Listing {
            items,
            failures,
            rate_limit: session.into_rate_limit(),
        })
    }
}

async fn attach_members(session: &mut Session<'_>, result: &mut OrganizationResult) -> Result<()> {
    let login = result.organization.login.clone();
    match session.collect::<Member>(PageRequest::org_members(&login)).await {
        Ok(members) => result.members = Some(members),
        Err(e) => {
            let error: SubError = attach_or_propagate(e)?;
            tracing::warn!(
                org = %login,
                error = %error.error,
                "Failed to list organization members"
            );
            result.members = Some(Vec::new());
            result.member_error = Some(error);
        }
    }
    Ok(())
}
