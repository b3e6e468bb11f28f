use gh_extractor::{ExtractConfig, Extractor};

use super::args::{OrgFilterArgs, RepoListArgs};
use super::output::{OutputFormat, render_listing};

/// Handle `orgs`.
pub(crate) async fn handle_orgs(
    extractor: &Extractor,
    mut config: ExtractConfig,
    slugs: bool,
    members: bool,
    filter: &OrgFilterArgs,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    config.slugs |= slugs;
    config.get_members |= members;
    filter.apply(&mut config);

    let listing = extractor.list_organisations(&config).await?;
    println!("{}", render_listing(&listing, output)?);
    Ok(())
}

/// Handle `org-repos`.
pub(crate) async fn handle_org_repos(
    extractor: &Extractor,
    mut config: ExtractConfig,
    org: Option<String>,
    args: &RepoListArgs,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if org.is_some() {
        config.org_name = org;
    }
    args.apply(&mut config);

    let listing = extractor.list_repositories_by_org(&config).await?;
    println!("{}", render_listing(&listing, output)?);
    Ok(())
}

/// Handle `all-org-repos`.
pub(crate) async fn handle_all_org_repos(
    extractor: &Extractor,
    mut config: ExtractConfig,
    orgs: &OrgFilterArgs,
    args: &RepoListArgs,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    orgs.apply(&mut config);
    args.apply(&mut config);

    let listing = extractor.list_all_org_repositories(&config).await?;
    println!("{}", render_listing(&listing, output)?);
    Ok(())
}
