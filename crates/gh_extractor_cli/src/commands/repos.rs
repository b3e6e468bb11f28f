use gh_extractor::{ExtractConfig, Extractor};

use super::args::RepoListArgs;
use super::output::{OutputFormat, render_listing};

/// Handle `user-repos`.
pub(crate) async fn handle_user_repos(
    extractor: &Extractor,
    mut config: ExtractConfig,
    username: Option<String>,
    args: &RepoListArgs,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if username.is_some() {
        config.username = username;
    }
    args.apply(&mut config);

    let listing = extractor.list_user_repositories(&config).await?;
    println!("{}", render_listing(&listing, output)?);
    Ok(())
}

/// Handle `visible-repos`.
pub(crate) async fn handle_visible_repos(
    extractor: &Extractor,
    mut config: ExtractConfig,
    args: &RepoListArgs,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    args.apply(&mut config);

    let listing = extractor.list_all_visible_repositories(&config).await?;
    println!("{}", render_listing(&listing, output)?);
    Ok(())
}
