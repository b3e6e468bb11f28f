//! gh-extractor CLI - list GitHub organisations and repositories.

mod commands;
mod config;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gh_extractor::{ExtractConfig, Extractor};
use tracing_subscriber::EnvFilter;

use crate::commands::args::{OrgFilterArgs, ProfileArgs, RepoListArgs};
use crate::commands::output::OutputFormat;

#[derive(Parser)]
#[command(name = "gh-extractor")]
#[command(version)]
#[command(about = "List GitHub organisations and repositories with filtering and enrichment")]
#[command(after_long_help = r#"EXAMPLES
    List the organisations you belong to:
        $ gh-extractor orgs --slugs

    List every repository of one organisation with its topics:
        $ gh-extractor org-repos --org rust-lang --topics

    List your public repositories, skipping archives:
        $ gh-extractor user-repos --skip-private --ignore-name 'archive-*'

CONFIGURATION
    gh-extractor reads configuration from:
      1. ~/.config/gh-extractor/config.toml (or $XDG_CONFIG_HOME/gh-extractor/config.toml)
      2. ./gh-extractor.toml
      3. Environment variables (GH_EXTRACTOR_* prefix, e.g., GH_EXTRACTOR_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GH_EXTRACTOR_TOKEN        GitHub personal access token
    GITHUB_TOKEN              Used when no other token is configured
    GH_EXTRACTOR_API_URL      API root for GitHub Enterprise (default: https://api.github.com)
    RUST_LOG                  Log filter (default: gh_extractor=info,gh_extractor_cli=info)
"#)]
struct Cli {
    /// GitHub token (overrides config and environment)
    #[arg(short, long, global = true)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// API root, for GitHub Enterprise
    #[arg(long, global = true, env = "GH_EXTRACTOR_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the organisations you belong to
    Orgs {
        /// Print logins only
        #[arg(short, long)]
        slugs: bool,

        /// Attach each organisation's members
        #[arg(long)]
        members: bool,

        #[command(flatten)]
        filter: OrgFilterArgs,
    },
    /// List a user's repositories (you, unless --username is given)
    UserRepos {
        /// User whose public repositories to list; no token needed
        #[arg(short, long)]
        username: Option<String>,

        #[command(flatten)]
        args: RepoListArgs,
    },
    /// List one organisation's repositories
    OrgRepos {
        /// Organisation login
        #[arg(long)]
        org: Option<String>,

        #[command(flatten)]
        args: RepoListArgs,
    },
    /// List repositories across all your organisations
    AllOrgRepos {
        #[command(flatten)]
        orgs: OrgFilterArgs,

        #[command(flatten)]
        args: RepoListArgs,
    },
    /// List every repository your token can see
    VisibleRepos {
        #[command(flatten)]
        args: RepoListArgs,
    },
    /// Show the user the token belongs to
    User {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Show the token's scopes and rate limit
    TokenInfo,
}

impl Cli {
    fn apply(&self, config: &mut ExtractConfig) {
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config::load();
    cli.apply(&mut config);

    let extractor = match cli.api_url.as_deref() {
        Some(url) => Extractor::for_api_base(url)?,
        None => Extractor::new()?,
    };
    let output = cli.output;

    match cli.command {
        Commands::Orgs {
            slugs,
            members,
            filter,
        } => {
            commands::orgs::handle_orgs(&extractor, config, slugs, members, &filter, output)
                .await?;
        }
        Commands::UserRepos { username, args } => {
            commands::repos::handle_user_repos(&extractor, config, username, &args, output)
                .await?;
        }
        Commands::OrgRepos { org, args } => {
            commands::orgs::handle_org_repos(&extractor, config, org, &args, output).await?;
        }
        Commands::AllOrgRepos { orgs, args } => {
            commands::orgs::handle_all_org_repos(&extractor, config, &orgs, &args, output)
                .await?;
        }
        Commands::VisibleRepos { args } => {
            commands::repos::handle_visible_repos(&extractor, config, &args, output).await?;
        }
        Commands::User { profile } => {
            profile.apply(&mut config);
            commands::account::handle_user(&extractor, &config, output).await?;
        }
        Commands::TokenInfo => {
            commands::account::handle_token_info(&extractor, &config, output).await?;
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only results
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("gh_extractor=info,gh_extractor_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = e.to_string();
            eprintln!("error: {}", message.lines().next().unwrap_or(&message));
            ExitCode::FAILURE
        }
    }
}
