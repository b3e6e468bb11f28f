//! Flag groups shared by several commands.

use gh_extractor::ExtractConfig;

/// Organisation filter and expansion flags.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct OrgFilterArgs {
    /// Only keep organisations matching this glob (repeatable)
    #[arg(long = "include-org", value_name = "PATTERN")]
    pub include_orgs: Vec<String>,

    /// Drop organisations matching this glob (repeatable)
    #[arg(long = "ignore-org", value_name = "PATTERN")]
    pub ignore_orgs: Vec<String>,
}

impl OrgFilterArgs {
    pub(crate) fn apply(&self, config: &mut ExtractConfig) {
        if !self.include_orgs.is_empty() {
            config.include_orgs = self.include_orgs.clone();
        }
        if !self.ignore_orgs.is_empty() {
            config.ignore_orgs = self.ignore_orgs.clone();
        }
    }
}

/// Repository filter flags.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct RepoFilterArgs {
    /// Only keep repositories whose owner/name matches this glob (repeatable)
    #[arg(long = "include-repo", value_name = "PATTERN")]
    pub include_repos: Vec<String>,

    /// Drop repositories whose owner/name matches this glob (repeatable)
    #[arg(long = "ignore-repo", value_name = "PATTERN")]
    pub ignore_repos: Vec<String>,

    /// Only keep repositories whose bare name matches this glob (repeatable)
    #[arg(long = "include-name", value_name = "PATTERN")]
    pub include_names: Vec<String>,

    /// Drop repositories whose bare name matches this glob (repeatable)
    #[arg(long = "ignore-name", value_name = "PATTERN")]
    pub ignore_names: Vec<String>,

    /// Drop private repositories (user and visible listings only)
    #[arg(long)]
    pub skip_private: bool,
}

impl RepoFilterArgs {
    pub(crate) fn apply(&self, config: &mut ExtractConfig) {
        let overrides = [
            (&self.include_repos, &mut config.include_repos),
            (&self.ignore_repos, &mut config.ignore_repos),
            (&self.include_names, &mut config.include_names),
            (&self.ignore_names, &mut config.ignore_names),
        ];
        for (flag, target) in overrides {
            if !flag.is_empty() {
                *target = flag.clone();
            }
        }
        config.skip_private |= self.skip_private;
    }
}

/// Enrichment flags.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct EnrichArgs {
    /// Attach branches
    #[arg(long)]
    pub branches: bool,
    /// Attach contributors
    #[arg(long)]
    pub contributors: bool,
    /// Attach language names
    #[arg(long)]
    pub languages: bool,
    /// Attach releases
    #[arg(long)]
    pub releases: bool,
    /// Attach tags
    #[arg(long)]
    pub tags: bool,
    /// Attach topics
    #[arg(long)]
    pub topics: bool,
    /// Attach workflows grouped by state
    #[arg(long)]
    pub workflows: bool,
}

impl EnrichArgs {
    pub(crate) fn apply(&self, config: &mut ExtractConfig) {
        config.get_branches |= self.branches;
        config.get_contributors |= self.contributors;
        config.get_languages |= self.languages;
        config.get_releases |= self.releases;
        config.get_tags |= self.tags;
        config.get_topics |= self.topics;
        config.get_workflows |= self.workflows;
    }
}

/// Collections to attach to the authenticated user.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct ProfileArgs {
    /// Attach email addresses
    #[arg(long)]
    pub emails: bool,
    /// Attach followers
    #[arg(long)]
    pub followers: bool,
    /// Attach the users you follow
    #[arg(long)]
    pub following: bool,
    /// Attach GPG keys
    #[arg(long)]
    pub gpg_keys: bool,
    /// Attach SSH keys
    #[arg(long)]
    pub ssh_keys: bool,
    /// Attach your repositories
    #[arg(long)]
    pub repos: bool,
    /// Attach starred repositories
    #[arg(long)]
    pub starred: bool,
    /// Attach watched repositories
    #[arg(long)]
    pub subscriptions: bool,
}

impl ProfileArgs {
    pub(crate) fn apply(&self, config: &mut ExtractConfig) {
        config.get_emails |= self.emails;
        config.get_followers |= self.followers;
        config.get_following |= self.following;
        config.get_gpg_keys |= self.gpg_keys;
        config.get_ssh_keys |= self.ssh_keys;
        config.get_repos |= self.repos;
        config.get_starred_repos |= self.starred;
        config.get_subscriptions |= self.subscriptions;
    }
}

/// Everything a repository listing accepts.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct RepoListArgs {
    /// Print owner/name only; skips enrichment
    #[arg(short, long)]
    pub slugs: bool,

    #[command(flatten)]
    pub filter: RepoFilterArgs,

    #[command(flatten)]
    pub enrich: EnrichArgs,
}

impl RepoListArgs {
    pub(crate) fn apply(&self, config: &mut ExtractConfig) {
        config.slugs |= self.slugs;
        self.filter.apply(config);
        self.enrich.apply(config);
    }
}
