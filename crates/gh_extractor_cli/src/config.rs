//! Settings for the `gh-extractor` binary.
//!
//! Later layers win: `~/.config/gh-extractor/config.toml`, then
//! `./gh-extractor.toml`, then `GH_EXTRACTOR_*` variables, then command-line
//! flags (applied by the commands themselves). `GITHUB_TOKEN` fills in the
//! token when none of those set one.
//!
//! ```toml
//! token = "ghp_..."
//! timeout = 10
//!
//! include_orgs = ["wolfsoftware", "wolf-*"]
//! ignore_repos = ["*/archive-*"]
//! skip_private = true
//!
//! get_topics = true
//! get_workflows = true
//! ```

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use gh_extractor::ExtractConfig;

/// Options whose environment value is a comma-separated pattern list.
const LIST_KEYS: [&str; 6] = [
    "include_orgs",
    "ignore_orgs",
    "include_repos",
    "ignore_repos",
    "include_names",
    "ignore_names",
];

/// Merge every layer into an [`ExtractConfig`].
///
/// A file that fails to parse is logged and the built-in defaults are used
/// instead, so a bad config never blocks flag-only invocations.
pub fn load() -> ExtractConfig {
    let files = default_config_path()
        .into_iter()
        .chain(Some(PathBuf::from("gh-extractor.toml")))
        .filter(|path| path.exists());

    let mut config = merge(files, environment()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable configuration");
        ExtractConfig::default()
    });

    if config.token().is_none() {
        config.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    }
    config
}

fn merge(
    files: impl IntoIterator<Item = PathBuf>,
    env: Environment,
) -> Result<ExtractConfig, ConfigError> {
    files
        .into_iter()
        .fold(Config::builder(), |builder, path| {
            tracing::debug!(path = %path.display(), "reading config file");
            builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
        })
        .add_source(env)
        .build()?
        .try_deserialize()
}

/// `GH_EXTRACTOR_*` variables, one flat key per option.
fn environment() -> Environment {
    LIST_KEYS.into_iter().fold(
        Environment::with_prefix("GH_EXTRACTOR")
            .try_parsing(true)
            .list_separator(","),
        Environment::with_list_parse_key,
    )
}

/// `config.toml` under the platform config directory for `gh-extractor`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gh-extractor").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        environment().source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    fn toml_layers(layers: &[&str]) -> Config {
        layers
            .iter()
            .fold(Config::builder(), |builder, text| {
                builder.add_source(File::from_str(text, FileFormat::Toml))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn nothing_configured_gives_defaults() {
        let config = merge(Vec::new(), env(&[])).unwrap();
        assert_eq!(config.timeout, 10);
        assert!(config.token.is_none());
        assert!(!config.skip_private);
    }

    #[test]
    fn toml_sets_filters_and_enrichment() {
        let config: ExtractConfig = toml_layers(&[r#"
            token = "ghp_abc"
            timeout = 30
            include_orgs = ["acme", "acme-*"]
            skip_private = true
            get_topics = true
        "#])
        .try_deserialize()
        .unwrap();

        assert_eq!(config.token(), Some("ghp_abc"));
        assert_eq!(config.timeout, 30);
        assert_eq!(config.include_orgs, vec!["acme", "acme-*"]);
        assert!(config.skip_private);
        assert!(config.get_topics);
        assert!(!config.get_branches);
    }

    #[test]
    fn later_file_overrides_only_what_it_sets() {
        let config: ExtractConfig = toml_layers(&["timeout = 30\nslugs = true", "timeout = 5"])
            .try_deserialize()
            .unwrap();
        assert_eq!(config.timeout, 5);
        assert!(config.slugs);
    }

    #[test]
    fn environment_lists_split_on_commas() {
        let config = merge(
            Vec::new(),
            env(&[
                ("GH_EXTRACTOR_IGNORE_REPOS", "a/*,b/*"),
                ("GH_EXTRACTOR_GET_TAGS", "true"),
                ("GH_EXTRACTOR_TIMEOUT", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(config.ignore_repos, vec!["a/*", "b/*"]);
        assert!(config.get_tags);
        assert_eq!(config.timeout, 3);
    }

    #[test]
    fn missing_files_are_skipped() {
        let config = merge(
            [PathBuf::from("/nonexistent/gh-extractor/config.toml")],
            env(&[]),
        )
        .unwrap();
        assert_eq!(config.timeout, 10);
    }
}
