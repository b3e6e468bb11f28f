//! Include/exclude name filtering.
//!
//! Patterns are shell-style globs matched against the whole qualifying name,
//! case-sensitively. `*` matches any substring, including `/`, so `Alpha/*`
//! selects every repository owned by `Alpha`.
//!
//! Evaluation order is fixed:
//! 1. With a non-empty include set, a name matching no include pattern is dropped.
//! 2. A name matching any exclude pattern is dropped.
//! 3. Everything else is kept.
//!
//! Privacy is a separate AND condition, see [`FilterSpec::admits`].

use glob::{MatchOptions, Pattern};

use crate::config::ExtractConfig;
use crate::error::{ExtractorError, Result};
use crate::github::Repository;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct NamePattern {
    pattern: Pattern,
}

impl NamePattern {
    /// Compile `pattern`, failing with [`ExtractorError::InvalidPattern`].
    ///
    /// Runs of `*` are collapsed first: a single `*` already spans `/`, and
    /// `glob` would otherwise read `**` as a recursive path wildcard.
    pub fn new(pattern: &str) -> Result<Self> {
        Pattern::new(&collapse_stars(pattern))
            .map(|pattern| Self { pattern })
            .map_err(|e| ExtractorError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.msg.to_string(),
            })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.matches_with(name, MATCH_OPTIONS)
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if !(c == '*' && out.ends_with('*')) {
            out.push(c);
        }
    }
    out
}

fn compile(patterns: &[String]) -> Result<Vec<NamePattern>> {
    patterns.iter().map(|p| NamePattern::new(p)).collect()
}

/// Include and exclude pattern sets plus the privacy switch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub include: Vec<NamePattern>,
    pub exclude: Vec<NamePattern>,
    pub skip_private: bool,
}

impl FilterSpec {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
            skip_private: false,
        })
    }

    #[must_use]
    pub fn with_skip_private(mut self, skip_private: bool) -> Self {
        self.skip_private = skip_private;
        self
    }

    /// Whether `name` survives the include/exclude rules.
    pub fn matches(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(name)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches(name))
    }

    /// Name rules AND the privacy rule.
    pub fn admits(&self, name: &str, private: bool) -> bool {
        self.matches(name) && !(self.skip_private && private)
    }
}

/// Free-standing form of [`FilterSpec::matches`].
pub fn matches(name: &str, spec: &FilterSpec) -> bool {
    spec.matches(name)
}

/// Organisation filter built from `include_orgs` and `ignore_orgs`.
pub fn organization_filter(config: &ExtractConfig) -> Result<FilterSpec> {
    FilterSpec::new(&config.include_orgs, &config.ignore_orgs)
}

/// Repository filter: full-name rules, bare-name rules and privacy.
///
/// The privacy switch lives on `by_full_name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryFilter {
    pub by_full_name: FilterSpec,
    pub by_name: FilterSpec,
}

impl RepositoryFilter {
    /// Build from config.
    ///
    /// `privacy_applies` is false for org-scoped listings, where
    /// `skip_private` has no effect.
    pub fn from_config(config: &ExtractConfig, privacy_applies: bool) -> Result<Self> {
        Ok(Self {
            by_full_name: FilterSpec::new(&config.include_repos, &config.ignore_repos)?
                .with_skip_private(privacy_applies && config.skip_private),
            by_name: FilterSpec::new(&config.include_names, &config.ignore_names)?,
        })
    }

    pub fn keeps(&self, repo: &Repository) -> bool {
        self.by_full_name.admits(&repo.full_name, repo.private) && self.by_name.matches(&repo.name)
    }
}
