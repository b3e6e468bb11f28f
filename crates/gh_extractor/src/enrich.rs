//! Per-repository enrichment.
//!
//! Each requested kind is one independent Pager run against a sub-resource of
//! the repository. Kinds run one after another in [`EnrichmentKind::ALL`]
//! order. A failed kind leaves its collection empty and records a
//! [`SubError`] on the repository; authentication and rate limit failures
//! abort instead.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{Result, SubError, attach_or_propagate};
use crate::github::types::{LanguagesPage, TopicsPage, WorkflowsPage};
use crate::github::{
    Branch, Contributor, PageRequest, Release, Repository, Session, Tag, Workflow,
};

/// Auxiliary data that can be attached to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentKind {
    Branches,
    Contributors,
    Languages,
    Releases,
    Tags,
    Topics,
    Workflows,
}

impl EnrichmentKind {
    pub const ALL: [EnrichmentKind; 7] = [
        Self::Branches,
        Self::Contributors,
        Self::Languages,
        Self::Releases,
        Self::Tags,
        Self::Topics,
        Self::Workflows,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Branches => "branches",
            Self::Contributors => "contributors",
            Self::Languages => "languages",
            Self::Releases => "releases",
            Self::Tags => "tags",
            Self::Topics => "topics",
            Self::Workflows => "workflows",
        }
    }

    /// List request for this kind on the repository `owner`/`repo`.
    pub fn request(self, owner: &str, repo: &str) -> PageRequest {
        let base = ["repos", owner, repo];
        match self {
            Self::Workflows => PageRequest::new(base.into_iter().chain(["actions", "workflows"])),
            kind => PageRequest::new(base.into_iter().chain([kind.as_str()])),
        }
    }
}

impl std::fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of kinds to fetch for each kept repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentRequest {
    kinds: BTreeSet<EnrichmentKind>,
}

impl EnrichmentRequest {
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Requested kinds in fetch order.
    pub fn kinds(&self) -> impl Iterator<Item = EnrichmentKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl FromIterator<EnrichmentKind> for EnrichmentRequest {
    fn from_iter<I: IntoIterator<Item = EnrichmentKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// Workflows grouped by their `state` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowsByState {
    pub active: Vec<Workflow>,
    pub deleted: Vec<Workflow>,
    pub disabled_fork: Vec<Workflow>,
    pub disabled_inactivity: Vec<Workflow>,
    pub disabled_manually: Vec<Workflow>,
    /// Missing or unrecognised state.
    pub unknown: Vec<Workflow>,
}

impl WorkflowsByState {
    pub fn push(&mut self, workflow: Workflow) {
        let state = workflow.state.as_deref().map(str::to_ascii_lowercase);
        let bucket = match state.as_deref() {
            Some("active") => &mut self.active,
            Some("deleted") => &mut self.deleted,
            Some("disabled_fork") => &mut self.disabled_fork,
            Some("disabled_inactivity") => &mut self.disabled_inactivity,
            Some("disabled_manually") => &mut self.disabled_manually,
            _ => &mut self.unknown,
        };
        bucket.push(workflow);
    }

    pub fn len(&self) -> usize {
        self.active.len()
            + self.deleted.len()
            + self.disabled_fork.len()
            + self.disabled_inactivity.len()
            + self.disabled_manually.len()
            + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Workflow> for WorkflowsByState {
    fn from_iter<I: IntoIterator<Item = Workflow>>(iter: I) -> Self {
        let mut grouped = Self::default();
        for workflow in iter {
            grouped.push(workflow);
        }
        grouped
    }
}

/// A repository with the requested sub-collections attached.
///
/// Kinds that were not requested are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRepository {
    #[serde(flatten)]
    pub repository: Repository,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<Branch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Contributor>>,
    /// Language names, most used first as reported by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub releases: Option<Vec<Release>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflows: Option<WorkflowsByState>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<EnrichmentKind, SubError>,
}

impl EnrichedRepository {
    /// Wrap a repository with nothing attached.
    pub fn bare(repository: Repository) -> Self {
        Self {
            repository,
            branches: None,
            contributors: None,
            languages: None,
            releases: None,
            tags: None,
            topics: None,
            workflows: None,
            errors: BTreeMap::new(),
        }
    }

    /// Store an empty collection for `kind`, used when its fetch failed.
    fn set_empty(&mut self, kind: EnrichmentKind) {
        match kind {
            EnrichmentKind::Branches => self.branches = Some(Vec::new()),
            EnrichmentKind::Contributors => self.contributors = Some(Vec::new()),
            EnrichmentKind::Languages => self.languages = Some(Vec::new()),
            EnrichmentKind::Releases => self.releases = Some(Vec::new()),
            EnrichmentKind::Tags => self.tags = Some(Vec::new()),
            EnrichmentKind::Topics => self.topics = Some(Vec::new()),
            EnrichmentKind::Workflows => self.workflows = Some(WorkflowsByState::default()),
        }
    }
}

/// Fetch one kind and store it on `target`.
async fn fetch_kind(
    session: &mut Session<'_>,
    target: &mut EnrichedRepository,
    kind: EnrichmentKind,
) -> Result<()> {
    let repository = &target.repository;
    let request = kind.request(&repository.owner.login, &repository.name);

    match kind {
        EnrichmentKind::Branches => target.branches = Some(session.collect(request).await?),
        EnrichmentKind::Contributors => {
            target.contributors = Some(session.collect(request).await?)
        }
        EnrichmentKind::Languages => {
            let pages: Vec<LanguagesPage> = session.collect(request).await?;
            let names = pages
                .into_iter()
                .flat_map(|languages| languages.into_iter().map(|(name, _bytes)| name));
            target.languages = Some(names.collect());
        }
        EnrichmentKind::Releases => target.releases = Some(session.collect(request).await?),
        EnrichmentKind::Tags => target.tags = Some(session.collect(request).await?),
        EnrichmentKind::Topics => {
            let pages: Vec<TopicsPage> = session.collect(request).await?;
            target.topics = Some(pages.into_iter().flat_map(|p| p.names).collect());
        }
        EnrichmentKind::Workflows => {
            let pages: Vec<WorkflowsPage> = session.collect(request).await?;
            target.workflows = Some(pages.into_iter().flat_map(|p| p.workflows).collect());
        }
    }

    Ok(())
}

/// Attach every requested kind to `repository`.
///
/// Only authentication and rate limit failures return `Err`.
pub async fn enrich(
    session: &mut Session<'_>,
    repository: Repository,
    request: &EnrichmentRequest,
) -> Result<EnrichedRepository> {
    let mut enriched = EnrichedRepository::bare(repository);

    for kind in request.kinds() {
        if let Err(e) = fetch_kind(session, &mut enriched, kind).await {
            let sub_error = attach_or_propagate(e)?;
            tracing::warn!(
                repository = %enriched.repository.full_name,
                kind = %kind,
                error = %sub_error.error,
                "Enrichment failed"
            );
            enriched.set_empty(kind);
            enriched.errors.insert(kind, sub_error);
        }
    }

    Ok(enriched)
}

/// Enrich each repository in order.
pub async fn enrich_all(
    session: &mut Session<'_>,
    repositories: Vec<Repository>,
    request: &EnrichmentRequest,
) -> Result<Vec<EnrichedRepository>> {
    let mut out = Vec::with_capacity(repositories.len());
    for repository in repositories {
        out.push(enrich(session, repository, request).await?);
    }
    Ok(out)
}
