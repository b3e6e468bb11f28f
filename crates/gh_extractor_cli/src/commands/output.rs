//! Rendering of results to stdout.

use clap::ValueEnum;
use serde::Serialize;

use gh_extractor::{EnrichedRepository, Extracted, Listing, OrganizationResult};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Pretty-printed JSON (default)
    #[default]
    Json,
    /// One name per line, or a table for token information
    Text,
}

/// The name printed for an item in text mode.
pub(crate) trait Qualified {
    fn qualified_name(&self) -> &str;
}

impl Qualified for OrganizationResult {
    fn qualified_name(&self) -> &str {
        &self.organization.login
    }
}

impl Qualified for EnrichedRepository {
    fn qualified_name(&self) -> &str {
        &self.repository.full_name
    }
}

/// Render a listing's items. Per-organisation failures go to the log.
pub(crate) fn render_listing<T>(
    listing: &Listing<T>,
    format: OutputFormat,
) -> Result<String, serde_json::Error>
where
    T: Serialize + Qualified,
{
    for failure in &listing.failures {
        tracing::warn!(
            org = %failure.org,
            kind = %failure.error.error_type,
            "{}",
            failure.error.error
        );
    }
    if let Some(rate) = &listing.rate_limit {
        tracing::debug!(remaining = rate.remaining, limit = rate.limit, "Rate limit");
    }

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&listing.items),
        OutputFormat::Text => Ok(match &listing.items {
            Extracted::Slugs(slugs) => slugs.join("\n"),
            Extracted::Full(items) => items
                .iter()
                .map(Qualified::qualified_name)
                .collect::<Vec<_>>()
                .join("\n"),
        }),
    }
}
