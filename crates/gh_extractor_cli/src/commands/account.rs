use chrono::{DateTime, Utc};
use serde::Serialize;

use gh_extractor::{ExtractConfig, Extractor, TokenInfo};

use super::output::OutputFormat;

/// Handle `user`.
pub(crate) async fn handle_user(
    extractor: &Extractor,
    config: &ExtractConfig,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = extractor.get_authenticated_user(config).await?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
        OutputFormat::Text => {
            println!("{}", profile.user.login);
            for (kind, items) in &profile.collections {
                println!("  {kind}: {}", items.len());
            }
            for (kind, error) in &profile.errors {
                tracing::warn!(kind = %kind, error = %error.error, "Profile list unavailable");
            }
        }
    }
    Ok(())
}

/// Handle `token-info`.
pub(crate) async fn handle_token_info(
    extractor: &Extractor,
    config: &ExtractConfig,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let info = extractor.get_token_information(config).await?;
    let display = TokenDisplay::new(&info, Utc::now());

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&display)?),
        OutputFormat::Text => {
            let mut table = tabled::Table::new(vec![display]);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
    }
    Ok(())
}

/// Token scopes and quota for display.
#[derive(Debug, Clone, Serialize, tabled::Tabled)]
pub(crate) struct TokenDisplay {
    #[tabled(rename = "Scopes")]
    pub scopes: String,
    #[tabled(rename = "Limit")]
    pub limit: String,
    #[tabled(rename = "Used")]
    pub used: String,
    #[tabled(rename = "Remaining")]
    pub remaining: String,
    #[tabled(rename = "Resets At")]
    pub reset_at: String,
    #[tabled(rename = "Resets In")]
    pub reset_in: String,
}

impl TokenDisplay {
    pub(crate) fn new(info: &TokenInfo, now: DateTime<Utc>) -> Self {
        let scopes = if info.scopes.is_empty() {
            "-".to_string()
        } else {
            info.scopes.join(", ")
        };

        let Some(rate) = &info.rate_limit else {
            let unknown = || "-".to_string();
            return Self {
                scopes,
                limit: unknown(),
                used: unknown(),
                remaining: unknown(),
                reset_at: unknown(),
                reset_in: unknown(),
            };
        };

        let seconds = rate.seconds_until_reset(now);
        let reset_in = if seconds > 0 {
            format_seconds(seconds)
        } else {
            "now".to_string()
        };

        Self {
            scopes,
            limit: rate.limit.to_string(),
            used: rate
                .used
                .unwrap_or_else(|| rate.limit.saturating_sub(rate.remaining))
                .to_string(),
            remaining: rate.remaining.to_string(),
            reset_at: rate.reset_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            reset_in,
        }
    }
}

/// Format seconds as a human-readable string.
fn format_seconds(total: i64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
