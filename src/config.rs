use anyhow::{Context, Result};

/// Process-wide settings, read once at startup and passed into the
/// client constructor.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key for The Odds API. Never logged.
    pub api_key: String,
    /// Regions whose bookmakers are queried (us, us2, uk, au, eu)
    pub regions: Vec<String>,
    /// Jurisdiction code substituted for `{state}` in bookmaker links
    pub default_state: String,
}

impl Config {
    /// Read configuration from the environment. A missing API key is a
    /// startup failure for the enclosing process, not a per-call error.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("ODDS_API_KEY").context("ODDS_API_KEY environment variable not set")?;

        let regions = parse_regions(
            &std::env::var("ODDS_API_REGIONS").unwrap_or_else(|_| "us".to_string()),
        );

        let default_state =
            std::env::var("ODDS_API_DEFAULT_STATE").unwrap_or_else(|_| "nj".to_string());

        Ok(Self {
            api_key,
            regions,
            default_state,
        })
    }
}

fn parse_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}
