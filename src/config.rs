use crate::error::{AppError, Result};

/// Uniswap V3 `Swap` event signature topic used to filter source logs.
pub const SWAP_EVENT_TOPIC: &str =
    "0xc42079f94a6350d7e6235f29174924f928cc2ac818eb64fed8004e115fbcca67";

/// How far back the source query reaches, in days.
pub const LOOKBACK_DAYS: u32 = 3;

/// Hard cap on rows fetched from the source per run.
pub const FETCH_ROW_CAP: usize = 100;

/// Newest swaps kept for the feed after classification.
pub const FEED_DISPLAY_CAP: usize = 20;

/// Swaps at the head of the feed that get a generated narrative. The rest of
/// the display set receives the fixed skip placeholder without a service call.
/// Always clamped to `feed_display_cap`.
pub const NARRATIVE_BUDGET: usize = 10;

/// Max gap between consecutive swaps from one sender that still counts as
/// high-frequency behavior (seconds).
pub const BOT_GAP_SECS: i64 = 300;

/// Feed refresh interval (seconds) — how often the pipeline re-runs.
pub const REFRESH_INTERVAL_SECS: u64 = 300;

/// Default narrative model.
pub const NARRATOR_MODEL: &str = "gemini-2.5-flash";

/// Default narrative service base URL.
pub const NARRATOR_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    /// Log-store endpoint serving swap rows (SOURCE_URL).
    pub source_url: String,
    /// Source project identifier (SOURCE_PROJECT).
    pub source_project: String,
    /// Path to the file holding the source bearer token (SOURCE_CREDENTIALS).
    pub source_credentials: String,
    pub narrator_api_url: String,
    pub narrator_api_key: String,
    pub narrator_model: String,
    pub log_level: String,
    pub api_port: u16,
    pub lookback_days: u32,
    pub fetch_row_cap: usize,
    pub feed_display_cap: usize,
    pub narrative_budget: usize,
    pub bot_gap_secs: i64,
    pub refresh_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let source_url = require_env("SOURCE_URL")?;
        let source_project = require_env("SOURCE_PROJECT")?;
        let source_credentials = require_env("SOURCE_CREDENTIALS")?;
        let narrator_api_key = resolve_narrator_key().ok_or_else(|| {
            AppError::Config(
                "narrator API key not found; set NARRATOR_API_KEY or NARRATOR_API_KEY_FILE"
                    .to_string(),
            )
        })?;

        let feed_display_cap = std::env::var("FEED_DISPLAY_CAP")
            .unwrap_or_else(|_| FEED_DISPLAY_CAP.to_string())
            .parse::<usize>()
            .unwrap_or(FEED_DISPLAY_CAP);
        let narrative_budget = std::env::var("NARRATIVE_BUDGET")
            .unwrap_or_else(|_| NARRATIVE_BUDGET.to_string())
            .parse::<usize>()
            .unwrap_or(NARRATIVE_BUDGET)
            .min(feed_display_cap);

        Ok(Self {
            source_url,
            source_project,
            source_credentials,
            narrator_api_key,
            narrator_api_url: std::env::var("NARRATOR_API_URL")
                .unwrap_or_else(|_| NARRATOR_API_URL.to_string()),
            narrator_model: std::env::var("NARRATOR_MODEL")
                .unwrap_or_else(|_| NARRATOR_MODEL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| {
                    AppError::Config("API_PORT must be a valid port number".to_string())
                })?,
            lookback_days: std::env::var("LOOKBACK_DAYS")
                .unwrap_or_else(|_| LOOKBACK_DAYS.to_string())
                .parse::<u32>()
                .unwrap_or(LOOKBACK_DAYS),
            fetch_row_cap: std::env::var("FETCH_ROW_CAP")
                .unwrap_or_else(|_| FETCH_ROW_CAP.to_string())
                .parse::<usize>()
                .unwrap_or(FETCH_ROW_CAP),
            feed_display_cap,
            narrative_budget,
            bot_gap_secs: std::env::var("BOT_GAP_SECS")
                .unwrap_or_else(|_| BOT_GAP_SECS.to_string())
                .parse::<i64>()
                .unwrap_or(BOT_GAP_SECS),
            refresh_interval_secs: std::env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| REFRESH_INTERVAL_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(REFRESH_INTERVAL_SECS),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("{name} must be set")))
}

// ---------------------------------------------------------------------------
// Narrator API key providers — ordered chain, first hit wins
// ---------------------------------------------------------------------------

/// Resolve the narrator API key by trying each provider in order.
pub fn resolve_narrator_key() -> Option<String> {
    const PROVIDERS: [fn() -> Option<String>; 2] = [key_from_env, key_from_secrets_file];
    PROVIDERS.iter().find_map(|provider| provider())
}

fn key_from_env() -> Option<String> {
    std::env::var("NARRATOR_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
}

/// Reads the key from the file named by NARRATOR_API_KEY_FILE, trimmed.
fn key_from_secrets_file() -> Option<String> {
    let path = std::env::var("NARRATOR_API_KEY_FILE").ok()?;
    let contents = std::fs::read_to_string(path).ok()?;
    let key = contents.trim().to_string();
    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations never race with each other.
    #[test]
    fn narrator_key_chain_prefers_env_then_file() {
        std::env::remove_var("NARRATOR_API_KEY");
        std::env::remove_var("NARRATOR_API_KEY_FILE");
        assert_eq!(resolve_narrator_key(), None);

        let path = std::env::temp_dir().join("swapfeed_key_chain_test");
        std::fs::write(&path, "file-key\n").unwrap();
        std::env::set_var("NARRATOR_API_KEY_FILE", &path);
        assert_eq!(resolve_narrator_key().as_deref(), Some("file-key"));

        std::env::set_var("NARRATOR_API_KEY", "env-key");
        assert_eq!(resolve_narrator_key().as_deref(), Some("env-key"));

        std::env::remove_var("NARRATOR_API_KEY");
        std::env::remove_var("NARRATOR_API_KEY_FILE");
        let _ = std::fs::remove_file(path);
    }
}
