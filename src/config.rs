//! Service configuration - loaded once at startup, read-only afterwards

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level config file layout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub doorbell: DoorbellConfig,
    pub twilio: TwilioConfig,
}

/// Doorbell service settings
#[derive(Debug, Clone, Deserialize)]
pub struct DoorbellConfig {
    /// Hostname the HTTP server binds to (also used to build media URLs)
    pub hostname: String,
    /// HTTP server port
    pub port: u16,
    /// BCM GPIO channel wired to the doorbell circuit
    pub gpio_channel: u32,
    /// Hardware debounce interval in milliseconds
    pub gpio_debounce_ms: u64,
    /// First hour of the awake window (0-23); before this, notifications are suppressed
    pub start_hour: u32,
    /// First hour past the awake window (0-23); from this hour on, notifications are suppressed
    pub end_hour: u32,
    /// Minimum interval between accepted notifications
    #[serde(default = "default_rate_limit_secs")]
    pub rate_limit_secs: i64,
    /// Default notification message
    pub notification_text: String,
    /// Speaker volume (0.0 - 1.0)
    pub volume: f32,
    /// SMS recipient phone numbers, in delivery order
    pub recipients: Vec<String>,
    /// Base URL of the playback device control endpoint
    pub device_url: String,
    /// Directory where rendered audio assets are written
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
}

/// Twilio SMS credentials
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_id: String,
    pub auth_token: String,
    pub phone_number: String,
}

fn default_rate_limit_secs() -> i64 {
    60
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

impl Config {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let d = &self.doorbell;
        if d.start_hour > 23 || d.end_hour > 23 {
            bail!(
                "Quiet-hours bounds must be 0-23 (got start_hour={}, end_hour={})",
                d.start_hour,
                d.end_hour
            );
        }
        if d.rate_limit_secs <= 0 {
            bail!("rate_limit_secs must be positive (got {})", d.rate_limit_secs);
        }
        if d.recipients.is_empty() {
            warn!("No SMS recipients configured; only speaker playback will be attempted");
        }
        Ok(())
    }
}
