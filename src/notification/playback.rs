//! Networked speaker playback channel
//!
//! Talks to the speaker through a small REST control surface (a cast
//! bridge such as catt's daemon or a Home Assistant media endpoint):
//! `POST /volume` with the level, then `POST /play` with the media URL.

use crate::notification::channel::PlaybackSink;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;

const PLAYBACK_TIMEOUT_SECS: u64 = 10;

/// Speaker device reachable at a configured control URL
pub struct SpeakerDevice {
    client: Client,
    base_url: String,
}

impl SpeakerDevice {
    pub fn new(device_url: &str) -> Result<Self> {
        if device_url.is_empty() {
            bail!("Playback device URL is required");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(PLAYBACK_TIMEOUT_SECS))
            .build()
            .context("Failed to create playback HTTP client")?;
        Ok(Self {
            client,
            base_url: device_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlaybackSink for SpeakerDevice {
    async fn set_volume(&self, level: f32) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/volume", self.base_url))
            .json(&json!({ "level": level }))
            .send()
            .await
            .context("Volume request failed")?;
        if !response.status().is_success() {
            bail!("Device rejected volume change: {}", response.status());
        }
        Ok(())
    }

    async fn play_media(&self, url: &str, mime_type: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/play", self.base_url))
            .json(&json!({ "url": url, "mime_type": mime_type }))
            .send()
            .await
            .context("Play request failed")?;
        if !response.status().is_success() {
            bail!("Device rejected playback: {}", response.status());
        }
        info!(url, "Playback dispatched to speaker");
        Ok(())
    }
}
