//! Delivery sink trait boundaries and per-channel outcomes

use anyhow::Result;
use async_trait::async_trait;

/// Result of one delivery attempt on one channel
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOutcome {
    /// Delivery accepted by the sink
    Delivered,
    /// Delivery failed; siblings are unaffected
    Failed(String),
}

impl ChannelOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ChannelOutcome::Delivered)
    }
}

/// Outbound SMS delivery boundary
#[async_trait]
pub trait SmsSink: Send + Sync {
    /// Send `body` to a single recipient phone number, returning the
    /// provider's delivery id.
    async fn send(&self, recipient: &str, body: &str) -> Result<String>;
}

/// Networked speaker playback boundary
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    /// Set the output volume (0.0 - 1.0) before playback.
    async fn set_volume(&self, level: f32) -> Result<()>;

    /// Ask the device to fetch and play a media URL.
    async fn play_media(&self, url: &str, mime_type: &str) -> Result<()>;
}
