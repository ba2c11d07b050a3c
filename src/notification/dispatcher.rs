//! Channel dispatcher - fans one notification out to every delivery channel

use crate::notification::channel::{ChannelOutcome, PlaybackSink, SmsSink};
use crate::notification::renderer::MediaAsset;
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

const PLAYBACK_MIME_TYPE: &str = "audio/mp3";

/// A single logical notification, ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub message: String,
}

impl NotificationRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Fans a notification out to all SMS recipients and the playback device.
///
/// Channels are independent sinks: every attempt is made regardless of how
/// its siblings fare, and the SMS batch runs concurrently with playback.
/// Outcomes come back labelled, recipients first (in configured order),
/// playback last.
pub struct ChannelDispatcher {
    sms: Arc<dyn SmsSink>,
    playback: Arc<dyn PlaybackSink>,
    recipients: Vec<String>,
    volume: f32,
    media_base_url: String,
}

impl ChannelDispatcher {
    pub fn new(
        sms: Arc<dyn SmsSink>,
        playback: Arc<dyn PlaybackSink>,
        recipients: Vec<String>,
        volume: f32,
        media_base_url: impl Into<String>,
    ) -> Self {
        Self {
            sms,
            playback,
            recipients,
            volume,
            media_base_url: media_base_url.into(),
        }
    }

    pub fn has_recipients(&self) -> bool {
        !self.recipients.is_empty()
    }

    /// Deliver `request` on every channel. `asset` is absent when rendering
    /// failed; that aborts only the playback channel.
    pub async fn dispatch(
        &self,
        request: &NotificationRequest,
        asset: Option<&MediaAsset>,
    ) -> Vec<(String, ChannelOutcome)> {
        let sms_batch = join_all(self.recipients.iter().map(|recipient| async move {
            let outcome = match self.sms.send(recipient, &request.message).await {
                Ok(_sid) => ChannelOutcome::Delivered,
                Err(e) => {
                    warn!(channel = "sms", recipient = %recipient, error = %e, "Channel send failed");
                    ChannelOutcome::Failed(e.to_string())
                }
            };
            (format!("sms:{}", recipient), outcome)
        }));

        let playback = async {
            let outcome = match asset {
                Some(asset) => match self.cast(asset).await {
                    Ok(()) => ChannelOutcome::Delivered,
                    Err(e) => {
                        warn!(channel = "playback", error = %e, "Channel send failed");
                        ChannelOutcome::Failed(e.to_string())
                    }
                },
                None => ChannelOutcome::Failed("no media asset available".to_string()),
            };
            ("playback".to_string(), outcome)
        };

        let (mut outcomes, playback_outcome) = tokio::join!(sms_batch, playback);
        outcomes.push(playback_outcome);
        outcomes
    }

    async fn cast(&self, asset: &MediaAsset) -> anyhow::Result<()> {
        self.playback.set_volume(self.volume).await?;
        let url = format!("{}{}", self.media_base_url, asset.url_path());
        self.playback.play_media(&url, PLAYBACK_MIME_TYPE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    /// SMS sink that fails for a chosen recipient and records every call
    struct MockSms {
        calls: Mutex<Vec<String>>,
        fail_for: Option<String>,
    }

    impl MockSms {
        fn new(fail_for: Option<&str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_for: fail_for.map(String::from),
            }
        }
    }

    #[async_trait]
    impl SmsSink for MockSms {
        async fn send(&self, recipient: &str, _body: &str) -> Result<String> {
            self.calls.lock().push(recipient.to_string());
            if self.fail_for.as_deref() == Some(recipient) {
                return Err(anyhow!("carrier rejected"));
            }
            Ok("SM123".to_string())
        }
    }

    struct MockPlayback {
        volume_calls: Mutex<Vec<f32>>,
        play_calls: Mutex<Vec<String>>,
    }

    impl MockPlayback {
        fn new() -> Self {
            Self {
                volume_calls: Mutex::new(Vec::new()),
                play_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlaybackSink for MockPlayback {
        async fn set_volume(&self, level: f32) -> Result<()> {
            self.volume_calls.lock().push(level);
            Ok(())
        }

        async fn play_media(&self, url: &str, _mime_type: &str) -> Result<()> {
            self.play_calls.lock().push(url.to_string());
            Ok(())
        }
    }

    fn asset() -> MediaAsset {
        MediaAsset {
            file_name: "default_notification.mp3".to_string(),
            path: PathBuf::from("/tmp/default_notification.mp3"),
        }
    }

    fn dispatcher(
        sms: Arc<MockSms>,
        playback: Arc<MockPlayback>,
        recipients: Vec<&str>,
    ) -> ChannelDispatcher {
        ChannelDispatcher::new(
            sms,
            playback,
            recipients.into_iter().map(String::from).collect(),
            0.7,
            "http://192.168.1.20:8080",
        )
    }

    #[tokio::test]
    async fn test_failed_recipient_does_not_block_siblings() {
        let sms = Arc::new(MockSms::new(Some("+15551230001")));
        let playback = Arc::new(MockPlayback::new());
        let dispatcher = dispatcher(sms.clone(), playback.clone(), vec!["+15551230001", "+15551230002"]);

        let request = NotificationRequest::new("Someone is at the door");
        let outcomes = dispatcher.dispatch(&request, Some(&asset())).await;

        assert_eq!(outcomes.len(), 3);
        // Recipient order is preserved; the failure comes first
        assert_eq!(outcomes[0].0, "sms:+15551230001");
        assert!(matches!(outcomes[0].1, ChannelOutcome::Failed(_)));
        assert_eq!(outcomes[1].0, "sms:+15551230002");
        assert_eq!(outcomes[1].1, ChannelOutcome::Delivered);
        // Playback was still attempted
        assert_eq!(outcomes[2].0, "playback");
        assert_eq!(outcomes[2].1, ChannelOutcome::Delivered);
        assert_eq!(playback.play_calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_volume_set_before_playback_with_media_url() {
        let sms = Arc::new(MockSms::new(None));
        let playback = Arc::new(MockPlayback::new());
        let dispatcher = dispatcher(sms, playback.clone(), vec![]);

        let request = NotificationRequest::new("Someone is at the door");
        let outcomes = dispatcher.dispatch(&request, Some(&asset())).await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(playback.volume_calls.lock().as_slice(), &[0.7]);
        assert_eq!(
            playback.play_calls.lock().as_slice(),
            &["http://192.168.1.20:8080/audio/default_notification.mp3".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_asset_fails_playback_only() {
        let sms = Arc::new(MockSms::new(None));
        let playback = Arc::new(MockPlayback::new());
        let dispatcher = dispatcher(sms.clone(), playback.clone(), vec!["+15551230001"]);

        let request = NotificationRequest::new("Someone is at the door");
        let outcomes = dispatcher.dispatch(&request, None).await;

        assert_eq!(outcomes[0].1, ChannelOutcome::Delivered);
        assert!(matches!(outcomes[1].1, ChannelOutcome::Failed(_)));
        // The device was never contacted without an asset
        assert!(playback.volume_calls.lock().is_empty());
        assert!(playback.play_calls.lock().is_empty());
    }
}
