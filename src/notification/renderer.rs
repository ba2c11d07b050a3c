//! Text-to-speech rendering and the message-keyed asset cache

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// File name of the pre-rendered default notification
pub const DEFAULT_NOTIFICATION_FILE: &str = "default_notification.mp3";

/// Custom messages kept around after delivery; oldest entry is evicted first
const CUSTOM_CACHE_CAPACITY: usize = 8;

const SYNTH_TIMEOUT_SECS: u64 = 10;

/// A rendered audio file, retrievable over HTTP at `url_path`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub file_name: String,
    pub path: PathBuf,
}

impl MediaAsset {
    /// Path under which the HTTP server exposes this asset.
    pub fn url_path(&self) -> String {
        format!("/audio/{}", self.file_name)
    }
}

/// Speech-synthesis backend boundary
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Synthesize `message` into an audio file named `file_name`.
    async fn synthesize(&self, message: &str, file_name: &str) -> Result<MediaAsset>;
}

/// Renders speech through the Google Translate TTS endpoint
pub struct TtsRenderer {
    client: Client,
    asset_dir: PathBuf,
    lang: String,
}

impl TtsRenderer {
    pub fn new(asset_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SYNTH_TIMEOUT_SECS))
            .build()
            .context("Failed to create TTS HTTP client")?;
        Ok(Self {
            client,
            asset_dir,
            lang: "en-uk".to_string(),
        })
    }
}

#[async_trait]
impl Renderer for TtsRenderer {
    async fn synthesize(&self, message: &str, file_name: &str) -> Result<MediaAsset> {
        let response = self
            .client
            .get("https://translate.google.com/translate_tts")
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", message),
            ])
            .send()
            .await
            .context("TTS backend unreachable")?;

        if !response.status().is_success() {
            bail!("TTS backend returned {}", response.status());
        }

        let bytes = response.bytes().await.context("Failed to read TTS response")?;
        tokio::fs::create_dir_all(&self.asset_dir)
            .await
            .with_context(|| format!("Failed to create asset dir {}", self.asset_dir.display()))?;
        let path = self.asset_dir.join(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(file = file_name, bytes = bytes.len(), "Rendered notification audio");
        Ok(MediaAsset {
            file_name: file_name.to_string(),
            path,
        })
    }
}

/// Message-keyed asset cache in front of a [`Renderer`].
///
/// The default message is rendered once at startup and its asset is held for
/// the life of the process. Custom messages are rendered on demand and kept
/// in a small bounded cache so a repeated custom message does not pay the
/// synthesis cost twice.
pub struct NotificationRenderer {
    backend: Arc<dyn Renderer>,
    default_message: String,
    default_asset: MediaAsset,
    custom: Mutex<VecDeque<(String, MediaAsset)>>,
}

impl NotificationRenderer {
    /// Render the default message up front and build the cache around it.
    pub async fn with_default(backend: Arc<dyn Renderer>, default_message: &str) -> Result<Self> {
        let default_asset = backend
            .synthesize(default_message, DEFAULT_NOTIFICATION_FILE)
            .await
            .context("Failed to render default notification")?;
        info!(file = %default_asset.file_name, "Default notification rendered");
        Ok(Self {
            backend,
            default_message: default_message.to_string(),
            default_asset,
            custom: Mutex::new(VecDeque::new()),
        })
    }

    /// Return the asset for `message`, synthesizing it if not cached.
    pub async fn render(&self, message: &str) -> Result<MediaAsset> {
        if message == self.default_message {
            return Ok(self.default_asset.clone());
        }

        if let Some(asset) = self.lookup_custom(message) {
            debug!("Custom notification served from cache");
            return Ok(asset);
        }

        let file_name = custom_file_name(message);
        let asset = self.backend.synthesize(message, &file_name).await?;

        let mut custom = self.custom.lock();
        if custom.len() >= CUSTOM_CACHE_CAPACITY {
            custom.pop_front();
        }
        custom.push_back((message.to_string(), asset.clone()));
        Ok(asset)
    }

    pub fn default_asset(&self) -> &MediaAsset {
        &self.default_asset
    }

    fn lookup_custom(&self, message: &str) -> Option<MediaAsset> {
        self.custom
            .lock()
            .iter()
            .find(|(cached, _)| cached == message)
            .map(|(_, asset)| asset.clone())
    }
}

fn custom_file_name(message: &str) -> String {
    let mut hasher = DefaultHasher::new();
    message.hash(&mut hasher);
    format!("custom_{:016x}.mp3", hasher.finish())
}
