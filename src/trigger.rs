//! Hardware trigger path - edge events, the source boundary and the gate

use crate::notification::coordinator::{NotificationCoordinator, Outcome};
use crate::notification::dispatcher::NotificationRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A debounced transition of the doorbell circuit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEvent {
    /// BCM channel number
    pub channel: u32,
    /// true = circuit closed ("on"), false = circuit open ("off")
    pub state: bool,
}

/// Edge-detection boundary. Implementations watch one GPIO channel and
/// deliver debounced transitions on the returned receiver; the gate makes
/// no assumption about which task or thread produces them.
#[async_trait]
pub trait EdgeSource: Send + Sync {
    async fn subscribe(&self) -> Result<mpsc::Receiver<EdgeEvent>>;
}

/// Polls the sysfs GPIO value file and emits an event on every change.
/// The poll period doubles as the debounce interval: a burst of bounces
/// inside one period collapses into a single observed transition.
pub struct SysfsEdgeSource {
    channel: u32,
    debounce: Duration,
}

impl SysfsEdgeSource {
    pub fn new(channel: u32, debounce_ms: u64) -> Self {
        Self {
            channel,
            debounce: Duration::from_millis(debounce_ms),
        }
    }

    fn value_path(&self) -> PathBuf {
        PathBuf::from(format!("/sys/class/gpio/gpio{}/value", self.channel))
    }
}

#[async_trait]
impl EdgeSource for SysfsEdgeSource {
    async fn subscribe(&self) -> Result<mpsc::Receiver<EdgeEvent>> {
        let path = self.value_path();
        // Fail subscription up front if the pin was never exported
        tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("GPIO channel {} not available at {}", self.channel, path.display()))?;

        let channel = self.channel;
        let debounce = self.debounce;
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(debounce);
            let mut last_state: Option<bool> = None;
            loop {
                ticker.tick().await;
                let raw = match tokio::fs::read_to_string(&path).await {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(channel, error = %e, "Failed to read GPIO value");
                        continue;
                    }
                };
                let state = raw.trim() == "1";
                if last_state.is_some() && last_state != Some(state) {
                    if tx.send(EdgeEvent { channel, state }).await.is_err() {
                        debug!(channel, "Edge receiver dropped; stopping GPIO poll");
                        break;
                    }
                }
                last_state = Some(state);
            }
        });

        Ok(rx)
    }
}

/// Consumes raw edge events and converts accepted ones into notifications.
///
/// Only the "off" transition (the momentary circuit opening after a press)
/// counts as a doorbell press; "on" transitions are logged and dropped.
/// The gate never deduplicates - a glitch delivering two "off" edges in
/// quick succession is collapsed by the rate limiter downstream.
pub struct TriggerGate {
    coordinator: Arc<NotificationCoordinator>,
    default_message: String,
}

impl TriggerGate {
    pub fn new(coordinator: Arc<NotificationCoordinator>, default_message: impl Into<String>) -> Self {
        Self {
            coordinator,
            default_message: default_message.into(),
        }
    }

    /// Handle one edge event, returning the notify outcome when the edge
    /// was accepted as a press.
    pub async fn on_edge(&self, event: EdgeEvent) -> Option<Outcome> {
        info!(
            channel = event.channel,
            state = if event.state { "on" } else { "off" },
            "Circuit state changed"
        );
        if event.state {
            return None;
        }

        info!("Ding-dong! Notifying");
        let request = NotificationRequest::new(self.default_message.clone());
        Some(self.coordinator.notify(request).await)
    }

    /// Drain events until the source closes.
    pub async fn run(&self, mut events: mpsc::Receiver<EdgeEvent>) {
        while let Some(event) = events.recv().await {
            if let Some(outcome) = self.on_edge(event).await {
                debug!(?outcome, "Hardware trigger handled");
            }
        }
        info!("Edge source closed; hardware trigger loop exiting");
    }
}
