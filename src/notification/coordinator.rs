//! Notification coordinator - single entry point for every trigger path

use crate::notification::channel::ChannelOutcome;
use crate::notification::dispatcher::{ChannelDispatcher, NotificationRequest};
use crate::notification::renderer::NotificationRenderer;
use crate::quiet_hours::QuietHoursPolicy;
use crate::rate_limit::RateLimiter;
use chrono::{DateTime, Local, Utc};
use tracing::{info, warn};

/// Structured result of one `notify` call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Quiet hours are in effect; nothing was rendered or delivered
    Suppressed,
    /// A notification was accepted too recently
    Throttled,
    /// Delivery ran; per-channel results in dispatch order
    Completed(Vec<(String, ChannelOutcome)>),
    /// Rendering failed and no other channel could proceed
    RenderFailed(String),
}

/// Ties policy, rate limiting, rendering and dispatch together.
///
/// Both the hardware edge path and the HTTP path call [`notify`] on a shared
/// instance; the rate limiter serializes their race on the send window.
/// Checks run in a fixed order - quiet hours, rate limit, render, dispatch -
/// and a suppressed request never consumes the rate-limit window.
///
/// [`notify`]: NotificationCoordinator::notify
pub struct NotificationCoordinator {
    quiet_hours: QuietHoursPolicy,
    rate_limiter: RateLimiter,
    renderer: NotificationRenderer,
    dispatcher: ChannelDispatcher,
}

impl NotificationCoordinator {
    pub fn new(
        quiet_hours: QuietHoursPolicy,
        rate_limiter: RateLimiter,
        renderer: NotificationRenderer,
        dispatcher: ChannelDispatcher,
    ) -> Self {
        Self {
            quiet_hours,
            rate_limiter,
            renderer,
            dispatcher,
        }
    }

    /// Dispatch a notification now.
    pub async fn notify(&self, request: NotificationRequest) -> Outcome {
        self.notify_at(request, Local::now(), Utc::now()).await
    }

    /// Dispatch with explicit clocks. `local_now` drives the quiet-hours
    /// check, `now` the rate limiter.
    pub async fn notify_at(
        &self,
        request: NotificationRequest,
        local_now: DateTime<Local>,
        now: DateTime<Utc>,
    ) -> Outcome {
        if !self.quiet_hours.is_allowed(local_now) {
            info!("Let the humans sleep...");
            return Outcome::Suppressed;
        }

        if !self.rate_limiter.try_acquire(now) {
            info!("Take it easy, friendo!");
            return Outcome::Throttled;
        }

        let asset = match self.renderer.render(&request.message).await {
            Ok(asset) => Some(asset),
            Err(e) => {
                warn!(error = %e, "Notification rendering failed");
                if !self.dispatcher.has_recipients() {
                    return Outcome::RenderFailed(e.to_string());
                }
                // SMS can still go out without audio
                None
            }
        };

        let outcomes = self.dispatcher.dispatch(&request, asset.as_ref()).await;
        info!(
            delivered = outcomes.iter().filter(|(_, o)| o.is_delivered()).count(),
            channels = outcomes.len(),
            "Notification sent"
        );
        Outcome::Completed(outcomes)
    }
}
