//! Doorbell - Raspberry Pi doorbell notification server
//!
//! Reacts to a GPIO circuit state change (or an HTTP request) and fans a
//! notification out over SMS and networked speaker playback, with
//! quiet-hours suppression and rate limiting in front of delivery.

pub mod config;
pub mod notification;
pub mod quiet_hours;
pub mod rate_limit;
pub mod server;
pub mod trigger;

pub use config::{Config, DoorbellConfig, TwilioConfig};
pub use notification::{
    ChannelDispatcher, ChannelOutcome, MediaAsset, NotificationCoordinator, NotificationRenderer,
    NotificationRequest, Outcome, PlaybackSink, Renderer, SmsSink, SpeakerDevice, TtsRenderer,
    TwilioSms,
};
pub use quiet_hours::QuietHoursPolicy;
pub use rate_limit::RateLimiter;
pub use trigger::{EdgeEvent, EdgeSource, SysfsEdgeSource, TriggerGate};
