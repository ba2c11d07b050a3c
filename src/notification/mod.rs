//! Multi-channel notification delivery: rendering, fan-out and coordination

pub mod channel;
pub mod coordinator;
pub mod dispatcher;
pub mod playback;
pub mod renderer;
pub mod sms;

pub use channel::{ChannelOutcome, PlaybackSink, SmsSink};
pub use coordinator::{NotificationCoordinator, Outcome};
pub use dispatcher::{ChannelDispatcher, NotificationRequest};
pub use playback::SpeakerDevice;
pub use renderer::{MediaAsset, NotificationRenderer, Renderer, TtsRenderer};
pub use sms::TwilioSms;
