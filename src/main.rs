//! Doorbell server entry point

use anyhow::Result;
use clap::Parser;
use doorbell::notification::{
    ChannelDispatcher, NotificationCoordinator, NotificationRenderer, SpeakerDevice, TtsRenderer,
    TwilioSms,
};
use doorbell::server::{self, AppState};
use doorbell::trigger::{EdgeSource, SysfsEdgeSource, TriggerGate};
use doorbell::{Config, QuietHoursPolicy, RateLimiter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "doorbell")]
#[command(about = "Doorbell notification server - SMS and speaker playback on a GPIO trigger")]
#[command(version)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let doorbell = &config.doorbell;

    // Render the default message once so the common path never waits on TTS
    let tts = Arc::new(TtsRenderer::new(doorbell.asset_dir.clone())?);
    let renderer = NotificationRenderer::with_default(tts, &doorbell.notification_text).await?;

    let sms = Arc::new(TwilioSms::new(&config.twilio)?);
    let speaker = Arc::new(SpeakerDevice::new(&doorbell.device_url)?);
    let dispatcher = ChannelDispatcher::new(
        sms,
        speaker,
        doorbell.recipients.clone(),
        doorbell.volume,
        format!("http://{}:{}", doorbell.hostname, doorbell.port),
    );

    let coordinator = Arc::new(NotificationCoordinator::new(
        QuietHoursPolicy::new(doorbell.start_hour, doorbell.end_hour),
        RateLimiter::new(doorbell.rate_limit_secs),
        renderer,
        dispatcher,
    ));

    info!("GPIO initializing...");
    let source = SysfsEdgeSource::new(doorbell.gpio_channel, doorbell.gpio_debounce_ms);
    match source.subscribe().await {
        Ok(events) => {
            let gate = TriggerGate::new(coordinator.clone(), doorbell.notification_text.clone());
            tokio::spawn(async move { gate.run(events).await });
        }
        Err(e) => {
            // The HTTP trigger still works without the hardware path
            warn!(error = %e, "GPIO unavailable; hardware trigger disabled");
        }
    }

    let state = Arc::new(AppState {
        coordinator,
        default_message: doorbell.notification_text.clone(),
        asset_dir: doorbell.asset_dir.clone(),
    });
    server::serve(state, &doorbell.hostname, doorbell.port).await?;

    info!("All Done!");
    Ok(())
}
