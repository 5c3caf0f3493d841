use std::sync::Mutex;

use confcall_core::engine::AudioSessionOptions;
use confcall_core::{
    AudioSession, EngineConfig, EngineEvent, JoinRequest, Platform, RtcEngine,
    SessionEvent, SessionEventListener,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Engine stand-in that logs every request. Events are injected by the script.
#[derive(Default)]
pub struct LoggingEngine {
    sender: Mutex<Option<UnboundedSender<EngineEvent>>>,
}

impl RtcEngine for LoggingEngine {
    fn init(&self, config: &EngineConfig) {
        tracing::info!(?config, "engine.init");
    }
    fn join_channel(&self, request: &JoinRequest) {
        tracing::info!(?request, "engine.join_channel");
    }
    fn leave_channel(&self) {
        tracing::info!("engine.leave_channel");
    }
    fn destroy(&self) {
        tracing::info!("engine.destroy");
    }
    fn sdk_version(&self) -> String {
        concat!("confcall-sim-", env!("CARGO_PKG_VERSION")).to_string()
    }
    fn enable_audio_volume_indication(&self, interval_ms: u32, smooth: u32) {
        tracing::info!(interval_ms, smooth, "engine.enable_audio_volume_indication");
    }
    fn start_preview(&self) {
        tracing::info!("engine.start_preview");
    }
    fn switch_camera(&self) {
        tracing::info!("engine.switch_camera");
    }
    fn mute_local_audio_stream(&self, muted: bool) {
        tracing::info!(muted, "engine.mute_local_audio_stream");
    }
    fn mute_all_remote_audio_streams(&self, muted: bool) {
        tracing::info!(muted, "engine.mute_all_remote_audio_streams");
    }
    fn set_default_audio_route_to_speakerphone(&self, speaker: bool) {
        tracing::info!(speaker, "engine.set_default_audio_route_to_speakerphone");
    }
    fn set_camera_torch_on(&self, on: bool) {
        tracing::info!(on, "engine.set_camera_torch_on");
    }
    fn enable_local_video(&self, enabled: bool) {
        tracing::info!(enabled, "engine.enable_local_video");
    }
    fn enable_video(&self) {
        tracing::info!("engine.enable_video");
    }
    fn disable_video(&self) {
        tracing::info!("engine.disable_video");
    }
    fn subscribe(&self) -> UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);
        rx
    }
    fn unsubscribe(&self) {
        self.sender.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}

pub struct LoggingPlatform {
    plugged: bool,
}

impl LoggingPlatform {
    pub fn new(plugged: bool) -> Self {
        Self { plugged }
    }
}

impl Platform for LoggingPlatform {
    fn headset_plugged(&self) -> bool {
        self.plugged
    }
    fn register_headset_listener(&self) {
        tracing::info!("platform: headset listener registered");
    }
    fn remove_headset_listener(&self) {
        tracing::info!("platform: headset listener removed");
    }
    fn register_back_handler(&self) {
        tracing::info!("platform: back handler registered");
    }
    fn remove_back_handler(&self) {
        tracing::info!("platform: back handler removed");
    }
    fn navigate_back(&self) {
        tracing::info!("platform: navigate back");
    }
}

pub struct LoggingAudioSession;

impl AudioSession for LoggingAudioSession {
    fn start(&self, options: &AudioSessionOptions) {
        tracing::info!(?options, "audio session started");
    }
    fn set_keep_screen_on(&self, on: bool) {
        tracing::info!(on, "audio session keep screen on");
    }
    fn stop(&self) {
        tracing::info!("audio session stopped");
    }
}

/// Mirrors session events into the log, as a render layer would consume them.
pub struct EventLog;

impl SessionEventListener for EventLog {
    fn on_event(&self, event: SessionEvent) {
        tracing::info!("session event: {event:?}");
    }
}
