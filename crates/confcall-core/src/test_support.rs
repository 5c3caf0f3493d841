//! Recording doubles for the collaborator traits.

use std::sync::Mutex;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::engine::{
    AudioSession, AudioSessionOptions, EngineConfig, JoinRequest, Platform, RtcEngine,
};
use crate::events::EngineEvent;

/// Engine calls recorded by [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Init(EngineConfig),
    Join(JoinRequest),
    Leave,
    Destroy,
    SdkVersion,
    VolumeIndication(u32, u32),
    StartPreview,
    SwitchCamera,
    MuteLocal(bool),
    MuteAllRemote(bool),
    SpeakerRoute(bool),
    Torch(bool),
    EnableLocalVideo(bool),
    EnableVideo,
    DisableVideo,
    Subscribe,
    Unsubscribe,
}

#[derive(Default)]
pub(crate) struct RecordingEngine {
    calls: Mutex<Vec<Call>>,
    sender: Mutex<Option<UnboundedSender<EngineEvent>>>,
}

impl RecordingEngine {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Push an event through the subscription channel.
    pub(crate) fn fire(&self, event: EngineEvent) {
        if let Some(tx) = self.sender.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RtcEngine for RecordingEngine {
    fn init(&self, config: &EngineConfig) {
        self.record(Call::Init(config.clone()));
    }
    fn join_channel(&self, request: &JoinRequest) {
        self.record(Call::Join(request.clone()));
    }
    fn leave_channel(&self) {
        self.record(Call::Leave);
    }
    fn destroy(&self) {
        self.record(Call::Destroy);
    }
    fn sdk_version(&self) -> String {
        self.record(Call::SdkVersion);
        "sdk-1.2.3.5".to_string()
    }
    fn enable_audio_volume_indication(&self, interval_ms: u32, smooth: u32) {
        self.record(Call::VolumeIndication(interval_ms, smooth));
    }
    fn start_preview(&self) {
        self.record(Call::StartPreview);
    }
    fn switch_camera(&self) {
        self.record(Call::SwitchCamera);
    }
    fn mute_local_audio_stream(&self, muted: bool) {
        self.record(Call::MuteLocal(muted));
    }
    fn mute_all_remote_audio_streams(&self, muted: bool) {
        self.record(Call::MuteAllRemote(muted));
    }
    fn set_default_audio_route_to_speakerphone(&self, speaker: bool) {
        self.record(Call::SpeakerRoute(speaker));
    }
    fn set_camera_torch_on(&self, on: bool) {
        self.record(Call::Torch(on));
    }
    fn enable_local_video(&self, enabled: bool) {
        self.record(Call::EnableLocalVideo(enabled));
    }
    fn enable_video(&self) {
        self.record(Call::EnableVideo);
    }
    fn disable_video(&self) {
        self.record(Call::DisableVideo);
    }
    fn subscribe(&self) -> UnboundedReceiver<EngineEvent> {
        self.record(Call::Subscribe);
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().unwrap() = Some(tx);
        rx
    }
    fn unsubscribe(&self) {
        self.record(Call::Unsubscribe);
        self.sender.lock().unwrap().take();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlatformCall {
    RegisterHeadset,
    RemoveHeadset,
    RegisterBack,
    RemoveBack,
    NavigateBack,
}

#[derive(Default)]
pub(crate) struct RecordingPlatform {
    pub(crate) plugged: bool,
    calls: Mutex<Vec<PlatformCall>>,
}

impl RecordingPlatform {
    pub(crate) fn with_headset(plugged: bool) -> Self {
        Self { plugged, calls: Mutex::new(Vec::new()) }
    }

    pub(crate) fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: &PlatformCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Platform for RecordingPlatform {
    fn headset_plugged(&self) -> bool {
        self.plugged
    }
    fn register_headset_listener(&self) {
        self.record(PlatformCall::RegisterHeadset);
    }
    fn remove_headset_listener(&self) {
        self.record(PlatformCall::RemoveHeadset);
    }
    fn register_back_handler(&self) {
        self.record(PlatformCall::RegisterBack);
    }
    fn remove_back_handler(&self) {
        self.record(PlatformCall::RemoveBack);
    }
    fn navigate_back(&self) {
        self.record(PlatformCall::NavigateBack);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AudioSessionCall {
    Start(AudioSessionOptions),
    KeepScreenOn(bool),
    Stop,
}

#[derive(Default)]
pub(crate) struct RecordingAudioSession {
    calls: Mutex<Vec<AudioSessionCall>>,
}

impl RecordingAudioSession {
    pub(crate) fn calls(&self) -> Vec<AudioSessionCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl AudioSession for RecordingAudioSession {
    fn start(&self, options: &AudioSessionOptions) {
        self.calls.lock().unwrap().push(AudioSessionCall::Start(options.clone()));
    }
    fn set_keep_screen_on(&self, on: bool) {
        self.calls.lock().unwrap().push(AudioSessionCall::KeepScreenOn(on));
    }
    fn stop(&self) {
        self.calls.lock().unwrap().push(AudioSessionCall::Stop);
    }
}
