use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::audio_route::AudioState;
use crate::config::SessionConfig;
use crate::engine::{AudioSession, AudioSessionOptions, JoinRequest, Platform, RtcEngine};
use crate::errors::SessionError;
use crate::events::{EngineEvent, ErrorSeverity, EventEmitter, SessionEvent, SessionEventListener};
use crate::roster::Roster;
use crate::swap::{SwapSequencer, UiState};
use crate::toggles::VideoState;

/// Session lifecycle. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Initializing,
    Joining,
    Active,
    Leaving,
    Destroyed,
}

/// Who is shown in the fullscreen overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Local,
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub channel_id: String,
    pub group_name: String,
    pub local_user_id: Option<String>,
}

/// Everything a render layer needs to draw the call screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub channel_id: String,
    pub group_name: String,
    pub local_user_id: Option<String>,
    pub roster: Vec<String>,
    pub selected: Selection,
    pub is_join_success: bool,
    pub audio: AudioState,
    pub video: VideoState,
    pub ui: UiState,
    pub active_speakers: Vec<String>,
    pub sdk_version: Option<String>,
    pub mounted: bool,
}

struct SessionState {
    params: SessionParams,
    phase: Phase,
    roster: Roster,
    selected: Selection,
    is_join_success: bool,
    audio: AudioState,
    video: VideoState,
    swap: SwapSequencer,
    active_speakers: Vec<String>,
    sdk_version: Option<String>,
    mounted: bool,
    event_loop: Option<JoinHandle<()>>,
}

impl SessionState {
    fn new(params: SessionParams) -> Self {
        Self {
            params,
            phase: Phase::Initializing,
            roster: Roster::new(),
            selected: Selection::Local,
            is_join_success: false,
            audio: AudioState::default(),
            video: VideoState::default(),
            swap: SwapSequencer::new(),
            active_speakers: Vec::new(),
            sdk_version: None,
            mounted: false,
            event_loop: None,
        }
    }

    fn advance(&mut self, phase: Phase, events: &mut Vec<SessionEvent>) {
        if phase > self.phase {
            tracing::info!("session phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            events.push(SessionEvent::PhaseChanged(phase));
        }
    }

    /// Mount guard for intents: rejects once teardown has begun.
    fn ensure_live(&self) -> Result<(), SessionError> {
        if !self.mounted {
            return Err(SessionError::NotMounted);
        }
        if self.phase >= Phase::Leaving {
            return Err(SessionError::SessionEnded);
        }
        Ok(())
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            channel_id: self.params.channel_id.clone(),
            group_name: self.params.group_name.clone(),
            local_user_id: self.params.local_user_id.clone(),
            roster: self.roster.participants().to_vec(),
            selected: self.selected.clone(),
            is_join_success: self.is_join_success,
            audio: self.audio,
            video: self.video,
            ui: self.swap.ui(),
            active_speakers: self.active_speakers.clone(),
            sdk_version: self.sdk_version.clone(),
            mounted: self.mounted,
        }
    }
}

struct Inner {
    state: Mutex<SessionState>,
    engine: Arc<dyn RtcEngine>,
    platform: Arc<dyn Platform>,
    audio_session: Arc<dyn AudioSession>,
    emitter: EventEmitter,
    config: SessionConfig,
    runtime: Handle,
}

/// Controller for one call session.
///
/// Activation happens at construction and deactivation on [`CallSession::deactivate`]
/// or drop, so a controller can never be activated twice. The engine handle is
/// owned exclusively for the lifetime of the controller.
pub struct CallSession {
    inner: Arc<Inner>,
}

impl CallSession {
    /// Activate a session: route audio, hook device and back navigation,
    /// subscribe to engine events and issue the join request.
    ///
    /// Must be called from within a tokio runtime; deferred work runs on it.
    pub fn activate(
        params: SessionParams,
        engine: Arc<dyn RtcEngine>,
        platform: Arc<dyn Platform>,
        audio_session: Arc<dyn AudioSession>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        if params.channel_id.trim().is_empty() {
            return Err(SessionError::InvalidParams("channel id is empty".into()));
        }

        let inner = Arc::new(Inner {
            state: Mutex::new(SessionState::new(params)),
            engine,
            platform,
            audio_session,
            emitter: EventEmitter::new(),
            config,
            runtime,
        });
        inner.start();
        Ok(Self { inner })
    }

    pub fn add_listener(&self, listener: Arc<dyn SessionEventListener>) {
        self.inner.emitter.add_listener(listener);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    /// Dispatch one engine event. Events also arrive through the engine
    /// subscription; both paths end here.
    pub fn handle_event(&self, event: EngineEvent) {
        self.inner.dispatch(event);
    }

    /// Headset plug notification from the device.
    pub fn on_headset_changed(&self, plugged: bool) -> Result<(), SessionError> {
        let mut state = self.inner.lock();
        state.ensure_live()?;
        state.audio.apply_headset(plugged, &*self.inner.engine);
        Ok(())
    }

    /// Show a remote participant fullscreen. Only roster members can be selected.
    pub fn select_participant(&self, uid: &str) -> Result<(), SessionError> {
        let ui = {
            let mut state = self.inner.lock();
            state.ensure_live()?;
            if !state.roster.contains(uid) {
                tracing::warn!("rejecting selection of unknown participant {uid}");
                return Err(SessionError::UnknownParticipant(uid.to_string()));
            }
            state.selected = Selection::Remote(uid.to_string());
            state.swap.select();
            state.swap.ui()
        };
        self.inner.emitter.emit_all(vec![
            SessionEvent::SelectionChanged(Selection::Remote(uid.to_string())),
            SessionEvent::UiChanged(ui),
        ]);
        Ok(())
    }

    /// Show the local preview fullscreen.
    pub fn select_local(&self) -> Result<(), SessionError> {
        let ui = {
            let mut state = self.inner.lock();
            state.ensure_live()?;
            state.selected = Selection::Local;
            state.swap.select();
            state.swap.ui()
        };
        self.inner.emitter.emit_all(vec![
            SessionEvent::SelectionChanged(Selection::Local),
            SessionEvent::UiChanged(ui),
        ]);
        Ok(())
    }

    /// Close the fullscreen overlay; the swap flag comes back after the revert delay.
    pub fn close_overlay(&self) -> Result<(), SessionError> {
        let ui = {
            let mut state = self.inner.lock();
            state.ensure_live()?;
            state.swap.begin_close();
            self.inner.schedule_revert(&mut state);
            state.swap.ui()
        };
        self.inner.emitter.emit(SessionEvent::UiChanged(ui));
        Ok(())
    }

    /// Leave the call and pop the call screen. Repeated calls are no-ops.
    pub fn cancel(&self) -> Result<(), SessionError> {
        let mut events = Vec::new();
        let torn_down = {
            let mut state = self.inner.lock();
            if !state.mounted {
                return Err(SessionError::NotMounted);
            }
            self.inner.teardown(&mut state, &mut events)
        };
        if torn_down {
            self.inner.platform.navigate_back();
        }
        self.inner.emitter.emit_all(events);
        Ok(())
    }

    /// Back-navigation hook. Returns true when the press was consumed so the
    /// platform skips its default action.
    pub fn handle_back_press(&self) -> bool {
        match self.cancel() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("back press ignored: {e}");
                false
            }
        }
    }

    pub fn switch_camera(&self) -> Result<(), SessionError> {
        let state = self.inner.lock();
        state.ensure_live()?;
        self.inner.engine.switch_camera();
        Ok(())
    }

    /// Returns the new muted state.
    pub fn toggle_local_mute(&self) -> Result<bool, SessionError> {
        let mut state = self.inner.lock();
        state.ensure_live()?;
        Ok(state.audio.toggle_local_mute(&*self.inner.engine))
    }

    pub fn toggle_all_remote_mute(&self) -> Result<bool, SessionError> {
        let mut state = self.inner.lock();
        state.ensure_live()?;
        Ok(state.audio.toggle_all_remote_mute(&*self.inner.engine))
    }

    pub fn toggle_speaker(&self) -> Result<bool, SessionError> {
        let mut state = self.inner.lock();
        state.ensure_live()?;
        Ok(state.audio.toggle_speaker(&*self.inner.engine))
    }

    pub fn toggle_camera_torch(&self) -> Result<bool, SessionError> {
        let mut state = self.inner.lock();
        state.ensure_live()?;
        Ok(state.video.toggle_torch(&*self.inner.engine))
    }

    /// Returns the new `disabled` state.
    pub fn toggle_video(&self) -> Result<bool, SessionError> {
        let mut state = self.inner.lock();
        state.ensure_live()?;
        Ok(state.video.toggle_video(&*self.inner.engine))
    }

    pub fn hide_buttons(&self) -> Result<(), SessionError> {
        let ui = {
            let mut state = self.inner.lock();
            state.ensure_live()?;
            state.swap.hide_buttons();
            state.swap.ui()
        };
        self.inner.emitter.emit(SessionEvent::UiChanged(ui));
        Ok(())
    }

    /// Detach from the engine and platform. Runs once; later calls and
    /// drop are no-ops.
    pub fn deactivate(&self) {
        self.inner.deactivate();
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        self.inner.deactivate();
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn start(self: &Arc<Self>) {
        let mut events = Vec::new();
        {
            let mut state = self.lock();
            self.engine.init(&self.config.engine);
            self.audio_session.start(&AudioSessionOptions::default());
            self.audio_session.set_keep_screen_on(true);

            state
                .audio
                .apply_headset(self.platform.headset_plugged(), &*self.engine);
            self.platform.register_headset_listener();
            self.platform.register_back_handler();
            state.mounted = true;

            let version = self.engine.sdk_version();
            tracing::info!("engine sdk version: {version}");
            state.sdk_version = Some(version);

            let stream = self.engine.subscribe();
            state.event_loop = Some(
                self.runtime
                    .spawn(Self::event_loop(Arc::downgrade(self), stream)),
            );

            let request = JoinRequest {
                channel_id: state.params.channel_id.clone(),
                group_name: state.params.group_name.clone(),
                local_uid: state.params.local_user_id.clone(),
                client_role: self.config.engine.client_role,
            };
            tracing::info!(
                "joining channel {} ({})",
                request.channel_id,
                request.group_name
            );
            self.engine.join_channel(&request);
            state.advance(Phase::Joining, &mut events);

            self.engine.enable_audio_volume_indication(
                self.config.volume_indication_interval_ms,
                self.config.volume_indication_smooth,
            );

            if state.params.local_user_id.is_none() {
                // No local identity: join audio-only.
                state.video.disabled = true;
                self.engine.disable_video();
            }
        }
        self.emitter.emit_all(events);
    }

    async fn event_loop(session: Weak<Inner>, mut events: UnboundedReceiver<EngineEvent>) {
        while let Some(event) = events.recv().await {
            let Some(inner) = session.upgrade() else {
                break;
            };
            inner.dispatch(event);
        }
        tracing::debug!("engine event stream closed");
    }

    fn dispatch(self: &Arc<Self>, event: EngineEvent) {
        let mut events = Vec::new();
        let torn_down = {
            let mut state = self.lock();
            if !state.mounted || state.phase >= Phase::Leaving {
                tracing::debug!("dropping engine event after teardown: {event:?}");
                return;
            }
            self.apply_event(&mut state, event, &mut events)
        };
        if torn_down {
            self.platform.navigate_back();
        }
        self.emitter.emit_all(events);
    }

    /// Returns true when the event ended the session.
    fn apply_event(
        self: &Arc<Self>,
        state: &mut SessionState,
        event: EngineEvent,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        match event {
            EngineEvent::JoinChannelSuccess { channel, uid, elapsed_ms } => {
                tracing::info!("joined channel {channel} as {uid} in {elapsed_ms}ms");
                state.is_join_success = true;
                state.advance(Phase::Active, events);
            }
            EngineEvent::FirstRemoteVideoDecoded { uid, width, height, .. } => {
                tracing::debug!("first video frame from {uid} ({width}x{height})");
                if state.roster.add(&uid) {
                    events.push(SessionEvent::ParticipantAdded(uid));
                }
                self.engine.start_preview();
                state.is_join_success = true;
                state.advance(Phase::Active, events);
            }
            EngineEvent::UserJoined { uid, .. } => {
                // Tiles appear on first decoded frame, not on join.
                tracing::debug!("user joined: {uid}");
            }
            EngineEvent::UserOffline { uid, reason } => {
                if !state.roster.remove(&uid) {
                    tracing::warn!("offline event for unknown participant {uid}");
                    return false;
                }
                tracing::info!("participant {uid} left ({reason:?})");
                events.push(SessionEvent::ParticipantRemoved(uid.clone()));
                state.active_speakers.retain(|s| *s != uid);

                if state.selected == Selection::Remote(uid) {
                    state.selected = Selection::Local;
                    state.swap.begin_close();
                    events.push(SessionEvent::SelectionChanged(Selection::Local));
                } else {
                    state.swap.begin_departure();
                }
                self.schedule_revert(state);
                events.push(SessionEvent::UiChanged(state.swap.ui()));
            }
            EngineEvent::AudioVolumeIndication { speakers, total_volume } => {
                let active: Vec<String> = speakers
                    .into_iter()
                    .filter(|s| s.volume > 0)
                    .map(|s| s.uid)
                    .collect();
                if active != state.active_speakers {
                    tracing::trace!("active speakers {active:?} (total volume {total_volume})");
                    state.active_speakers = active.clone();
                    events.push(SessionEvent::ActiveSpeakersChanged(active));
                }
            }
            EngineEvent::Error { code } => {
                let severity = self.config.classify_error(code);
                events.push(SessionEvent::EngineError { code, severity });
                match severity {
                    ErrorSeverity::Fatal => {
                        tracing::error!("fatal engine error {code}, leaving channel");
                        return self.teardown(state, events);
                    }
                    ErrorSeverity::Transient => {
                        tracing::warn!("engine error {code} ignored");
                    }
                }
            }
        }
        false
    }

    /// Leave and destroy the engine session. Returns false if teardown
    /// already happened.
    fn teardown(&self, state: &mut SessionState, events: &mut Vec<SessionEvent>) -> bool {
        if state.phase >= Phase::Leaving {
            return false;
        }
        state.advance(Phase::Leaving, events);
        state.swap.cancel_pending();
        self.engine.leave_channel();
        self.engine.destroy();
        state.advance(Phase::Destroyed, events);
        true
    }

    fn schedule_revert(self: &Arc<Self>, state: &mut SessionState) {
        let session = Arc::downgrade(self);
        state
            .swap
            .arm_revert(&self.runtime, self.config.revert_delay(), move || {
                if let Some(inner) = session.upgrade() {
                    inner.complete_revert();
                }
            });
    }

    fn complete_revert(&self) {
        let ui = {
            let mut state = self.lock();
            if !state.mounted || state.phase >= Phase::Leaving {
                tracing::debug!("swap revert skipped in phase {:?}", state.phase);
                return;
            }
            state.swap.complete_revert();
            state.swap.ui()
        };
        self.emitter.emit(SessionEvent::UiChanged(ui));
    }

    fn deactivate(&self) {
        let mut events = Vec::new();
        {
            let mut state = self.lock();
            if !state.mounted {
                return;
            }
            state.mounted = false;
            tracing::info!("deactivating session in phase {:?}", state.phase);

            self.engine.unsubscribe();
            if let Some(handle) = state.event_loop.take() {
                handle.abort();
            }
            state.swap.cancel_pending();
            self.audio_session.stop();
            self.platform.remove_back_handler();
            self.platform.remove_headset_listener();

            self.teardown(&mut state, &mut events);
            state.roster.clear();
            state.selected = Selection::Local;
            state.active_speakers.clear();
        }
        self.emitter.emit_all(events);
    }
}
