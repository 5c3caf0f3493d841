use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::session::{Phase, Selection};
use crate::swap::UiState;

/// Events delivered by the real-time engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    JoinChannelSuccess {
        channel: String,
        uid: String,
        #[serde(default)]
        elapsed_ms: u32,
    },
    FirstRemoteVideoDecoded {
        uid: String,
        #[serde(default)]
        width: u32,
        #[serde(default)]
        height: u32,
        #[serde(default)]
        elapsed_ms: u32,
    },
    UserJoined {
        uid: String,
        #[serde(default)]
        elapsed_ms: u32,
    },
    UserOffline {
        uid: String,
        #[serde(default)]
        reason: OfflineReason,
    },
    AudioVolumeIndication {
        speakers: Vec<SpeakerVolume>,
        #[serde(default)]
        total_volume: u32,
    },
    Error {
        code: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineReason {
    #[default]
    Quit,
    Dropped,
    BecomeAudience,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerVolume {
    pub uid: String,
    pub volume: u32,
}

/// How an engine error code affects the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Session-ending; triggers the same teardown as a user cancel.
    Fatal,
    Transient,
}

/// Events emitted by the session to render-layer listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged(Phase),
    ParticipantAdded(String),
    ParticipantRemoved(String),
    SelectionChanged(Selection),
    ActiveSpeakersChanged(Vec<String>),
    EngineError { code: i32, severity: ErrorSeverity },
    UiChanged(UiState),
}

/// Trait for receiving events from the session.
/// Implementations must be Send + Sync (timer callbacks run on tokio tasks).
pub trait SessionEventListener: Send + Sync {
    fn on_event(&self, event: SessionEvent);
}

/// Fan-out of session events to registered listeners.
#[derive(Clone, Default)]
pub struct EventEmitter {
    listeners: Arc<RwLock<Vec<Arc<dyn SessionEventListener>>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn SessionEventListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    pub fn emit(&self, event: SessionEvent) {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        for listener in listeners.iter() {
            listener.on_event(event.clone());
        }
    }

    pub fn emit_all(&self, events: Vec<SessionEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}
