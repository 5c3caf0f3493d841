//! Toggle contract for hardware controls.
//!
//! Mute, speaker and torch controls flip their flag and pass the value being
//! transitioned away from to the engine. Local video is the exception and
//! passes the resulting enabled state; the two conventions follow the
//! engine's parameter semantics and are kept apart.

use serde::{Deserialize, Serialize};

use crate::engine::RtcEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareControl {
    LocalMute,
    AllRemoteMute,
    Speaker,
    CameraTorch,
}

impl HardwareControl {
    fn send(self, engine: &dyn RtcEngine, value: bool) {
        match self {
            Self::LocalMute => engine.mute_local_audio_stream(value),
            Self::AllRemoteMute => engine.mute_all_remote_audio_streams(value),
            Self::Speaker => engine.set_default_audio_route_to_speakerphone(value),
            Self::CameraTorch => engine.set_camera_torch_on(value),
        }
    }
}

/// Flip `flag` and issue exactly one engine call with the pre-toggle value.
/// Returns the new value.
pub fn toggle(flag: &mut bool, control: HardwareControl, engine: &dyn RtcEngine) -> bool {
    let previous = *flag;
    *flag = !previous;
    control.send(engine, previous);
    tracing::debug!(?control, previous, "hardware control toggled");
    *flag
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoState {
    pub disabled: bool,
    pub camera_torch_on: bool,
}

impl VideoState {
    /// Flip local video. The engine receives the post-toggle enabled value.
    pub fn toggle_video(&mut self, engine: &dyn RtcEngine) -> bool {
        self.disabled = !self.disabled;
        let enabled = !self.disabled;
        if enabled {
            engine.enable_video();
        } else {
            engine.disable_video();
        }
        engine.enable_local_video(enabled);
        tracing::debug!(enabled, "local video toggled");
        self.disabled
    }

    pub fn toggle_torch(&mut self, engine: &dyn RtcEngine) -> bool {
        toggle(&mut self.camera_torch_on, HardwareControl::CameraTorch, engine)
    }
}
