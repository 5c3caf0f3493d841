use serde::{Deserialize, Serialize};

use crate::engine::RtcEngine;
use crate::toggles::{self, HardwareControl};

/// Audio flags of a session and the speaker/headset routing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AudioState {
    pub local_muted: bool,
    pub all_remote_muted: bool,
    pub speaker_enabled: bool,
    pub headset_plugged: bool,
}

impl AudioState {
    /// Route audio for a headset plug change: speaker only when unplugged.
    pub fn apply_headset(&mut self, plugged: bool, engine: &dyn RtcEngine) {
        self.headset_plugged = plugged;
        self.speaker_enabled = !plugged;
        engine.set_default_audio_route_to_speakerphone(self.speaker_enabled);
        tracing::info!(plugged, speaker = self.speaker_enabled, "audio route updated");
    }

    pub fn toggle_speaker(&mut self, engine: &dyn RtcEngine) -> bool {
        toggles::toggle(&mut self.speaker_enabled, HardwareControl::Speaker, engine)
    }

    pub fn toggle_local_mute(&mut self, engine: &dyn RtcEngine) -> bool {
        toggles::toggle(&mut self.local_muted, HardwareControl::LocalMute, engine)
    }

    pub fn toggle_all_remote_mute(&mut self, engine: &dyn RtcEngine) -> bool {
        toggles::toggle(&mut self.all_remote_muted, HardwareControl::AllRemoteMute, engine)
    }
}
