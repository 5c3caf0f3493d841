//! Boundary traits for the collaborators the session drives.
//!
//! Every call is a fire-and-forget request: effects are observed later
//! through [`EngineEvent`]s, never through return values. Implementations
//! must not call back into the session synchronously.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::events::EngineEvent;

/// Engine initialization parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default = "default_channel_profile")]
    pub channel_profile: u32,
    #[serde(default = "default_video_profile")]
    pub video_profile: u32,
    #[serde(default = "default_client_role")]
    pub client_role: u32,
    #[serde(default = "default_true")]
    pub swap_width_and_height: bool,
}

fn default_channel_profile() -> u32 {
    1
}

fn default_video_profile() -> u32 {
    40
}

fn default_client_role() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            channel_profile: default_channel_profile(),
            video_profile: default_video_profile(),
            client_role: default_client_role(),
            swap_width_and_height: true,
        }
    }
}

/// Channel join request issued once per activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub channel_id: String,
    pub group_name: String,
    /// `None` lets the engine assign an id.
    pub local_uid: Option<String>,
    pub client_role: u32,
}

pub trait RtcEngine: Send + Sync {
    fn init(&self, config: &EngineConfig);
    fn join_channel(&self, request: &JoinRequest);
    fn leave_channel(&self);
    fn destroy(&self);
    fn sdk_version(&self) -> String;
    fn enable_audio_volume_indication(&self, interval_ms: u32, smooth: u32);
    fn start_preview(&self);
    fn switch_camera(&self);
    fn mute_local_audio_stream(&self, muted: bool);
    fn mute_all_remote_audio_streams(&self, muted: bool);
    fn set_default_audio_route_to_speakerphone(&self, speaker: bool);
    fn set_camera_torch_on(&self, on: bool);
    fn enable_local_video(&self, enabled: bool);
    fn enable_video(&self);
    fn disable_video(&self);
    /// Start delivering engine events. The stream ends after `unsubscribe`.
    fn subscribe(&self) -> UnboundedReceiver<EngineEvent>;
    fn unsubscribe(&self);
}

/// Device and navigation hooks owned by the host platform.
pub trait Platform: Send + Sync {
    /// Current wired-headset state.
    fn headset_plugged(&self) -> bool;
    fn register_headset_listener(&self);
    fn remove_headset_listener(&self);
    fn register_back_handler(&self);
    fn remove_back_handler(&self);
    /// Pop the call screen off the navigation stack.
    fn navigate_back(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMedia {
    Audio,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSessionOptions {
    pub media: AudioMedia,
    pub auto: bool,
    pub ringback: String,
}

impl Default for AudioSessionOptions {
    fn default() -> Self {
        Self {
            media: AudioMedia::Audio,
            auto: true,
            ringback: String::new(),
        }
    }
}

/// Platform audio session (proximity, screen wake, audio focus).
pub trait AudioSession: Send + Sync {
    fn start(&self, options: &AudioSessionOptions);
    fn set_keep_screen_on(&self, on: bool);
    fn stop(&self);
}
