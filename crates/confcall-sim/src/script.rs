use std::time::Duration;

use confcall_core::{CallSession, EngineEvent, SessionParams};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptSession {
    pub channel_id: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub local_user_id: Option<String>,
}

impl From<ScriptSession> for SessionParams {
    fn from(s: ScriptSession) -> Self {
        Self {
            channel_id: s.channel_id,
            group_name: s.group_name,
            local_user_id: s.local_user_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Cancel,
    BackPress,
    SwitchCamera,
    ToggleLocalMute,
    ToggleAllRemoteMute,
    ToggleSpeaker,
    ToggleCameraTorch,
    ToggleVideo,
    HideButtons,
    CloseOverlay,
    SelectLocal,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Engine(EngineEvent),
    Headset { plugged: bool },
    Intent(Intent),
    Select { uid: String },
    Wait { ms: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub session: ScriptSession,
    #[serde(default)]
    pub headset_plugged: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub async fn run_step(session: &CallSession, step: Step) {
    tracing::debug!("step: {step:?}");
    let result = match step {
        Step::Engine(event) => {
            session.handle_event(event);
            Ok(())
        }
        Step::Headset { plugged } => session.on_headset_changed(plugged),
        Step::Select { uid } => session.select_participant(&uid),
        Step::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(())
        }
        Step::Intent(intent) => run_intent(session, intent),
    };
    if let Err(e) = result {
        tracing::warn!("step rejected: {e}");
    }
}

fn run_intent(session: &CallSession, intent: Intent) -> Result<(), confcall_core::SessionError> {
    match intent {
        Intent::Cancel => session.cancel(),
        Intent::BackPress => {
            let handled = session.handle_back_press();
            tracing::info!(handled, "back press");
            Ok(())
        }
        Intent::SwitchCamera => session.switch_camera(),
        Intent::ToggleLocalMute => session.toggle_local_mute().map(drop),
        Intent::ToggleAllRemoteMute => session.toggle_all_remote_mute().map(drop),
        Intent::ToggleSpeaker => session.toggle_speaker().map(drop),
        Intent::ToggleCameraTorch => session.toggle_camera_torch().map(drop),
        Intent::ToggleVideo => session.toggle_video().map(drop),
        Intent::HideButtons => session.hide_buttons(),
        Intent::CloseOverlay => session.close_overlay(),
        Intent::SelectLocal => session.select_local(),
    }
}
