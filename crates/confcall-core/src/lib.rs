//! Call session core.
//!
//! Pure Rust crate with no platform dependencies. The host supplies the
//! real-time engine, the device/platform hooks and the audio session
//! through the traits in [`engine`]; render layers read [`SessionSnapshot`]s
//! and subscribe to [`SessionEvent`]s.

pub mod audio_route;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod roster;
pub mod session;
pub mod swap;
pub mod toggles;

#[cfg(test)]
mod test_support;

pub use config::SessionConfig;
pub use engine::{AudioSession, EngineConfig, JoinRequest, Platform, RtcEngine};
pub use errors::SessionError;
pub use events::{EngineEvent, SessionEvent, SessionEventListener};
pub use session::{CallSession, Phase, Selection, SessionParams, SessionSnapshot};
