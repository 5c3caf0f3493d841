//! Drive one call session from a JSON script against logging collaborators.
//!
//! Usage: `confcall-sim <script.json> [session-config.json]`

mod host;
mod script;

use std::path::PathBuf;
use std::sync::Arc;

use confcall_core::{CallSession, SessionConfig};
use thiserror::Error;

use crate::host::{EventLog, LoggingAudioSession, LoggingEngine, LoggingPlatform};
use crate::script::Script;

#[derive(Debug, Error)]
enum SimError {
    #[error("usage: confcall-sim <script.json> [session-config.json]")]
    Usage,
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] confcall_core::SessionError),
}

/// Initialize tracing once. `RUST_LOG` overrides the default filter.
fn init_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("confcall_core=debug,confcall_sim=info")
                }),
            )
            .with_writer(std::io::stderr)
            .init();
    });
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SimError> {
    let mut args = std::env::args_os().skip(1);
    let script_path = PathBuf::from(args.next().ok_or(SimError::Usage)?);
    let config = args
        .next()
        .map(|p| SessionConfig::load(&PathBuf::from(p)))
        .unwrap_or_default();

    let contents = std::fs::read_to_string(&script_path).map_err(|source| SimError::Io {
        path: script_path.clone(),
        source,
    })?;
    let script = Script::parse(&contents)?;

    let session = CallSession::activate(
        script.session.clone().into(),
        Arc::new(LoggingEngine::default()),
        Arc::new(LoggingPlatform::new(script.headset_plugged)),
        Arc::new(LoggingAudioSession),
        config,
    )?;
    session.add_listener(Arc::new(EventLog));

    for step in script.steps {
        script::run_step(&session, step).await;
    }

    let snapshot = session.snapshot();
    session.deactivate();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
