// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding the filter directive for optimiser logs.
pub const LOG_ENV: &str = "SPIRAL_COHERENCE_LOG";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Installs the global fmt subscriber.
///
/// The filter is read from [`LOG_ENV`], then `RUST_LOG`, then defaults to
/// `info`. The library itself never calls this; binaries and examples do.
pub fn init_tracing() -> Result<(), InitError> {
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let ansi = std::io::stdout().is_terminal();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi);
    Registry::default()
        .with(env_filter()?)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| InitError::Subscriber(err.to_string()))
}

fn env_filter() -> Result<EnvFilter, InitError> {
    match std::env::var(LOG_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            EnvFilter::try_new(raw.trim()).map_err(|err| InitError::Filter(err.to_string()))
        }
        Ok(_) | Err(std::env::VarError::NotPresent) => {
            Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        }
        Err(err) => Err(InitError::Env(err)),
    }
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    #[error("failed to read {LOG_ENV}: {0}")]
    Env(std::env::VarError),
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install subscriber: {0}")]
    Subscriber(String),
}
