//! Unified error types surfaced by the runtime API.

use circuit_core::{CharacterId, CircuitError, ErrorSeverity, GameError, SessionError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load content")]
    Content(#[source] anyhow::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Circuit(#[from] CircuitError),

    #[error("card '{0}' is not in the catalog")]
    UnknownCard(String),

    #[error("no enemy template named '{0}'")]
    UnknownEnemy(String),

    #[error("character {0} has no circuit board")]
    NoCircuitBoard(CharacterId),

    #[error("snapshot i/o failed")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed")]
    Encoding(#[from] serde_json::Error),

    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Content(_) => ErrorSeverity::Fatal,
            Self::Session(error) => error.severity(),
            Self::Circuit(error) => error.severity(),
            Self::UnknownCard(_) | Self::UnknownEnemy(_) | Self::NoCircuitBoard(_) => {
                ErrorSeverity::Validation
            }
            Self::Io(_) => ErrorSeverity::Recoverable,
            Self::Encoding(_) | Self::Telemetry(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::Session(error) => error.error_code(),
            Self::Circuit(error) => error.error_code(),
            Self::UnknownCard(_) => "RUNTIME_UNKNOWN_CARD",
            Self::UnknownEnemy(_) => "RUNTIME_UNKNOWN_ENEMY",
            Self::NoCircuitBoard(_) => "RUNTIME_NO_CIRCUIT_BOARD",
            Self::Io(_) => "RUNTIME_IO",
            Self::Encoding(_) => "RUNTIME_ENCODING",
            Self::Telemetry(_) => "RUNTIME_TELEMETRY",
        }
    }
}
