use crate::session::SessionState;
use importfix_engine::EngineError;
use std::time::Duration;
use thiserror::Error;

/// Result type for session and optimization operations
pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    /// The build console could not be started
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to build process: {0}")]
    Io(#[from] std::io::Error),

    /// Output ended before the expected marker
    #[error("build process closed its output while {0}")]
    ProcessExited(&'static str),

    #[error("no response from build process within {0:?}")]
    Timeout(Duration),

    #[error("cannot {action} while session is {state:?}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    /// Attempts exhausted without a clean compile
    #[error("could not resolve {import} after {attempts} attempts")]
    UnresolvedImport { import: String, attempts: usize },

    #[error("invalid diagnostic pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl SessionError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Per-import failure; the rest of the pass can go on.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedImport { .. })
    }
}
