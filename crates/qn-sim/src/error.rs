use qn_core::CoreError;
use qn_network::NetworkError;
use thiserror::Error;

use crate::EngineState;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// An operation was attempted in an engine state that forbids it.
    #[error("cannot {operation} while the engine is {state}")]
    InvalidState {
        operation: &'static str,
        state:     EngineState,
    },

    /// The topology is well-formed JSON but describes an unusable network.
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// A topology edge or generator names a node that was never declared.
    #[error("topology references unknown node '{0}'")]
    UnknownNode(String),

    #[error("topology JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
