use crate::audio::backend::NodeId;
use crate::params::Parameter;
use thiserror::Error;

/// Player errors
///
/// None of these abort playback: callers degrade to clamped values,
/// unshaped audio or a static visualization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("Processing graph is not initialized")]
    GraphNotInitialized,

    #[error("Audio graph unavailable: {0}")]
    UnsupportedEnvironment(String),

    #[error("Invalid value {value} for {parameter}")]
    InvalidParameterValue { parameter: Parameter, value: f64 },

    #[error("Seek position {0} cannot be clamped to the track")]
    SeekOutOfRange(f64),

    #[error("Session has been torn down")]
    SessionEnded,

    #[error("Unknown audio node {0:?}")]
    UnknownNode(NodeId),

    #[error("Media engine error: {0}")]
    Media(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
