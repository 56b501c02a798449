use thiserror::Error;

/// Errors surfaced by pipeline and hardware backend operations.
///
/// None of these ever propagate into a producer callback; producer-reachable
/// paths report status through return values instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("hardware channel failure: {0}")]
    Hardware(String),

    #[error("hardware operation timed out")]
    Timeout,

    #[error("codec failure: {0}")]
    Codec(String),

    #[error("session conflict: {0}")]
    SessionConflict(String),

    #[error("worker spawn failed: {0}")]
    SpawnFailed(String),

    #[error("worker did not acknowledge stop in time")]
    StopTimeout,
}
