//! Error type shared by the track, simulator, stores and driver.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChaseError {
    /// The key-value store failed to read, write or (de)serialize.
    #[error("storage error: {0}")]
    Storage(String),

    /// No saved snapshot exists, or the saved one is malformed.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid track: {0}")]
    InvalidTrack(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ChaseError>;
