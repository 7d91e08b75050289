//! Error types for the orchestration core.

/// Top-level error type for the conversational orchestration core.
///
/// Provider failures inside the music resolution chain and the completion
/// pipeline are recovered internally (fallback providers, local responder)
/// and never surface through this type; these variants cover the failures
/// that genuinely have no local recovery.
#[derive(Debug, thiserror::Error)]
pub enum MuseError {
    /// Music provider transport or decode error.
    #[error("music error: {0}")]
    Music(String),

    /// Media playback device error.
    #[error("playback error: {0}")]
    Playback(String),

    /// Completion provider transport or decode error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MuseError>;
