use thiserror::Error;

/// Errors reported by the engine's processing entry point.
///
/// Protocol noise is never an error; only caller contract violations
/// surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The processing call did not supply one frame per channel.
    #[error("expected {expected} channel input frames, got {got}")]
    ChannelCountMismatch {
        /// Required frame count (always the channel count).
        expected: usize,
        /// Frame count actually supplied.
        got: usize,
    },
}
