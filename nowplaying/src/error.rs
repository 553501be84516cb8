use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while turning provider output into a [`crate::PlaybackSnapshot`].
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is absent or has the wrong primitive type.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// `device.volume_percent` fell outside 0..=100 under [`crate::VolumePolicy::Reject`].
    #[error("volume_percent {0} is outside 0..=100")]
    VolumeOutOfRange(f64),

    /// The input was not well-formed JSON text.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown volume policy `{0}`, expected `clamp` or `reject`")]
    UnknownPolicy(String),
}
