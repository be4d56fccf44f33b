/// Convenience result type used across moonrise.
pub type MoonriseResult<T> = Result<T, MoonriseError>;

/// Top-level error taxonomy used by the renderer, the capture pipeline and the studio.
#[derive(thiserror::Error, Debug)]
pub enum MoonriseError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// The host offers no stream-encoding capability for the requested codec pair.
    ///
    /// Recoverable: the studio falls back to a plain playback run.
    #[error("encoding unsupported: {0}")]
    EncodingUnsupported(String),

    /// The encoder failed while recording or finalizing. Partial output is discarded.
    #[error("encoder fault: {0}")]
    EncoderFault(String),

    /// An event addressed a run that a newer command already superseded.
    ///
    /// Internal only; never surfaced as a notification.
    #[error("stale run {run} cancelled")]
    StaleRunCancelled {
        /// Run id carried by the stale event.
        run: u64,
    },

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MoonriseError {
    /// Build a [`MoonriseError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MoonriseError::EncodingUnsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::EncodingUnsupported(msg.into())
    }

    /// Build a [`MoonriseError::EncoderFault`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::EncoderFault(msg.into())
    }

    /// Build a [`MoonriseError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that only reflect a superseded run.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleRunCancelled { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
