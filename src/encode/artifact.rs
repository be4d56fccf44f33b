use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::foundation::math::fnv1a64;
use std::path::Path;
use std::sync::Arc;

const URI_PREFIX: &str = "blob:moonrise/";

/// Immutable, finalized recording output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactHandle {
    uri: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl ArtifactHandle {
    /// Dereferenceable URI (`blob:moonrise/<serial>-<fnv64>`).
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// MIME type of the container.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Encoded container bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Return `true` when the artifact holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> MoonriseResult<()> {
        use anyhow::Context as _;

        let path = path.as_ref();
        ensure_parent_dir(path)?;
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("failed to write artifact to '{}'", path.display()))?;
        Ok(())
    }
}

/// Mints artifact handles and keeps at most one of them live.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    minted: u64,
    released: u64,
    live: Option<ArtifactHandle>,
}

impl ArtifactRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `bytes` in a new handle. Empty output is an encoder fault.
    pub fn mint(&mut self, mime: &str, bytes: Vec<u8>) -> MoonriseResult<ArtifactHandle> {
        if bytes.is_empty() {
            return Err(MoonriseError::encoder("encoder produced no output"));
        }
        self.minted += 1;
        let uri = format!("{URI_PREFIX}{}-{:016x}", self.minted, fnv1a64(&bytes));
        Ok(ArtifactHandle {
            uri,
            mime: mime.to_string(),
            bytes: Arc::from(bytes),
        })
    }

    /// Make `handle` the live artifact, releasing the previous one first.
    pub fn install(&mut self, handle: ArtifactHandle) {
        if let Some(prev) = self.live.take() {
            tracing::debug!(uri = prev.uri(), "releasing previous artifact");
            self.released += 1;
        }
        self.live = Some(handle);
    }

    /// Release the live artifact if its URI is `uri`.
    pub fn release(&mut self, uri: &str) -> bool {
        match self.live.as_ref() {
            Some(live) if live.uri == uri => {
                self.live = None;
                self.released += 1;
                true
            }
            _ => false,
        }
    }

    /// Look up a live artifact by URI; released URIs no longer resolve.
    pub fn resolve(&self, uri: &str) -> Option<ArtifactHandle> {
        self.live.as_ref().filter(|h| h.uri == uri).cloned()
    }

    /// The live artifact.
    pub fn live(&self) -> Option<&ArtifactHandle> {
        self.live.as_ref()
    }

    /// Number of live artifacts (0 or 1).
    pub fn live_count(&self) -> usize {
        usize::from(self.live.is_some())
    }

    /// Handles minted so far.
    pub fn minted(&self) -> u64 {
        self.minted
    }

    /// Handles released so far.
    pub fn releases(&self) -> u64 {
        self.released
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/artifact.rs"]
mod tests;
