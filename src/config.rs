use crate::encode::encoder::{AudioInputConfig, CodecPair, EncodeConfig};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MoonriseError, MoonriseResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Studio configuration.
///
/// JSON-loadable; every field is optional and falls back to the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Animation length (default 8000 ms).
    pub duration_ms: u64,
    /// Surface width in pixels (default 1280).
    pub width: u32,
    /// Surface height in pixels (default 720).
    pub height: u32,
    /// Frame tick and capture rate in frames per second (default 60).
    pub frame_rate: u32,
    /// Container and codecs used for recordings.
    pub codec: CodecPair,
    /// Slack after `duration_ms` before the watchdog forces finalization (default 120 ms).
    pub watchdog_grace_ms: u64,
    /// Background that encoded frames are flattened over (straight RGBA8).
    pub background_rgba: [u8; 4],
    /// Optional audio track input for recordings.
    pub audio: Option<AudioInputConfig>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            duration_ms: 8_000,
            width: 1280,
            height: 720,
            frame_rate: 60,
            codec: CodecPair::default(),
            watchdog_grace_ms: 120,
            background_rgba: [0, 0, 0, 255],
            audio: None,
        }
    }
}

impl StudioConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json_str(s: &str) -> MoonriseResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| MoonriseError::serde(format!("parse studio config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MoonriseResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MoonriseError::validation(format!("open studio config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| MoonriseError::serde(format!("parse studio config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> MoonriseResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MoonriseError::serde(e.to_string()))
    }

    /// Check every field for values the renderer or encoder cannot honor.
    pub fn validate(&self) -> MoonriseResult<()> {
        if self.duration_ms == 0 {
            return Err(MoonriseError::validation("duration_ms must be > 0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(MoonriseError::validation("width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(MoonriseError::validation("width/height must fit in u16"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(MoonriseError::validation(
                "width/height must be even (required for yuv420p output)",
            ));
        }
        if self.frame_rate == 0 {
            return Err(MoonriseError::validation("frame_rate must be > 0"));
        }
        if self.codec.container.is_empty() || self.codec.video.is_empty() {
            return Err(MoonriseError::validation(
                "codec container and video must be non-empty",
            ));
        }
        if let Some(audio) = self.audio.as_ref() {
            if self.codec.audio.is_empty() {
                return Err(MoonriseError::validation(
                    "codec audio must be set when an audio input is configured",
                ));
            }
            if audio.sample_rate == 0 || audio.channels == 0 {
                return Err(MoonriseError::validation(
                    "audio sample_rate/channels must be non-zero",
                ));
            }
        }
        Ok(())
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Frame rate as a rational.
    pub fn fps(&self) -> MoonriseResult<Fps> {
        Fps::new(self.frame_rate, 1)
    }

    /// Delay from recording start to the watchdog, in microseconds.
    pub fn watchdog_after_us(&self) -> u64 {
        self.duration_ms
            .saturating_add(self.watchdog_grace_ms)
            .saturating_mul(1_000)
    }

    /// Encoder configuration derived from this config.
    pub fn encode_config(&self) -> MoonriseResult<EncodeConfig> {
        Ok(EncodeConfig {
            width: self.width,
            height: self.height,
            fps: self.fps()?,
            codec: self.codec.clone(),
            bg_rgba: self.background_rgba,
            audio: self.audio.clone(),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
