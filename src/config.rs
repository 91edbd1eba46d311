//! Engine configuration.
//!
//! All sections have defaults, so an absent or partial config file is valid. Lookup order:
//! explicit path, `$CAPTION_LAYOUT_CONFIG`, `$XDG_CONFIG_HOME/caption-layout/config.json`
//! (or `~/.config/caption-layout/config.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compile::compiler::DEFAULT_MAX_LINES;
use crate::foundation::error::{CaptionError, CaptionResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CAPTION_LAYOUT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub limits: LimitsConfig,
    pub fonts: FontConfig,
    pub preview: PreviewConfig,
    pub parity: ParityConfig,
    pub logging: LoggingConfig,
}

/// Hard caps applied by compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LimitsConfig {
    /// Maximum number of wrapped lines before `TEXT_TOO_LONG`.
    pub max_lines: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

/// Which measurer compile uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureBackend {
    /// Built-in advance table. Identical in every runtime.
    #[default]
    Builtin,
    /// Shape with parley against registered font files.
    Fonts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontConfig {
    /// Directories scanned (non-recursively) for `.ttf`, `.otf` and `.ttc` files.
    pub dirs: Vec<PathBuf>,
    pub backend: MeasureBackend,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("fonts")],
            backend: MeasureBackend::Builtin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    /// Debounce window between the last edit and the compile round trip.
    pub debounce_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { debounce_ms: 350 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParityConfig {
    /// Allowed deviation for width and top, in device pixels.
    pub layout_tolerance_px: f64,
    /// Allowed deviation for font size and line height, in device pixels.
    pub typography_tolerance_px: f64,
}

impl Default for ParityConfig {
    fn default() -> Self {
        Self {
            layout_tolerance_px: 2.0,
            typography_tolerance_px: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. `info`, `caption_layout=debug,warn`). `RUST_LOG` wins when set.
    pub level: String,
    /// Emit structured JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load from the standard locations, falling back to defaults.
    pub fn load() -> Self {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match explicit.or_else(default_config_path) {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::default(),
        }
    }

    /// Load from `path`. Read, parse or validation failures log a warning and yield defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => return config,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
            }
        }
        Self::default()
    }

    /// Reject values no compile could run with.
    pub fn validate(&self) -> CaptionResult<()> {
        if self.limits.max_lines == 0 {
            return Err(CaptionError::serde("config 'limits.maxLines' must be >= 1"));
        }
        if !(self.parity.layout_tolerance_px >= 0.0 && self.parity.typography_tolerance_px >= 0.0)
        {
            return Err(CaptionError::serde("config parity tolerances must be >= 0"));
        }
        Ok(())
    }

    /// Load from an explicit path when given, else from the standard locations.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("caption-layout").join("config.json"))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
