//! Process-wide font registration.
//!
//! Fonts are loaded once per process, on the first [`ensure_fonts_ready`] call. Later calls
//! return the same registry and never reload, even if they pass a different configuration.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use sha2::Digest as _;

use crate::config::FontConfig;
use crate::text::measure::BUILTIN_FAMILY;

/// One font face loaded from disk.
#[derive(Clone)]
pub struct RegisteredFace {
    /// Family name reported by the font itself.
    pub family: String,
    /// File the face was loaded from.
    pub source: PathBuf,
    /// Raw font bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl RegisteredFace {
    /// Hex SHA-256 of the font bytes, for diagnostics.
    pub fn sha256_hex(&self) -> String {
        let digest = sha2::Sha256::digest(self.bytes.as_slice());
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            out.push_str(&format!("{:02x}", b));
        }
        out
    }
}

impl std::fmt::Debug for RegisteredFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredFace")
            .field("family", &self.family)
            .field("source", &self.source)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Immutable set of fonts available to measurers.
#[derive(Debug, Default)]
pub struct FontRegistry {
    faces: Vec<RegisteredFace>,
}

static REGISTRY: OnceLock<FontRegistry> = OnceLock::new();

/// Load the default font directories once and return the process registry.
pub fn ensure_fonts_ready() -> &'static FontRegistry {
    ensure_fonts_ready_with(&FontConfig::default())
}

/// Load fonts from `config` once and return the process registry.
///
/// Only the first call's configuration takes effect.
pub fn ensure_fonts_ready_with(config: &FontConfig) -> &'static FontRegistry {
    REGISTRY.get_or_init(|| {
        let registry = FontRegistry::load(&config.dirs);
        tracing::info!(
            faces = registry.faces.len(),
            families = ?registry.family_names(),
            "font registry ready"
        );
        registry
    })
}

/// Whether [`ensure_fonts_ready`] has completed in this process.
pub fn fonts_ready() -> bool {
    REGISTRY.get().is_some()
}

impl FontRegistry {
    /// Build a registry from font files found (non-recursively) in `dirs`.
    pub fn load(dirs: &[PathBuf]) -> Self {
        let mut font_ctx = None;
        let mut faces = Vec::new();
        for dir in dirs {
            load_fonts_from_dir(&mut font_ctx, dir, &mut faces);
        }
        Self { faces }
    }

    /// Build a registry from already-loaded faces.
    pub fn from_faces(faces: Vec<RegisteredFace>) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[RegisteredFace] {
        &self.faces
    }

    /// Registered family names, sorted and deduplicated.
    pub fn family_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.faces.iter().map(|f| f.family.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Whether `family` has at least one registered face (ASCII case-insensitive).
    pub fn has_family(&self, family: &str) -> bool {
        self.faces
            .iter()
            .any(|f| f.family.eq_ignore_ascii_case(family.trim()))
    }

    /// Whether `family` can be measured at all, by a registered face or the built-in table.
    pub fn can_measure(&self, family: &str) -> bool {
        self.has_family(family) || family.trim().eq_ignore_ascii_case(BUILTIN_FAMILY)
    }
}

fn load_fonts_from_dir(
    font_ctx: &mut Option<parley::FontContext>,
    dir: &Path,
    out: &mut Vec<RegisteredFace>,
) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font dir not readable, skipping");
        return;
    };

    let mut paths: Vec<PathBuf> = rd.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read font file");
                continue;
            }
        };

        let bytes = Arc::new(bytes);
        let font_ctx = font_ctx.get_or_insert_with(parley::FontContext::default);
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::<u8>::new(bytes.clone()), None);
        let Some(family) = families
            .first()
            .and_then(|(id, _)| font_ctx.collection.family_name(*id))
            .map(str::to_string)
        else {
            tracing::warn!(path = %path.display(), "font file has no usable family, skipping");
            continue;
        };

        out.push(RegisteredFace {
            family,
            source: path,
            bytes,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
