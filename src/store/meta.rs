use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::compile::compiler::{CompileInput, CompiledCaptionMeta, Compiler, check_stale};
use crate::foundation::error::CaptionResult;
use crate::text::measure::TextMeasurer;

/// Address of one compiled caption: a session and a beat within it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaKey {
    pub session_id: String,
    pub beat_index: u32,
}

impl MetaKey {
    pub fn new(session_id: impl Into<String>, beat_index: u32) -> Self {
        Self {
            session_id: session_id.into(),
            beat_index,
        }
    }
}

impl std::fmt::Display for MetaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.session_id, self.beat_index)
    }
}

/// Caller-owned persistence for compiled captions.
///
/// Implementations only store and return values; staleness is decided by [`load_or_compile`].
pub trait MetaStore: Send {
    fn get(&self, key: &MetaKey) -> CaptionResult<Option<CompiledCaptionMeta>>;
    fn put(&mut self, key: MetaKey, meta: CompiledCaptionMeta) -> CaptionResult<()>;
    fn remove(&mut self, key: &MetaKey) -> CaptionResult<Option<CompiledCaptionMeta>>;
}

/// In-memory store for tests and single-process callers.
#[derive(Debug, Default)]
pub struct InMemoryMetaStore {
    entries: HashMap<MetaKey, CompiledCaptionMeta>,
}

impl InMemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetaStore for InMemoryMetaStore {
    fn get(&self, key: &MetaKey) -> CaptionResult<Option<CompiledCaptionMeta>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: MetaKey, meta: CompiledCaptionMeta) -> CaptionResult<()> {
        self.entries.insert(key, meta);
        Ok(())
    }

    fn remove(&mut self, key: &MetaKey) -> CaptionResult<Option<CompiledCaptionMeta>> {
        Ok(self.entries.remove(key))
    }
}

/// Where a render-time meta came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetaSource {
    /// The stored meta matched a fresh compile and was used as-is.
    Stored,
    /// Nothing was stored; the fresh compile was stored.
    Compiled,
    /// The stored meta was stale and has been replaced.
    Replaced,
}

/// Render-time lookup: prefer the stored meta, but only if a fresh compile of the same inputs
/// agrees with it.
pub fn load_or_compile<S, M>(
    store: &mut S,
    key: &MetaKey,
    input: &CompileInput,
    compiler: &mut Compiler<M>,
) -> CaptionResult<(CompiledCaptionMeta, MetaSource)>
where
    S: MetaStore + ?Sized,
    M: TextMeasurer,
{
    let fresh = compiler.compile_input(input)?;
    let Some(stored) = store.get(key)? else {
        store.put(key.clone(), fresh.clone())?;
        return Ok((fresh, MetaSource::Compiled));
    };

    match check_stale(&stored, &fresh) {
        Ok(()) => Ok((stored, MetaSource::Stored)),
        Err(e) => {
            tracing::warn!(%key, code = e.code(), error = %e, "discarding stale compiled caption");
            store.remove(key)?;
            store.put(key.clone(), fresh.clone())?;
            Ok((fresh, MetaSource::Replaced))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/meta.rs"]
mod tests;
