use rayon::prelude::*;

use crate::compile::compiler::{CompileInput, CompileOptions, CompiledCaptionMeta, compile_with};
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::text::measure::TextMeasurer;

/// Compile every beat of a session in parallel.
///
/// Each worker thread gets its own measurer from `make_measurer`. Results keep input order and
/// failures stay per beat.
#[tracing::instrument(level = "debug", skip_all, fields(beats = beats.len(), threads = ?threads))]
pub fn compile_beats<M, F>(
    beats: &[CompileInput],
    options: &CompileOptions,
    threads: Option<usize>,
    make_measurer: F,
) -> CaptionResult<Vec<CaptionResult<CompiledCaptionMeta>>>
where
    M: TextMeasurer,
    F: Fn() -> M + Sync + Send,
{
    let pool = build_thread_pool(threads)?;
    let results = pool.install(|| {
        beats
            .par_iter()
            .map_init(&make_measurer, |measurer, beat| {
                compile_with(
                    measurer,
                    options,
                    &beat.text,
                    &beat.style,
                    beat.frame,
                    beat.raster,
                )
            })
            .collect::<Vec<_>>()
    });

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::warn!(beats = beats.len(), failed, "some beats failed to compile");
    }
    Ok(results)
}

fn build_thread_pool(threads: Option<usize>) -> CaptionResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CaptionError::serde("batch 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CaptionError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/batch.rs"]
mod tests;
