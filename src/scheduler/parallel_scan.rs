//! High-level parallel aggregation API.
//!
//! # Architecture
//!
//! ```text
//!   path ──► InputBytes (mmap) ──► plan_chunks() ──► Vec<ByteRange>
//!                                                        │
//!                                   feeder ──► bounded work queue (cap = workers)
//!                                                        │
//!                          ┌─────────────┬───────────────┼──────────────┐
//!                          ▼             ▼               ▼              ▼
//!                      worker 0      worker 1   ...  worker N-1    (scan_range)
//!                          │             │               │
//!                          └─────────────┴──► result channel ──► coordinator merge
//! ```
//!
//! # Correctness Invariants
//!
//! - **Shared read-only input**: workers borrow the same `&[u8]`; nothing
//!   writes to it, so no locking.
//! - **Exclusive partials**: each chunk scan builds its own table and hands
//!   it over by value.
//! - **Order-free merge**: partials are merged as they arrive; the combine
//!   step is associative and commutative, so arrival order is irrelevant.
//! - **Fail-fast**: the first failed chunk stops dispatch and the job returns
//!   an error naming the chunk. A missing range is never silently omitted.
//! - **Panic isolation**: a panic inside a chunk scan is caught and reported
//!   as that chunk's failure.
//!
//! # Backpressure
//!
//! The work queue holds at most `workers` ranges, so at most `2 × workers`
//! ranges are dispatched but unfinished at any instant. Undispatched ranges
//! wait in the plan.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::api::{BoundarySearch, ByteRange, ParseMode};
use crate::engine::{scan_range, AggregateTable, ChunkScan};
use crate::errors::{AggregateError, ChunkFailure, RecordError};
use crate::input::InputBytes;

use super::chunking::plan_chunks;
use super::metrics::{ScanMetrics, WorkerMetrics};

// ============================================================================
// Configuration
// ============================================================================

/// Cooperative cancellation flag, checked by workers between chunk scans.
///
/// Clones share the same flag. A chunk that is already being scanned runs to
/// completion; cancellation takes effect before the next one.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Configuration for one aggregation job.
///
/// # Defaults
///
/// | Parameter | Default | Rationale |
/// |-----------|---------|-----------|
/// | `chunks` | `chunk_multiplier × num_cpus::get()` | Several ranges per worker smooths out uneven ranges |
/// | `workers` | `min(planned chunks, num_cpus::get())` | Match hardware parallelism |
/// | `chunk_multiplier` | 4 | |
/// | `boundary` | `Unbounded` | Never split a record |
/// | `parse_mode` | `Lenient` | Best-effort decoding |
#[derive(Clone, Debug)]
pub struct AggregateConfig {
    /// Target chunk count. The planner may return fewer ranges.
    pub chunks: Option<usize>,

    /// Worker threads. Capped at the number of planned ranges; extra
    /// workers would have nothing to do.
    pub workers: Option<usize>,

    /// Ranges per available core when `chunks` is not set.
    pub chunk_multiplier: usize,

    /// How raw cuts are aligned to line starts.
    pub boundary: BoundarySearch,

    /// Record validation mode.
    pub parse_mode: ParseMode,

    /// Optional caller-owned cancellation flag.
    pub cancel: Option<CancelToken>,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            chunks: None,
            workers: None,
            chunk_multiplier: 4,
            boundary: BoundarySearch::Unbounded,
            parse_mode: ParseMode::Lenient,
            cancel: None,
        }
    }
}

impl AggregateConfig {
    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<(), AggregateError> {
        let reason = if self.chunks == Some(0) {
            "chunk count must be >= 1"
        } else if self.workers == Some(0) {
            "worker count must be >= 1"
        } else if self.chunk_multiplier == 0 {
            "chunk multiplier must be >= 1"
        } else if self.boundary == (BoundarySearch::Windowed { window: 0 }) {
            "boundary window must be >= 1"
        } else {
            return Ok(());
        };
        Err(AggregateError::InvalidConfig { reason })
    }

    /// Target chunk count handed to the planner.
    pub fn target_chunks(&self, parallelism: usize) -> usize {
        self.chunks
            .unwrap_or_else(|| parallelism.saturating_mul(self.chunk_multiplier))
            .max(1)
    }

    /// Worker threads for a plan of `planned` ranges.
    pub fn worker_count(&self, planned: usize, parallelism: usize) -> usize {
        self.workers
            .unwrap_or(parallelism)
            .min(planned)
            .max(1)
    }
}

/// Hardware parallelism, at least 1.
pub fn available_parallelism() -> usize {
    num_cpus::get().max(1)
}

// ============================================================================
// Report
// ============================================================================

/// Final table plus the counters gathered while producing it.
#[derive(Clone, Debug, Default)]
pub struct AggregateReport {
    pub table: AggregateTable,
    pub metrics: ScanMetrics,
}

// ============================================================================
// Entry Points
// ============================================================================

/// Aggregate a measurement file with optional chunk and worker overrides.
///
/// A missing or unreadable file fails before any scanning starts. An empty
/// file yields an empty table.
pub fn aggregate(
    path: impl AsRef<Path>,
    chunks: Option<usize>,
    workers: Option<usize>,
) -> Result<AggregateTable, AggregateError> {
    let config = AggregateConfig {
        chunks,
        workers,
        ..AggregateConfig::default()
    };
    aggregate_file(path.as_ref(), &config).map(|report| report.table)
}

/// Map `path` and aggregate it under `config`.
pub fn aggregate_file(path: &Path, config: &AggregateConfig) -> Result<AggregateReport, AggregateError> {
    config.validate()?;
    let input = InputBytes::open(path)?;
    tracing::debug!(
        path = %path.display(),
        len = input.len(),
        mapped = input.is_mapped(),
        "input opened"
    );
    aggregate_bytes(input.as_slice(), config)
}

/// Aggregate an in-memory buffer under `config`.
pub fn aggregate_bytes(buf: &[u8], config: &AggregateConfig) -> Result<AggregateReport, AggregateError> {
    config.validate()?;
    let mut metrics = ScanMetrics {
        input_bytes: buf.len() as u64,
        ..ScanMetrics::default()
    };
    if buf.is_empty() {
        return Ok(AggregateReport {
            table: AggregateTable::new(),
            metrics,
        });
    }

    let parallelism = available_parallelism();
    let target = config.target_chunks(parallelism);
    let ranges = plan_chunks(buf, target, config.boundary);
    let workers = config.worker_count(ranges.len(), parallelism);
    metrics.chunks_planned = ranges.len() as u64;
    metrics.workers = workers as u64;
    tracing::debug!(
        len = buf.len(),
        target,
        planned = ranges.len(),
        workers,
        mode = ?config.parse_mode,
        "chunk plan ready"
    );

    let mode = config.parse_mode;
    let (table, worker_metrics) = run_pool(
        buf,
        &ranges,
        workers,
        config.cancel.as_ref(),
        |buf, range| scan_range(buf, range, mode),
    )?;
    for worker in &worker_metrics {
        metrics.merge_worker(worker);
    }
    tracing::debug!(
        chunks = metrics.chunks_scanned,
        records = metrics.records,
        p50_chunk_us = metrics.p50_chunk_us(),
        p99_chunk_us = metrics.p99_chunk_us(),
        "aggregation finished"
    );

    Ok(AggregateReport { table, metrics })
}

// ============================================================================
// Worker Pool
// ============================================================================

struct ChunkResult {
    index: usize,
    range: ByteRange,
    outcome: Result<AggregateTable, ChunkFailure>,
}

/// Scan every range on `workers` threads and merge the partials.
///
/// `scan` is the per-chunk unit of work; it must not share mutable state
/// across calls.
pub(crate) fn run_pool<F>(
    buf: &[u8],
    ranges: &[ByteRange],
    workers: usize,
    cancel: Option<&CancelToken>,
    scan: F,
) -> Result<(AggregateTable, Vec<WorkerMetrics>), AggregateError>
where
    F: Fn(&[u8], ByteRange) -> Result<ChunkScan, RecordError> + Sync,
{
    assert!(workers > 0, "workers must be > 0");
    let stop = AtomicBool::new(false);

    std::thread::scope(|scope| {
        let (work_tx, work_rx) = crossbeam_channel::bounded::<(usize, ByteRange)>(workers);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<ChunkResult>();
        let stop = &stop;
        let scan = &scan;

        scope.spawn(move || {
            for (index, &range) in ranges.iter().enumerate() {
                if stop.load(Ordering::Acquire) {
                    break;
                }
                // Err means every worker has exited.
                if work_tx.send((index, range)).is_err() {
                    break;
                }
            }
        });

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            handles.push(scope.spawn(move || {
                let mut local = WorkerMetrics::default();
                for (index, range) in work_rx.iter() {
                    if stop.load(Ordering::Acquire) {
                        break;
                    }
                    if cancel.is_some_and(CancelToken::is_cancelled) {
                        stop.store(true, Ordering::Release);
                        break;
                    }

                    let started = Instant::now();
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| scan(buf, range)))
                    {
                        Ok(Ok(chunk)) => {
                            let elapsed_ns = started.elapsed().as_nanos() as u64;
                            local.record_chunk(range.len(), chunk.records, elapsed_ns);
                            Ok(chunk.table)
                        }
                        Ok(Err(err)) => Err(err.into()),
                        Err(payload) => Err(ChunkFailure::Panicked {
                            message: panic_message(payload.as_ref()),
                        }),
                    };
                    if outcome.is_err() {
                        stop.store(true, Ordering::Release);
                    }
                    if result_tx
                        .send(ChunkResult {
                            index,
                            range,
                            outcome,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
                tracing::debug!(
                    worker_id,
                    chunks = local.chunks_scanned,
                    bytes = local.bytes_scanned,
                    records = local.records,
                    "worker finished"
                );
                local
            }));
        }
        drop(work_rx);
        drop(result_tx);

        let mut table = AggregateTable::new();
        let mut completed = 0usize;
        let mut failure: Option<(usize, ByteRange, ChunkFailure)> = None;
        for ChunkResult {
            index,
            range,
            outcome,
        } in result_rx.iter()
        {
            match outcome {
                Ok(partial) => {
                    table.merge(partial);
                    completed += 1;
                }
                Err(err) => {
                    tracing::warn!(index, %range, error = %err, "chunk scan failed");
                    if failure.as_ref().map_or(true, |(first, _, _)| index < *first) {
                        failure = Some((index, range, err));
                    }
                }
            }
        }

        let mut worker_metrics = Vec::with_capacity(workers);
        for handle in handles {
            match handle.join() {
                Ok(local) => worker_metrics.push(local),
                Err(payload) => panic::resume_unwind(payload),
            }
        }

        if let Some((index, range, failure)) = failure {
            return Err(AggregateError::Chunk {
                index,
                range,
                failure,
            });
        }
        if completed < ranges.len() {
            tracing::warn!(
                completed,
                planned = ranges.len(),
                "aggregation cancelled"
            );
            return Err(AggregateError::Cancelled);
        }
        Ok((table, worker_metrics))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
