//! Parallel per-station aggregation over large `name;value` measurement files.
//!
//! ## Scope
//! Each input line is `<station>;<value>` where the value is a decimal with
//! one fractional digit. The crate computes count, sum, min and max per
//! station, then derives the mean at report time.
//!
//! ## Key invariants
//! - Values are held as integer tenths, so sums are exact and merge order
//!   never changes a result.
//! - Planned ranges tile the input exactly and every range boundary falls on
//!   a line start, so each record is scanned exactly once.
//! - Workers share one read-only mapping and build private tables; the only
//!   shared mutable state is the coordinator's accumulator.
//! - A failed or panicking chunk fails the whole job with an error naming
//!   the chunk. Partial results are never returned as complete.
//!
//! ## Flow
//! `Path -> InputBytes (mmap) -> plan_chunks -> worker pool (scan_range) -> merge -> report`
//!
//! ## Notable entry points
//! - [`aggregate`]: path plus optional chunk and worker counts.
//! - [`aggregate_file`] / [`aggregate_bytes`] with [`AggregateConfig`]: full control,
//!   returns an [`AggregateReport`] with scan metrics.
//! - [`format_rows`] / [`render_report`]: sorted presentation.

pub mod api;
pub mod engine;
pub mod errors;
pub mod input;
pub mod parse;
pub mod report;
pub mod rng;
pub mod scheduler;
pub mod synth;

pub use api::{BoundarySearch, ByteRange, ParseMode, StationStats};
pub use engine::{merge_all, merge_pairwise, scan_range, AggregateTable, ChunkScan};
pub use errors::{AggregateError, ChunkFailure, InputError, RecordError, ValueError};
pub use input::InputBytes;
pub use parse::{parse_tenths, parse_tenths_strict};
pub use report::{format_rows, render_report, StationRow, DEFAULT_ROW_LIMIT};
pub use scheduler::{
    aggregate, aggregate_bytes, aggregate_file, plan_chunks, AggregateConfig, AggregateReport,
    CancelToken, ScanMetrics,
};
