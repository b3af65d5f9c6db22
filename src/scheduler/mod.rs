//! Chunk planning and the parallel aggregation pool.
//!
//! # Architecture
//!
//! - **Planner** ([`chunking`]): splits the input into line-aligned ranges
//!   that tile it exactly.
//! - **Pool** ([`parallel_scan`]): scoped worker threads pull ranges off a
//!   bounded queue and send partial tables back to the coordinator.
//! - **Metrics** ([`metrics`]): per-worker counters merged after join.

pub mod chunking;
pub mod metrics;
pub mod parallel_scan;

pub use chunking::{align_cut, plan_chunks, raw_cuts};
pub use metrics::{Log2Hist, ScanMetrics, WorkerMetrics};
pub use parallel_scan::{
    aggregate, aggregate_bytes, aggregate_file, available_parallelism, AggregateConfig,
    AggregateReport, CancelToken,
};
