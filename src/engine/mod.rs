//! Single-range scanning and the per-station aggregate table.
//!
//! A chunk scan owns its table exclusively; tables only meet again in
//! [`AggregateTable::merge`], which is associative and commutative.

pub mod buffer_scan;
pub mod table;

pub use buffer_scan::{scan_range, scan_range_into, ChunkScan};
pub use table::{merge_all, merge_pairwise, AggregateTable};
