//! Integration tests for station-agg: file input and the CLI.
//!
//! Run with: `cargo test --test integration`

mod cli;
mod file_aggregation;
