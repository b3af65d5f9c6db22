//! Station aggregation CLI
//!
//! Aggregates a `name;value` measurement file across parallel workers and
//! prints per-station min, mean and max.
//!
//! # Output Format
//!
//! The first 20 stations in byte order are written to stdout as
//! `<name>: min=X.X, avg=X.X, max=X.X`, followed by `total stations: N`.
//!
//! Statistics are written to stderr upon completion:
//! `chunks=N workers=N bytes=N records=N stations=N p50_chunk_us=N p99_chunk_us=N elapsed_ms=N throughput_mib_s=N`
//!
//! Diagnostics go through `tracing` on stderr; set `RUST_LOG` to raise the
//! level (default `warn`).
//!
//! # Exit Codes
//!
//! - `0`: Success
//! - `1`: Input could not be read, or a chunk failed
//! - `2`: Invalid arguments

use station_agg::{
    aggregate_file, format_rows, render_report, AggregateConfig, BoundarySearch, ParseMode,
    DEFAULT_ROW_LIMIT,
};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

fn print_usage(exe: &std::ffi::OsStr) {
    eprintln!(
        "usage: {} [OPTIONS] <path> [chunks] [workers]

ARGS:
    <path>                  Measurement file, one `name;value` record per line
    [chunks]                Target chunk count (default: 4 x CPU count)
    [workers]               Worker threads (default: CPU count, capped at chunks)

OPTIONS:
    --strict                Reject malformed records instead of decoding leniently
    --window=<N>            Search at most N bytes each way for a chunk boundary
    --help, -h              Show this help message",
        exe.to_string_lossy()
    );
}

fn parse_count(name: &str, value: &str) -> usize {
    let n: usize = value.parse().unwrap_or_else(|_| {
        eprintln!("invalid {} value: {}", name, value);
        std::process::exit(2);
    });
    if n == 0 {
        eprintln!("{} must be >= 1", name);
        std::process::exit(2);
    }
    n
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let mut args = env::args_os();
    let exe = args.next().unwrap_or_else(|| "station-agg".into());
    let mut path: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut config = AggregateConfig::default();

    for arg in args {
        if let Some(flag) = arg.to_str() {
            if let Some(value) = flag.strip_prefix("--window=") {
                config.boundary = BoundarySearch::Windowed {
                    window: parse_count("--window", value),
                };
                continue;
            }
            match flag {
                "--strict" => {
                    config.parse_mode = ParseMode::Strict;
                    continue;
                }
                "--help" | "-h" => {
                    print_usage(&exe);
                    std::process::exit(0);
                }
                _ if flag.starts_with("--") => {
                    eprintln!("unknown flag: {}", flag);
                    print_usage(&exe);
                    std::process::exit(2);
                }
                _ => {}
            }
        }

        if path.is_none() {
            path = Some(PathBuf::from(arg));
            continue;
        }
        let Some(text) = arg.to_str() else {
            eprintln!("invalid argument: {}", arg.to_string_lossy());
            std::process::exit(2);
        };
        positional.push(text.to_string());
    }

    let Some(path) = path else {
        print_usage(&exe);
        std::process::exit(2);
    };
    match positional.as_slice() {
        [] => {}
        [chunks] => config.chunks = Some(parse_count("chunks", chunks)),
        [chunks, workers] => {
            config.chunks = Some(parse_count("chunks", chunks));
            config.workers = Some(parse_count("workers", workers));
        }
        _ => {
            print_usage(&exe);
            std::process::exit(2);
        }
    }

    init_tracing();
    let start = Instant::now();

    let report = match aggregate_file(&path, &config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    let metrics = report.metrics;
    let rows = format_rows(report.table);
    let text = render_report(&rows, DEFAULT_ROW_LIMIT);
    if let Err(err) = io::stdout().lock().write_all(text.as_bytes()) {
        eprintln!("error: writing report: {}", err);
        std::process::exit(1);
    }

    let elapsed_secs = elapsed.as_secs_f64();
    let throughput_mib = if elapsed_secs > 0.0 {
        (metrics.bytes_scanned as f64 / (1024.0 * 1024.0)) / elapsed_secs
    } else {
        0.0
    };
    eprintln!(
        "chunks={} workers={} bytes={} records={} stations={} p50_chunk_us={} p99_chunk_us={} elapsed_ms={} throughput_mib_s={:.2}",
        metrics.chunks_scanned,
        metrics.workers,
        metrics.bytes_scanned,
        metrics.records,
        rows.len(),
        metrics.p50_chunk_us(),
        metrics.p99_chunk_us(),
        elapsed.as_millis(),
        throughput_mib
    );
}
