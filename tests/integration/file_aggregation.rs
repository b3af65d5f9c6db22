use std::fs;

use station_agg::synth::{generate, SynthConfig};
use station_agg::{
    aggregate, aggregate_file, format_rows, render_report, AggregateConfig, AggregateError,
    ChunkFailure, InputError, ParseMode, RecordError, StationStats,
};

fn write_input(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write input");
    path
}

#[test]
fn reference_file_any_chunking() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = write_input(&tmp, "m.txt", b"A;1.0\nB;-2.5\nA;3.0\n");

    for (chunks, workers) in [(1, 1), (2, 2), (3, 2), (8, 4)] {
        let table = aggregate(&path, Some(chunks), Some(workers)).expect("aggregate");
        assert_eq!(
            table.get(b"A"),
            Some(&StationStats {
                count: 2,
                sum: 40,
                min: 10,
                max: 30
            })
        );
        assert_eq!(table.get(b"B"), Some(&StationStats::single(-25)));

        let text = render_report(&format_rows(table), 20);
        assert_eq!(
            text,
            "A: min=1.0, avg=2.0, max=3.0\nB: min=-2.5, avg=-2.5, max=-2.5\ntotal stations: 2\n"
        );
    }
}

#[test]
fn missing_trailing_newline_keeps_last_record() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = write_input(&tmp, "m.txt", b"X;5.0\nX;7.0");

    let table = aggregate(&path, Some(2), Some(2)).expect("aggregate");
    assert_eq!(
        table.get(b"X"),
        Some(&StationStats {
            count: 2,
            sum: 120,
            min: 50,
            max: 70
        })
    );
    let rows = format_rows(table);
    assert_eq!(rows[0].to_line(), "X: min=5.0, avg=6.0, max=7.0");
}

#[test]
fn empty_file_yields_empty_table() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = write_input(&tmp, "empty.txt", b"");

    let table = aggregate(&path, None, None).expect("aggregate");
    assert!(table.is_empty());
    assert_eq!(render_report(&format_rows(table), 20), "total stations: 0\n");
}

#[test]
fn missing_file_is_input_error() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("does-not-exist.txt");

    match aggregate(&path, None, None) {
        Err(AggregateError::Input(InputError::Open { path: reported, .. })) => {
            assert_eq!(reported, path);
        }
        other => panic!("expected open error, got {other:?}"),
    }
}

#[test]
fn strict_mode_reports_offending_chunk() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = write_input(&tmp, "m.txt", b"A;1.0\nno delimiter here\nB;2.0\n");

    let config = AggregateConfig {
        chunks: Some(3),
        workers: Some(2),
        parse_mode: ParseMode::Strict,
        ..AggregateConfig::default()
    };
    match aggregate_file(&path, &config) {
        Err(AggregateError::Chunk { range, failure, .. }) => {
            assert!(range.start <= 6 && 6 < range.end, "range {range}");
            assert_eq!(
                failure,
                ChunkFailure::Record(RecordError::MissingDelimiter { offset: 6 })
            );
        }
        other => panic!("expected chunk failure, got {other:?}"),
    }
}

#[test]
fn large_synthetic_file_matches_expected() {
    let input = generate(&SynthConfig {
        seed: 42,
        lines: 200_000,
        ..SynthConfig::default()
    });
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = write_input(&tmp, "synthetic.txt", &input.bytes);

    let report = aggregate_file(&path, &AggregateConfig::default()).expect("aggregate");
    assert_eq!(report.table, input.expected);
    assert_eq!(report.metrics.records, 200_000);
    assert_eq!(report.metrics.input_bytes, input.bytes.len() as u64);
    assert_eq!(report.metrics.chunks_scanned, report.metrics.chunks_planned);
}
