//! End-to-end properties: the result depends only on the records, never on
//! how the input was chunked or how many workers scanned it.

use proptest::prelude::*;

use station_agg::synth::{format_tenths, generate, SynthConfig};
use station_agg::{aggregate_bytes, AggregateConfig, AggregateTable, BoundarySearch, ParseMode};

#[derive(Clone, Debug)]
struct Record {
    key: String,
    tenths: i64,
}

fn record() -> impl Strategy<Value = Record> {
    // Keys may hold spaces and multi-byte UTF-8, never `;` or `\n`.
    ("[A-Za-z éüİ]{1,10}", -999i64..=999).prop_map(|(key, tenths)| Record { key, tenths })
}

fn render(records: &[Record], trailing_newline: bool) -> Vec<u8> {
    let mut buf = Vec::new();
    for (i, r) in records.iter().enumerate() {
        buf.extend_from_slice(r.key.as_bytes());
        buf.push(b';');
        format_tenths(r.tenths, &mut buf);
        if trailing_newline || i + 1 < records.len() {
            buf.push(b'\n');
        }
    }
    buf
}

fn oracle(records: &[Record]) -> AggregateTable {
    records.iter().map(|r| (r.key.as_bytes(), r.tenths)).collect()
}

fn config(chunks: usize, workers: usize, parse_mode: ParseMode) -> AggregateConfig {
    AggregateConfig {
        chunks: Some(chunks),
        workers: Some(workers),
        parse_mode,
        ..AggregateConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunking_and_workers_do_not_change_result(
        records in prop::collection::vec(record(), 0..300),
        trailing_newline in any::<bool>(),
        chunks in 1usize..40,
        workers in 1usize..6,
    ) {
        let buf = render(&records, trailing_newline);
        let expected = oracle(&records);

        for mode in [ParseMode::Lenient, ParseMode::Strict] {
            let report = aggregate_bytes(&buf, &config(chunks, workers, mode))
                .expect("well-formed input");
            prop_assert_eq!(&report.table, &expected, "mode {:?}", mode);
            prop_assert_eq!(report.metrics.records, records.len() as u64);
            prop_assert_eq!(report.metrics.bytes_scanned, buf.len() as u64);
        }
    }

    #[test]
    fn counts_are_conserved(
        seed in any::<u64>(),
        lines in 0usize..2000,
        stations in 1usize..16,
        chunks in 1usize..64,
    ) {
        let input = generate(&SynthConfig {
            seed,
            lines,
            stations,
            ..SynthConfig::default()
        });
        let report = aggregate_bytes(&input.bytes, &config(chunks, 4, ParseMode::Lenient))
            .expect("well-formed input");
        prop_assert_eq!(report.table.total_count(), lines as u64);
        prop_assert_eq!(&report.table, &input.expected);
        for (_, stats) in report.table.iter() {
            prop_assert!(stats.min <= stats.max);
            prop_assert!(stats.count >= 1);
            let mean_tenths = stats.sum as f64 / stats.count as f64;
            prop_assert!(stats.min as f64 <= mean_tenths && mean_tenths <= stats.max as f64);
        }
    }

    #[test]
    fn windowed_boundaries_agree_on_short_lines(
        records in prop::collection::vec(record(), 1..200),
        chunks in 1usize..40,
    ) {
        // Lines are at most ~40 bytes, well inside the default window.
        let buf = render(&records, true);
        let cfg = AggregateConfig {
            boundary: BoundarySearch::Windowed { window: station_agg::api::DEFAULT_BOUNDARY_WINDOW },
            ..config(chunks, 3, ParseMode::Strict)
        };
        let report = aggregate_bytes(&buf, &cfg).expect("well-formed input");
        prop_assert_eq!(report.table, oracle(&records));
    }
}
