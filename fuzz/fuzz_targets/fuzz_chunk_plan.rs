#![no_main]

use libfuzzer_sys::fuzz_target;
use station_agg::{plan_chunks, scan_range, AggregateTable, BoundarySearch, ByteRange, ParseMode};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // First bytes pick the plan; the rest is the input.
    let (head, buf) = data.split_at(4);
    let target = 1 + (u16::from_le_bytes([head[0], head[1]]) as usize % 256);
    let window = 1 + (u16::from_le_bytes([head[2], head[3]]) as usize % 64);

    for policy in [BoundarySearch::Unbounded, BoundarySearch::Windowed { window }] {
        let ranges = plan_chunks(buf, target, policy);
        assert!(ranges.len() <= target);

        let mut next = 0;
        for r in &ranges {
            assert_eq!(r.start, next, "gap or overlap at {r}");
            assert!(r.end > r.start, "empty range {r}");
            next = r.end;
        }
        assert_eq!(next, buf.len());

        if policy == BoundarySearch::Unbounded {
            for r in &ranges[1..] {
                assert_eq!(buf[r.start - 1], b'\n', "range {r} starts mid-line");
            }
        }
    }

    // Strict acceptance is chunking-invariant: a file that scans cleanly as
    // one range scans to the same table under any aligned plan.
    let whole = match scan_range(buf, ByteRange::new(0, buf.len()), ParseMode::Strict) {
        Ok(scan) => scan,
        Err(_) => return,
    };
    let mut records = 0;
    let mut merged = AggregateTable::new();
    for r in plan_chunks(buf, target, BoundarySearch::Unbounded) {
        let scan = scan_range(buf, r, ParseMode::Strict).expect("chunk of a valid file");
        records += scan.records;
        merged.merge(scan.table);
    }
    assert_eq!(records, whole.records);
    assert_eq!(merged, whole.table);
});
