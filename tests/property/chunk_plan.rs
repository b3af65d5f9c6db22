//! Property tests for the chunk planner.

use proptest::prelude::*;

use station_agg::{plan_chunks, BoundarySearch, ByteRange};

fn assert_tiles(ranges: &[ByteRange], len: usize) -> Result<(), TestCaseError> {
    let mut next = 0;
    for r in ranges {
        prop_assert_eq!(r.start, next, "gap or overlap at {}", r);
        prop_assert!(r.end > r.start, "empty range {}", r);
        next = r.end;
    }
    prop_assert_eq!(next, len);
    Ok(())
}

/// Bytes with a realistic newline density plus the occasional long line.
fn newline_heavy_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            6 => any::<u8>(),
            2 => Just(b'\n'),
            1 => Just(b';'),
        ],
        0..2048,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn unbounded_plan_tiles_and_aligns(buf in newline_heavy_bytes(), target in 1usize..64) {
        let ranges = plan_chunks(&buf, target, BoundarySearch::Unbounded);
        prop_assert!(ranges.len() <= target);
        assert_tiles(&ranges, buf.len())?;
        for r in ranges.iter().skip(1) {
            prop_assert_eq!(buf[r.start - 1], b'\n', "range {} starts mid-line", r);
        }
        for r in &ranges[..ranges.len().saturating_sub(1)] {
            prop_assert_eq!(buf[r.end - 1], b'\n', "range {} ends mid-line", r);
        }
    }

    #[test]
    fn windowed_plan_still_tiles(
        buf in newline_heavy_bytes(),
        target in 1usize..64,
        window in 1usize..32,
    ) {
        let ranges = plan_chunks(&buf, target, BoundarySearch::Windowed { window });
        prop_assert!(ranges.len() <= target);
        assert_tiles(&ranges, buf.len())?;
    }

    #[test]
    fn windowed_matches_unbounded_when_lines_are_short(
        lines in prop::collection::vec("[a-z]{0,6}", 1..200),
        target in 1usize..32,
    ) {
        // Every line is at most 7 bytes with its newline, so a window of 8
        // always finds the same forward newline as an unbounded search.
        let buf: Vec<u8> = lines.iter().flat_map(|l| l.bytes().chain(Some(b'\n'))).collect();
        let unbounded = plan_chunks(&buf, target, BoundarySearch::Unbounded);
        let windowed = plan_chunks(&buf, target, BoundarySearch::Windowed { window: 8 });
        prop_assert_eq!(unbounded, windowed);
    }
}
