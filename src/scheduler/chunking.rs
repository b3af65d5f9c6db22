//! # Chunking Module
//!
//! Splits the input into record-aligned byte ranges that scanners can
//! process independently.
//!
//! ## Algorithm
//!
//! 1. Even raw cuts: `cut[k] = len * k / target` for `k in 0..=target`.
//! 2. Every interior cut moves to the start of a line (see [`align_cut`]).
//! 3. The aligned cut is both the end of range `k-1` and the start of range
//!    `k`. The previous end is a floor, so cuts never move backwards, and
//!    empty ranges are dropped.
//!
//! ## Invariants
//!
//! - Ranges are sorted, pairwise disjoint and contiguous.
//! - Their union is exactly `[0, len)`; an empty input yields no ranges.
//! - At most `target` ranges are produced.
//! - Under [`BoundarySearch::Unbounded`] every range starts and ends on a
//!   line boundary. Under [`BoundarySearch::Windowed`] a cut with no newline
//!   within the window stays unaligned and may split one record.
//!
//! ## Performance Notes
//!
//! Alignment is one `memchr` per cut. Lines are short, so even the unbounded
//! search touches a few dozen bytes in practice. The scan loop dominates.

use memchr::{memchr, memrchr};

use crate::api::{BoundarySearch, ByteRange, NEWLINE};

/// Evenly spaced raw cut points, `target + 1` of them, from `0` to `len`.
///
/// # Panics
/// Panics if `target` is 0.
pub fn raw_cuts(len: usize, target: usize) -> Vec<usize> {
    assert!(target > 0, "target chunk count must be > 0");
    // u128 keeps `len * k` exact for any realistic input size.
    (0..=target)
        .map(|k| ((len as u128 * k as u128) / target as u128) as usize)
        .collect()
}

/// Move `cut` onto the start of a line.
///
/// A cut that already sits on a line start (or at either end of `buf`) is
/// returned unchanged. Otherwise the cut moves just past the next newline;
/// the policy decides how far that search may go and what happens when it
/// fails.
#[inline]
pub fn align_cut(buf: &[u8], cut: usize, policy: BoundarySearch) -> usize {
    let len = buf.len();
    if cut == 0 || cut >= len || buf[cut - 1] == NEWLINE {
        return cut.min(len);
    }

    match policy {
        BoundarySearch::Unbounded => match memchr(NEWLINE, &buf[cut..]) {
            Some(i) => cut + i + 1,
            None => len,
        },
        BoundarySearch::Windowed { window } => {
            let ahead = &buf[cut..len.min(cut.saturating_add(window))];
            if let Some(i) = memchr(NEWLINE, ahead) {
                return cut + i + 1;
            }
            let back_start = cut.saturating_sub(window);
            if let Some(i) = memrchr(NEWLINE, &buf[back_start..cut]) {
                return back_start + i + 1;
            }
            tracing::warn!(
                cut,
                window,
                "no newline within window; chunk boundary may split a record"
            );
            cut
        }
    }
}

/// Plan up to `target` record-aligned ranges covering `buf`.
///
/// # Panics
/// Panics if `target` is 0.
pub fn plan_chunks(buf: &[u8], target: usize, policy: BoundarySearch) -> Vec<ByteRange> {
    assert!(target > 0, "target chunk count must be > 0");
    if buf.is_empty() {
        return Vec::new();
    }

    let cuts = raw_cuts(buf.len(), target);
    let mut ranges = Vec::with_capacity(target);
    let mut prev = 0usize;
    for &cut in &cuts[1..] {
        let end = align_cut(buf, cut, policy).max(prev);
        if end > prev {
            ranges.push(ByteRange::new(prev, end));
            prev = end;
        }
    }

    debug_assert_eq!(prev, buf.len(), "plan must cover the whole input");
    ranges
}
