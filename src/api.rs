use std::fmt;

// --------------------------
// Public API types
// --------------------------

/// Field separator between the station name and its measurement.
pub const DELIMITER: u8 = b';';

/// Record terminator.
pub const NEWLINE: u8 = b'\n';

/// Default lookahead/lookback for [`BoundarySearch::Windowed`].
pub const DEFAULT_BOUNDARY_WINDOW: usize = 1024;

/// Half-open byte range `[start, end)` into the input buffer.
///
/// Ranges emitted by the planner start and end on line boundaries, never
/// inside a record (except under the windowed fallback, see
/// [`BoundarySearch::Windowed`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "range start {start} > end {end}");
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Running aggregate for one station: `(count, sum, min, max)`.
///
/// All values are in tenths (real value × 10). `sum` is exact for any
/// realistic input; `i64` leaves headroom for ~9e17 tenths. Past that it
/// wraps, like lenient value decoding, so folding never panics and the
/// result stays independent of chunking and build profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationStats {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl StationStats {
    /// Aggregate holding exactly one observation.
    #[inline]
    pub fn single(value: i64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        }
    }

    /// Fold one observation in.
    #[inline]
    pub fn observe(&mut self, value: i64) {
        self.count += 1;
        self.sum = self.sum.wrapping_add(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Combine with another partial aggregate for the same key.
    ///
    /// Associative and commutative, so partials may be merged in any order.
    #[inline]
    pub fn combine(&mut self, other: &StationStats) {
        self.count += other.count;
        self.sum = self.sum.wrapping_add(other.sum);
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Mean in real units (not tenths).
    #[inline]
    pub fn mean(&self) -> f64 {
        (self.sum as f64 / self.count as f64) / 10.0
    }
}

/// How the planner moves a raw cut point onto a line boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundarySearch {
    /// Search forward as far as needed. A cut with no newline after it
    /// collapses into the end of the input, so no record is ever split.
    #[default]
    Unbounded,

    /// Search at most `window` bytes forward, then `window` bytes back.
    ///
    /// Correctness trade (explicit): when neither search finds a newline
    /// the raw cut is used, which can split one record across two chunks.
    Windowed { window: usize },
}

/// How the value field and record framing are validated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Best-effort decoding: stray bytes are ignored and a trailing record
    /// without a delimiter ends the chunk silently.
    #[default]
    Lenient,

    /// Reject malformed records with a structured [`RecordError`](crate::RecordError).
    Strict,
}
