//! Chunk scanner: folds every record of one byte range into a table.
//!
//! # Record framing
//! A record is `<key>;<value>` terminated by `\n`, or by the end of the
//! range for the last record of an input without a trailing newline.
//!
//! # Lenient mode
//! 1. Find the next `;` from the cursor, bounded by `range.end`. None found
//!    means the rest of the range holds no complete record: stop.
//! 2. Key is `[cursor, semi)`.
//! 3. Value is `[semi + 1, nl)`, where `nl` is the next `\n` bounded by
//!    `range.end` (or `range.end` itself).
//! 4. Fold, then move the cursor past `nl`.
//!
//! Because the delimiter is searched before the terminator, a line with no
//! `;` is swallowed into the following record's key. That is the accepted
//! cost of lenient mode; strict mode reports it instead.
//!
//! # Strict mode
//! Frames the line first, then requires a `;` inside it and a value that
//! passes [`parse_tenths_strict`]. Errors carry the record's absolute offset.
//!
//! The scanner owns its table and only reads `buf`, so ranges can be scanned
//! on any thread without coordination.

use memchr::memchr;

use crate::api::{ByteRange, ParseMode, DELIMITER, NEWLINE};
use crate::engine::table::AggregateTable;
use crate::errors::RecordError;
use crate::parse::{parse_tenths, parse_tenths_strict};

/// Result of scanning one range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkScan {
    pub table: AggregateTable,
    /// Records folded into `table`.
    pub records: u64,
}

/// Scan `range` of `buf` into a fresh table.
///
/// # Panics
/// Panics if `range` is out of bounds for `buf`.
pub fn scan_range(buf: &[u8], range: ByteRange, mode: ParseMode) -> Result<ChunkScan, RecordError> {
    let mut table = AggregateTable::new();
    let records = scan_range_into(buf, range, mode, &mut table)?;
    Ok(ChunkScan { table, records })
}

/// Scan `range` of `buf`, folding into an existing table.
///
/// Returns the number of records folded. On a strict-mode error the table
/// may already hold records that precede the failure.
pub fn scan_range_into(
    buf: &[u8],
    range: ByteRange,
    mode: ParseMode,
    table: &mut AggregateTable,
) -> Result<u64, RecordError> {
    assert!(
        range.start <= range.end && range.end <= buf.len(),
        "range {range} out of bounds for buffer of {} bytes",
        buf.len()
    );
    match mode {
        ParseMode::Lenient => Ok(scan_lenient(buf, range, table)),
        ParseMode::Strict => scan_strict(buf, range, table),
    }
}

fn scan_lenient(buf: &[u8], range: ByteRange, table: &mut AggregateTable) -> u64 {
    let end = range.end;
    let mut cursor = range.start;
    let mut records = 0u64;

    while cursor < end {
        let Some(semi) = memchr(DELIMITER, &buf[cursor..end]).map(|i| cursor + i) else {
            break;
        };
        let value_start = semi + 1;
        let line_end = memchr(NEWLINE, &buf[value_start..end])
            .map(|i| value_start + i)
            .unwrap_or(end);

        table.fold(&buf[cursor..semi], parse_tenths(&buf[value_start..line_end]));
        records += 1;
        cursor = line_end + 1;
    }

    records
}

fn scan_strict(
    buf: &[u8],
    range: ByteRange,
    table: &mut AggregateTable,
) -> Result<u64, RecordError> {
    let end = range.end;
    let mut cursor = range.start;
    let mut records = 0u64;

    while cursor < end {
        let line_end = memchr(NEWLINE, &buf[cursor..end])
            .map(|i| cursor + i)
            .unwrap_or(end);
        let line = &buf[cursor..line_end];
        let semi = memchr(DELIMITER, line)
            .ok_or(RecordError::MissingDelimiter { offset: cursor })?;
        let value = parse_tenths_strict(&line[semi + 1..]).map_err(|kind| {
            RecordError::BadValue {
                offset: cursor,
                kind,
            }
        })?;

        table.fold(&line[..semi], value);
        records += 1;
        cursor = line_end + 1;
    }

    Ok(records)
}
