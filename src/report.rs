//! Turns the final table into sorted, human-readable rows.
//!
//! Rows are ordered by raw key bytes, which matches code point order for
//! valid UTF-8 keys. Names are decoded as UTF-8 with invalid sequences
//! dropped, so a stray byte never aborts a report.

use std::fmt::Write as _;

use crate::engine::AggregateTable;

/// Rows printed by the CLI before the station total.
pub const DEFAULT_ROW_LIMIT: usize = 20;

/// One formatted station: values in real units.
#[derive(Clone, Debug, PartialEq)]
pub struct StationRow {
    pub name: String,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl StationRow {
    /// `"<name>: min=X.X, avg=X.X, max=X.X"`.
    pub fn to_line(&self) -> String {
        format!(
            "{}: min={:.1}, avg={:.1}, max={:.1}",
            self.name, self.min, self.mean, self.max
        )
    }
}

/// Sorted rows for every station in `table`.
pub fn format_rows(table: AggregateTable) -> Vec<StationRow> {
    table
        .into_sorted()
        .into_iter()
        .map(|(key, stats)| StationRow {
            name: decode_name(&key),
            min: stats.min as f64 / 10.0,
            mean: stats.mean(),
            max: stats.max as f64 / 10.0,
        })
        .collect()
}

/// Up to `limit` row lines followed by `total stations: N`.
pub fn render_report(rows: &[StationRow], limit: usize) -> String {
    let mut out = String::new();
    for row in rows.iter().take(limit) {
        out.push_str(&row.to_line());
        out.push('\n');
    }
    let _ = writeln!(out, "total stations: {}", rows.len());
    out
}

/// UTF-8 decode, skipping invalid byte sequences.
pub fn decode_name(key: &[u8]) -> String {
    let mut name = String::with_capacity(key.len());
    for chunk in key.utf8_chunks() {
        name.push_str(chunk.valid());
    }
    name
}
