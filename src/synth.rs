//! Deterministic synthetic measurement files.
//!
//! Used by benches and property tests. Every generated file comes with the
//! table a correct aggregation must produce, computed independently of the
//! scanner.

use crate::engine::AggregateTable;
use crate::rng::XorShift64;

/// Station names mixing ASCII, multi-byte UTF-8 and embedded spaces.
pub const STATIONS: &[&str] = &[
    "Abha",
    "Abidjan",
    "Abéché",
    "Accra",
    "Addis Ababa",
    "Bulawayo",
    "Hamburg",
    "İzmir",
    "Palembang",
    "St. John's",
    "São Paulo",
    "Zürich",
    "Ürümqi",
    "Petropavlovsk-Kamchatsky",
];

/// Shape of a generated file.
#[derive(Clone, Copy, Debug)]
pub struct SynthConfig {
    pub seed: u64,
    pub lines: usize,
    /// Distinct stations drawn from, capped at `STATIONS.len()`.
    pub stations: usize,
    /// Measurement range in tenths, inclusive.
    pub min_tenths: i64,
    pub max_tenths: i64,
    /// Whether the last line ends with `\n`.
    pub trailing_newline: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            seed: 0x853c49e6748fea9b,
            lines: 10_000,
            stations: STATIONS.len(),
            min_tenths: -999,
            max_tenths: 999,
            trailing_newline: true,
        }
    }
}

/// A generated file and its expected aggregate.
#[derive(Clone, Debug)]
pub struct SynthInput {
    pub bytes: Vec<u8>,
    pub expected: AggregateTable,
}

/// Format tenths the way measurement files write them: `-12.3`, `0.0`.
pub fn format_tenths(value: i64, out: &mut Vec<u8>) {
    if value < 0 {
        out.push(b'-');
    }
    let abs = value.unsigned_abs();
    out.extend_from_slice((abs / 10).to_string().as_bytes());
    out.push(b'.');
    out.push(b'0' + (abs % 10) as u8);
}

/// Generate a well-formed file per `config`.
pub fn generate(config: &SynthConfig) -> SynthInput {
    let stations = config.stations.clamp(1, STATIONS.len());
    let mut rng = XorShift64::new(config.seed);
    let mut bytes = Vec::with_capacity(config.lines * 16);
    let mut expected = AggregateTable::new();

    for i in 0..config.lines {
        let name = STATIONS[rng.next_usize(stations)].as_bytes();
        let value = rng.next_in(config.min_tenths, config.max_tenths);
        bytes.extend_from_slice(name);
        bytes.push(b';');
        format_tenths(value, &mut bytes);
        if config.trailing_newline || i + 1 < config.lines {
            bytes.push(b'\n');
        }
        expected.fold(name, value);
    }

    SynthInput { bytes, expected }
}
