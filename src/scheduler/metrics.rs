//! Scan counters.
//!
//! Workers update a private [`WorkerMetrics`] with plain integer ops and hand
//! it back on exit; the coordinator folds them into one [`ScanMetrics`].
//! Chunk wall times go into a [`Log2Hist`], whose percentiles are reported
//! as the lower bound of a power-of-two bucket. For chunk timing an
//! order-of-magnitude answer is enough.

/// Power-of-two histogram: bucket `k` counts values in `[2^k, 2^(k+1))`,
/// with `0` and `1` sharing bucket 0.
#[derive(Clone, Debug)]
pub struct Log2Hist {
    pub buckets: [u64; 64],
    pub count: u64,
}

impl Default for Log2Hist {
    fn default() -> Self {
        Self {
            buckets: [0; 64],
            count: 0,
        }
    }
}

impl Log2Hist {
    #[inline]
    pub fn record(&mut self, v: u64) {
        let bucket = (u64::BITS - 1 - (v | 1).leading_zeros()) as usize;
        self.buckets[bucket] += 1;
        self.count += 1;
    }

    /// Lower bound of the bucket holding the `q`-quantile, `q` in `[0, 1]`.
    /// `None` when nothing was recorded.
    pub fn quantile_floor(&self, q: f64) -> Option<u64> {
        if self.count == 0 {
            return None;
        }
        let rank = ((self.count as f64 * q).ceil() as u64).max(1);
        let mut seen = 0u64;
        let bucket = self.buckets.iter().position(|&c| {
            seen += c;
            seen >= rank
        })?;
        Some(if bucket == 0 { 0 } else { 1u64 << bucket })
    }

    pub fn merge(&mut self, other: &Log2Hist) {
        for (mine, theirs) in self.buckets.iter_mut().zip(&other.buckets) {
            *mine += theirs;
        }
        self.count += other.count;
    }
}

/// Counters owned by one worker for the duration of a job.
///
/// NOT shared: each worker updates its own copy and returns it on exit.
#[derive(Clone, Debug, Default)]
pub struct WorkerMetrics {
    /// Chunks this worker scanned to completion.
    pub chunks_scanned: u64,
    /// Bytes covered by those chunks.
    pub bytes_scanned: u64,
    /// Records folded.
    pub records: u64,
    /// Wall time per chunk scan, in nanoseconds.
    pub chunk_time_ns: Log2Hist,
}

impl WorkerMetrics {
    #[inline]
    pub fn record_chunk(&mut self, bytes: usize, records: u64, elapsed_ns: u64) {
        self.chunks_scanned += 1;
        self.bytes_scanned += bytes as u64;
        self.records += records;
        self.chunk_time_ns.record(elapsed_ns);
    }
}

/// Job-wide metrics, merged from every worker after join.
#[derive(Clone, Debug, Default)]
pub struct ScanMetrics {
    /// Input length in bytes.
    pub input_bytes: u64,
    /// Ranges produced by the planner.
    pub chunks_planned: u64,
    /// Worker threads started.
    pub workers: u64,
    pub chunks_scanned: u64,
    pub bytes_scanned: u64,
    pub records: u64,
    pub chunk_time_ns: Log2Hist,
}

impl ScanMetrics {
    pub fn merge_worker(&mut self, worker: &WorkerMetrics) {
        self.chunks_scanned += worker.chunks_scanned;
        self.bytes_scanned += worker.bytes_scanned;
        self.records += worker.records;
        self.chunk_time_ns.merge(&worker.chunk_time_ns);
    }

    /// Median chunk scan time in microseconds (bucket floor), 0 if no chunk ran.
    pub fn p50_chunk_us(&self) -> u64 {
        self.chunk_us(0.50)
    }

    /// 99th percentile chunk scan time in microseconds (bucket floor).
    pub fn p99_chunk_us(&self) -> u64 {
        self.chunk_us(0.99)
    }

    fn chunk_us(&self, q: f64) -> u64 {
        self.chunk_time_ns.quantile_floor(q).unwrap_or(0) / 1_000
    }
}
