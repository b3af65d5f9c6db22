//! Per-key aggregate tables and the merge step.
//!
//! Keys are raw station bytes, compared and hashed by content. The fold path
//! looks up by borrowed `&[u8]` first, so a key is only copied into an owned
//! `Box<[u8]>` the first time a table sees it.
//!
//! Merging uses [`StationStats::combine`], which is associative and
//! commutative: folding partial tables in any order, or as a tree, yields the
//! same final table.

use ahash::AHashMap;

use crate::api::StationStats;

/// Mapping from station key to its running aggregate.
#[derive(Clone, Debug, Default)]
pub struct AggregateTable {
    map: AHashMap<Box<[u8]>, StationStats>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<&StationStats> {
        self.map.get(key)
    }

    /// Iterate entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &StationStats)> {
        self.map.iter().map(|(k, v)| (&**k, v))
    }

    /// Fold one observation (tenths) into `key`'s aggregate.
    #[inline]
    pub fn fold(&mut self, key: &[u8], value: i64) {
        match self.map.get_mut(key) {
            Some(stats) => stats.observe(value),
            None => {
                self.map.insert(key.into(), StationStats::single(value));
            }
        }
    }

    /// Combine a partial aggregate into `key`'s aggregate.
    #[inline]
    pub fn combine(&mut self, key: &[u8], partial: &StationStats) {
        match self.map.get_mut(key) {
            Some(stats) => stats.combine(partial),
            None => {
                self.map.insert(key.into(), *partial);
            }
        }
    }

    /// Merge another table into this one, consuming it.
    ///
    /// The larger table is kept as the accumulator so the smaller one is
    /// the one walked; owned keys move across without copying.
    pub fn merge(&mut self, mut other: AggregateTable) {
        if other.map.len() > self.map.len() {
            std::mem::swap(&mut self.map, &mut other.map);
        }
        for (key, partial) in other.map {
            match self.map.get_mut(&key) {
                Some(stats) => stats.combine(&partial),
                None => {
                    self.map.insert(key, partial);
                }
            }
        }
    }

    /// Sum of `count` over all keys: the number of records folded in.
    pub fn total_count(&self) -> u64 {
        self.map.values().map(|s| s.count).sum()
    }

    /// Entries sorted by key bytes (lexicographic).
    pub fn into_sorted(self) -> Vec<(Box<[u8]>, StationStats)> {
        let mut entries: Vec<_> = self.map.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl PartialEq for AggregateTable {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self
                .map
                .iter()
                .all(|(k, v)| other.map.get(&**k) == Some(v))
    }
}

impl Eq for AggregateTable {}

impl<'a> FromIterator<(&'a [u8], i64)> for AggregateTable {
    fn from_iter<I: IntoIterator<Item = (&'a [u8], i64)>>(iter: I) -> Self {
        let mut table = AggregateTable::new();
        for (key, value) in iter {
            table.fold(key, value);
        }
        table
    }
}

/// Left fold of partial tables into one accumulator.
pub fn merge_all<I>(tables: I) -> AggregateTable
where
    I: IntoIterator<Item = AggregateTable>,
{
    tables
        .into_iter()
        .fold(AggregateTable::new(), |mut acc, table| {
            acc.merge(table);
            acc
        })
}

/// Tree-shaped pairwise reduction: neighbours merge level by level.
///
/// Produces the same table as [`merge_all`]; useful when partials are large
/// and similar in size.
pub fn merge_pairwise(mut tables: Vec<AggregateTable>) -> AggregateTable {
    while tables.len() > 1 {
        let mut next = Vec::with_capacity(tables.len().div_ceil(2));
        let mut iter = tables.into_iter();
        while let Some(mut left) = iter.next() {
            if let Some(right) = iter.next() {
                left.merge(right);
            }
            next.push(left);
        }
        tables = next;
    }
    tables.pop().unwrap_or_default()
}
