//! Day-dependent traversal costs.

use super::region::RegionId;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Penalty charged for a leg whose cost is unknown.
///
/// Large enough that the optimizer steers away from such legs, but finite so
/// a route containing one still has a comparable energy.
pub const DEFAULT_COST: i64 = 10_000;

/// Day value under which a day-independent cost is stored.
pub const ANY_DAY: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CostKey {
    from: RegionId,
    to: RegionId,
    day: u32,
}

/// Immutable mapping `(from, to, day) -> cost`.
///
/// Lookups first try the exact day, then the same leg stored under
/// [`ANY_DAY`]. Reads take no lock; the table is meant to be shared by
/// reference across worker threads once built.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    entries: HashMap<CostKey, i64>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites an entry.
    pub fn add_cost(&mut self, from: RegionId, to: RegionId, day: u32, cost: i64) {
        self.entries.insert(CostKey { from, to, day }, cost);
    }

    /// Cost of travelling `from -> to` on `day`.
    ///
    /// Returns `None` when neither the day-specific nor the day-independent
    /// entry exists. Callers decide how to price a missing leg.
    #[inline]
    pub fn get_cost(&self, from: RegionId, to: RegionId, day: u32) -> Option<i64> {
        self.entries
            .get(&CostKey { from, to, day })
            .or_else(|| self.entries.get(&CostKey { from, to, day: ANY_DAY }))
            .copied()
    }

    /// Whether `get_cost` would resolve.
    #[inline]
    pub fn has_cost(&self, from: RegionId, to: RegionId, day: u32) -> bool {
        self.get_cost(from, to, day).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<(RegionId, RegionId, u32, i64)> for CostTable {
    fn extend<I: IntoIterator<Item = (RegionId, RegionId, u32, i64)>>(&mut self, iter: I) {
        for (from, to, day, cost) in iter {
            self.add_cost(from, to, day, cost);
        }
    }
}

impl FromIterator<(RegionId, RegionId, u32, i64)> for CostTable {
    fn from_iter<I: IntoIterator<Item = (RegionId, RegionId, u32, i64)>>(iter: I) -> Self {
        let mut table = CostTable::new();
        table.extend(iter);
        table
    }
}

/// Thread-safe accumulator for a [`CostTable`].
///
/// Concurrent `add_cost` calls are serialized by a mutex. Call
/// [`CostTableBuilder::build`] once loading is done to get the lock-free
/// table.
#[derive(Debug, Default)]
pub struct CostTableBuilder {
    table: Mutex<CostTable>,
}

impl CostTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cost(&self, from: RegionId, to: RegionId, day: u32, cost: i64) {
        self.table.lock().add_cost(from, to, day, cost);
    }

    /// Inserts a batch under a single lock acquisition.
    pub fn add_costs<I>(&self, batch: I)
    where
        I: IntoIterator<Item = (RegionId, RegionId, u32, i64)>,
    {
        self.table.lock().extend(batch);
    }

    pub fn build(self) -> CostTable {
        self.table.into_inner()
    }
}
