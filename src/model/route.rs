//! Visit sequences with incrementally maintained cost.

use super::cost::{CostTable, DEFAULT_COST};
use super::region::RegionId;

/// An ordered sequence of region visits.
///
/// Position `i` is visited on day `i`; the leg arriving at position `i` is
/// priced with `costs.get_cost(regions[i - 1], regions[i], i)`, or with the
/// route's default cost when the table has no entry. `total_cost` always
/// equals the sum of all leg prices and is updated in O(1) by
/// [`Route::change`].
///
/// Routes borrow their cost table, so copying one is a single buffer copy.
/// [`Clone::clone_from`] reuses the destination's allocation; the annealer
/// relies on that to keep its per-step snapshots allocation-free.
#[derive(Debug)]
pub struct Route<'c> {
    regions: Vec<RegionId>,
    total_cost: i64,
    costs: &'c CostTable,
    default_cost: i64,
}

impl<'c> Route<'c> {
    /// Empty route priced against `costs`.
    pub fn new(costs: &'c CostTable) -> Self {
        Self::with_default_cost(costs, DEFAULT_COST)
    }

    /// Empty route with a custom price for unknown legs.
    pub fn with_default_cost(costs: &'c CostTable, default_cost: i64) -> Self {
        Self {
            regions: Vec::new(),
            total_cost: 0,
            costs,
            default_cost,
        }
    }

    /// Builds a route from a full visit sequence.
    pub fn from_regions<I>(costs: &'c CostTable, regions: I) -> Self
    where
        I: IntoIterator<Item = RegionId>,
    {
        let mut route = Self::new(costs);
        for region in regions {
            route.add_region(region);
        }
        route
    }

    #[inline]
    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }

    #[inline]
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    #[inline]
    pub fn region(&self, at: usize) -> RegionId {
        self.regions[at]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[inline]
    pub fn costs(&self) -> &'c CostTable {
        self.costs
    }

    #[inline]
    pub fn default_cost(&self) -> i64 {
        self.default_cost
    }

    /// Price of the leg `from -> to` on `day`, substituting the default cost
    /// for a missing entry.
    #[inline]
    pub fn leg_cost(&self, from: RegionId, to: RegionId, day: usize) -> i64 {
        self.costs
            .get_cost(from, to, day as u32)
            .unwrap_or(self.default_cost)
    }

    /// Appends a visit and adds the price of the arriving leg.
    pub fn add_region(&mut self, region: RegionId) {
        if let Some(&last) = self.regions.last() {
            let day = self.regions.len();
            self.total_cost += self.leg_cost(last, region, day);
        }
        self.regions.push(region);
    }

    /// Replaces the visit at position `at` with `region`.
    ///
    /// Only the legs entering and leaving `at` are repriced. `at` must be an
    /// interior or final position (`0 < at < len`); position 0 is the fixed
    /// departure.
    pub fn change(&mut self, region: RegionId, at: usize) {
        debug_assert!(
            at > 0 && at < self.regions.len(),
            "change at {at} outside 1..{}",
            self.regions.len()
        );

        let prev = self.regions[at - 1];
        let old = self.regions[at];
        let mut delta = self.leg_cost(prev, region, at) - self.leg_cost(prev, old, at);

        if let Some(&next) = self.regions.get(at + 1) {
            delta += self.leg_cost(region, next, at + 1) - self.leg_cost(old, next, at + 1);
        }

        self.regions[at] = region;
        self.total_cost += delta;
    }

    /// Sums every leg price from scratch.
    ///
    /// Used to cross-check the incremental total; the optimizer never calls it.
    pub fn recompute_cost(&self) -> i64 {
        self.regions
            .windows(2)
            .enumerate()
            .map(|(i, leg)| self.leg_cost(leg[0], leg[1], i + 1))
            .sum()
    }
}

impl Clone for Route<'_> {
    fn clone(&self) -> Self {
        Self {
            regions: self.regions.clone(),
            total_cost: self.total_cost,
            costs: self.costs,
            default_cost: self.default_cost,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.regions.clone_from(&source.regions);
        self.total_cost = source.total_cost;
        self.costs = source.costs;
        self.default_cost = source.default_cost;
    }
}

impl PartialEq for Route<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.regions == other.regions && self.total_cost == other.total_cost
    }
}

impl Eq for Route<'_> {}
