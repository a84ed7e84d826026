//! A fully loaded problem instance.

use super::cost::CostTable;
use super::groups::RegionGroups;
use super::region::{RegionId, RegionIndex};
use super::route::Route;
use rand::Rng;

/// Everything the optimizer needs to know about one problem.
///
/// Produced by [`crate::io::parse_instance`] or assembled by hand in tests.
#[derive(Debug, Clone)]
pub struct Instance {
    pub regions: RegionIndex,
    pub groups: RegionGroups,
    pub costs: CostTable,
    /// Region the tour departs from and returns to.
    pub start: RegionId,
    /// Number of groups the input declared.
    pub required_visits: usize,
    /// Sum of member counts over all groups.
    pub total_regions: usize,
}

impl Instance {
    /// Whether some group offers more than one candidate, which makes the
    /// intra-group substitution move meaningful.
    pub fn is_multi_zone(&self) -> bool {
        self.total_regions > self.required_visits
    }

    /// Builds the starting tour: the start region, one randomly chosen member
    /// of every group that does not contain the start, then the start again.
    pub fn initial_route<R: Rng>(&self, rng: &mut R) -> Route<'_> {
        let mut route = Route::new(&self.costs);
        route.add_region(self.start);

        for (_, members) in self.groups.iter() {
            if members.is_empty() || members.contains(&self.start) {
                continue;
            }
            route.add_region(members[rng.random_range(0..members.len())]);
        }

        route.add_region(self.start);
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instance() -> Instance {
        let mut regions = RegionIndex::new();
        let mut groups = RegionGroups::new();
        let home = regions.intern("HOME");
        let a1 = regions.intern("A1");
        let a2 = regions.intern("A2");
        let b = regions.intern("B");
        groups.add_region("home", &[home]);
        groups.add_region("a", &[a1, a2]);
        groups.add_region("b", &[b]);
        Instance {
            total_regions: groups.total_regions(),
            required_visits: groups.len(),
            regions,
            groups,
            costs: CostTable::new(),
            start: home,
        }
    }

    #[test]
    fn test_initial_route_shape() {
        let instance = instance();
        let mut rng = StdRng::seed_from_u64(7);
        let route = instance.initial_route(&mut rng);

        assert_eq!(route.len(), 4);
        assert_eq!(route.region(0), instance.start);
        assert_eq!(route.region(3), instance.start);

        let a = route.region(1);
        assert_eq!(instance.groups.group_of(a), Some("a"));
        assert_eq!(instance.regions.name(route.region(2)), "B");
    }

    #[test]
    fn test_multi_zone_detection() {
        let mut instance = instance();
        assert!(instance.is_multi_zone());
        instance.total_regions = instance.required_visits;
        assert!(!instance.is_multi_zone());
    }
}
