//! Neighborhood moves over a [`Route`].
//!
//! Both moves sample up to `attempts` random candidates and apply the first
//! one whose new arriving legs have an explicit cost entry. A move that finds
//! no such candidate leaves the route untouched. Neither move ever touches
//! the first or last position, which hold the start region.

use crate::model::{RegionGroups, Route};
use rand::Rng;

/// Move generator bound to one instance's grouping.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    groups: &'a RegionGroups,
    multi_zone: bool,
    attempts: usize,
}

impl<'a> Neighborhood<'a> {
    pub fn new(groups: &'a RegionGroups, multi_zone: bool, attempts: usize) -> Self {
        Self {
            groups,
            multi_zone,
            attempts,
        }
    }

    pub fn is_multi_zone(&self) -> bool {
        self.multi_zone
    }

    /// Applies the move for `step`.
    ///
    /// In multi-zone mode even steps swap positions and odd steps substitute
    /// within a group; otherwise every step swaps positions. Returns whether
    /// the route changed.
    pub fn apply<R: Rng>(&self, step: usize, route: &mut Route<'_>, rng: &mut R) -> bool {
        if self.multi_zone && step % 2 == 1 {
            self.swap_region_in_zone(route, rng)
        } else {
            self.swap_zone(route, rng)
        }
    }

    /// Exchanges the visits at two distinct interior positions.
    ///
    /// For `ai < bi`, the leg from `ai`'s predecessor to the region moving
    /// into `ai` must exist, and so must the leg arriving at `bi` after the
    /// swap (from the old `bi` region when the positions are adjacent).
    pub fn swap_zone<R: Rng>(&self, route: &mut Route<'_>, rng: &mut R) -> bool {
        let n = route.len();
        if n < 4 {
            return false;
        }
        let costs = route.costs();

        for _ in 0..self.attempts {
            let mut ai = rng.random_range(1..n - 1);
            let mut bi = rng.random_range(1..n - 1);
            if ai == bi {
                continue;
            }
            if ai > bi {
                std::mem::swap(&mut ai, &mut bi);
            }

            let a = route.region(ai);
            let b = route.region(bi);

            if !costs.has_cost(route.region(ai - 1), b, ai as u32) {
                continue;
            }
            let into_b = if ai + 1 == bi { b } else { route.region(bi - 1) };
            if !costs.has_cost(into_b, a, bi as u32) {
                continue;
            }

            route.change(a, bi);
            route.change(b, ai);
            return true;
        }
        false
    }

    /// Replaces an interior visit with another member of its group.
    ///
    /// With exactly two members the other one is taken; with more, a random
    /// different member is drawn. Single-member groups offer no move.
    pub fn swap_region_in_zone<R: Rng>(&self, route: &mut Route<'_>, rng: &mut R) -> bool {
        let n = route.len();
        if n < 3 {
            return false;
        }
        let costs = route.costs();

        for _ in 0..self.attempts {
            let at = rng.random_range(1..n - 1);
            let current = route.region(at);
            let alternatives = self.groups.alternatives_of(current);

            let candidate = match alternatives {
                [] | [_] => continue,
                [first, second] => {
                    if *first == current {
                        *second
                    } else {
                        *first
                    }
                }
                _ => {
                    let pick = alternatives[rng.random_range(0..alternatives.len())];
                    if pick == current {
                        continue;
                    }
                    pick
                }
            };

            if !costs.has_cost(route.region(at - 1), candidate, at as u32) {
                continue;
            }

            route.change(candidate, at);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CostTable, RegionId, RegionIndex};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        index: RegionIndex,
        groups: RegionGroups,
        costs: CostTable,
    }

    impl Fixture {
        fn id(&self, name: &str) -> RegionId {
            self.index.get(name).unwrap()
        }
    }

    /// Start `S`, single-member groups `A`..`D`, plus a two-member group
    /// `{E, F}` and a three-member group `{G, H, I}`. Every ordered pair has
    /// a day-independent cost.
    fn fixture() -> Fixture {
        let mut index = RegionIndex::new();
        let mut groups = RegionGroups::new();
        let names = ["S", "A", "B", "C", "D", "E", "F", "G", "H", "I"];
        let ids: Vec<RegionId> = names.iter().map(|n| index.intern(n)).collect();
        groups.add_region("s", &[ids[0]]);
        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            groups.add_region(name, &[ids[i + 1]]);
        }
        groups.add_region("ef", &[ids[5], ids[6]]);
        groups.add_region("ghi", &[ids[7], ids[8], ids[9]]);

        let mut costs = CostTable::new();
        for (i, &from) in ids.iter().enumerate() {
            for (j, &to) in ids.iter().enumerate() {
                if i != j {
                    costs.add_cost(from, to, 0, ((i * 7 + j * 3) % 11 + 1) as i64);
                }
            }
        }
        Fixture {
            index,
            groups,
            costs,
        }
    }

    fn route<'c>(f: &'c Fixture, names: &[&str]) -> Route<'c> {
        Route::from_regions(&f.costs, names.iter().map(|n| f.id(n)))
    }

    #[test]
    fn test_swap_zone_exchanges_two_interior_visits() {
        let f = fixture();
        let moves = Neighborhood::new(&f.groups, false, 10);
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = route(&f, &["S", "A", "B", "C", "D", "S"]);
        let before: Vec<RegionId> = r.regions().to_vec();

        assert!(moves.swap_zone(&mut r, &mut rng));

        let diff: Vec<usize> = (0..r.len()).filter(|&i| r.region(i) != before[i]).collect();
        assert_eq!(diff.len(), 2);
        assert_eq!(r.region(diff[0]), before[diff[1]]);
        assert_eq!(r.region(diff[1]), before[diff[0]]);
        assert_eq!(r.total_cost(), r.recompute_cost());
    }

    #[test]
    fn test_swap_zone_needs_two_interior_positions() {
        let f = fixture();
        let moves = Neighborhood::new(&f.groups, false, 10);
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = route(&f, &["S", "A", "S"]);
        assert!(!moves.swap_zone(&mut r, &mut rng));
    }

    #[test]
    fn test_swap_zone_requires_explicit_legs() {
        let f = fixture();
        let index = &f.index;
        let s = index.get("S").unwrap();
        let a = index.get("A").unwrap();
        let b = index.get("B").unwrap();
        // Only the current legs exist; any swap needs S->B which is missing.
        let mut costs = CostTable::new();
        costs.add_cost(s, a, 0, 1);
        costs.add_cost(a, b, 0, 1);
        costs.add_cost(b, s, 0, 1);
        let moves = Neighborhood::new(&f.groups, false, 10);
        let mut rng = StdRng::seed_from_u64(3);
        let mut r = Route::from_regions(&costs, [s, a, b, s]);

        assert!(!moves.swap_zone(&mut r, &mut rng));
        assert_eq!(r.regions(), &[s, a, b, s]);
        assert_eq!(r.total_cost(), 3);
    }

    #[test]
    fn test_region_in_zone_two_members_is_deterministic() {
        let f = fixture();
        let moves = Neighborhood::new(&f.groups, true, 10);
        let mut rng = StdRng::seed_from_u64(5);
        let mut r = route(&f, &["S", "E", "S"]);

        assert!(moves.swap_region_in_zone(&mut r, &mut rng));
        assert_eq!(r.region(1), f.id("F"));
        assert!(moves.swap_region_in_zone(&mut r, &mut rng));
        assert_eq!(r.region(1), f.id("E"));
    }

    #[test]
    fn test_region_in_zone_picks_different_member() {
        let f = fixture();
        let moves = Neighborhood::new(&f.groups, true, 50);
        let mut rng = StdRng::seed_from_u64(9);
        let group = f.groups.members("ghi").unwrap().to_vec();

        for _ in 0..20 {
            let mut r = route(&f, &["S", "G", "S"]);
            assert!(moves.swap_region_in_zone(&mut r, &mut rng));
            assert_ne!(r.region(1), f.id("G"));
            assert!(group.contains(&r.region(1)));
            assert_eq!(r.total_cost(), r.recompute_cost());
        }
    }

    #[test]
    fn test_region_in_zone_single_member_groups_are_noop() {
        let f = fixture();
        let moves = Neighborhood::new(&f.groups, true, 10);
        let mut rng = StdRng::seed_from_u64(2);
        let mut r = route(&f, &["S", "A", "B", "S"]);
        assert!(!moves.swap_region_in_zone(&mut r, &mut rng));
        assert_eq!(r, route(&f, &["S", "A", "B", "S"]));
    }

    #[test]
    fn test_moves_never_touch_anchors() {
        let f = fixture();
        let moves = Neighborhood::new(&f.groups, true, 10);
        let mut rng = StdRng::seed_from_u64(11);
        let mut r = route(&f, &["S", "A", "E", "B", "G", "C", "D", "S"]);
        let s = f.id("S");

        for step in 0..2000 {
            moves.apply(step, &mut r, &mut rng);
            assert_eq!(r.region(0), s);
            assert_eq!(r.region(r.len() - 1), s);
        }
        assert_eq!(r.total_cost(), r.recompute_cost());
    }

    #[test]
    fn test_single_zone_mode_only_swaps() {
        let f = fixture();
        let moves = Neighborhood::new(&f.groups, false, 10);
        let mut rng = StdRng::seed_from_u64(4);
        let mut r = route(&f, &["S", "E", "G", "S"]);
        let members: Vec<RegionId> = vec![f.id("E"), f.id("G")];

        for step in 0..200 {
            moves.apply(step, &mut r, &mut rng);
            let mut interior = r.regions()[1..3].to_vec();
            interior.sort();
            let mut expected = members.clone();
            expected.sort();
            assert_eq!(interior, expected);
        }
    }
}
