//! Groups of mutually substitutable regions.

use super::region::RegionId;
use std::collections::HashMap;

/// Partition of regions into named groups (zones).
///
/// A tour visits one member of each group; any member is an acceptable
/// stand-in for the others. Groups keep insertion order so that the initial
/// route and the rendered output are stable for a given input.
#[derive(Debug, Clone, Default)]
pub struct RegionGroups {
    names: Vec<String>,
    members: Vec<Vec<RegionId>>,
    by_name: HashMap<String, usize>,
    group_of: HashMap<RegionId, usize>,
}

impl RegionGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `regions` to `group`, creating the group if needed.
    ///
    /// A region added to a second group is moved there for reverse lookups;
    /// well-formed input never does this.
    pub fn add_region(&mut self, group: &str, regions: &[RegionId]) {
        let slot = match self.by_name.get(group) {
            Some(&slot) => slot,
            None => {
                let slot = self.names.len();
                self.names.push(group.to_owned());
                self.members.push(Vec::new());
                self.by_name.insert(group.to_owned(), slot);
                slot
            }
        };
        self.members[slot].extend_from_slice(regions);
        for &region in regions {
            self.group_of.insert(region, slot);
        }
    }

    /// All members of `region`'s group, `region` included.
    ///
    /// Returns an empty slice for a region that belongs to no group.
    pub fn alternatives_of(&self, region: RegionId) -> &[RegionId] {
        match self.group_of.get(&region) {
            Some(&slot) => &self.members[slot],
            None => &[],
        }
    }

    /// Name of the group holding `region`.
    pub fn group_of(&self, region: RegionId) -> Option<&str> {
        self.group_of
            .get(&region)
            .map(|&slot| self.names[slot].as_str())
    }

    /// Members of the named group.
    pub fn members(&self, group: &str) -> Option<&[RegionId]> {
        self.by_name
            .get(group)
            .map(|&slot| self.members[slot].as_slice())
    }

    /// Iterates `(group name, members)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RegionId])> {
        self.names
            .iter()
            .zip(self.members.iter())
            .map(|(n, m)| (n.as_str(), m.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Sum of member counts over all groups.
    pub fn total_regions(&self) -> usize {
        self.members.iter().map(Vec::len).sum()
    }
}
