//! Region identifiers and the name interner.

use std::collections::HashMap;
use std::fmt;

/// Compact handle for a region name.
///
/// Routes and cost lookups work on `RegionId`s so that copying a route or
/// hashing a cost key never touches string data. Names are recovered through
/// the [`RegionIndex`] that issued the id.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u32);

impl RegionId {
    /// Position of this region in its index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional mapping between region names and [`RegionId`]s.
///
/// Ids are dense and assigned in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    ids: HashMap<String, RegionId>,
    names: Vec<String>,
}

impl RegionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `name`, assigning a fresh one on first sight.
    pub fn intern(&mut self, name: &str) -> RegionId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = RegionId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    /// Looks up an already interned name.
    pub fn get(&self, name: &str) -> Option<RegionId> {
        self.ids.get(name).copied()
    }

    /// Name of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different index.
    pub fn name(&self, id: RegionId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (RegionId(i as u32), n.as_str()))
    }
}
