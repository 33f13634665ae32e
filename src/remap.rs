// glsample is a neighbor sampling library for graph learning systems
// Copyright (C) 2022 Jacob Konrad
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::{hash_map::Entry, HashMap};

/// Insertion ordered bijection from global vertex ids to dense local ids.
///
/// Local ids are handed out as `0, 1, 2, ...` in discovery order and never
/// change, so whatever was inserted first owns the lowest ids.
#[derive(Clone, Debug, Default)]
pub struct NodeRemapper
{
    map: HashMap<u32, u32>,
    keys: Vec<u32>,
}

impl NodeRemapper
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self
    {
        Self {
            map: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
        }
    }

    /// The local id of `global`, assigning the next free one on first sight.
    #[inline]
    pub fn get_or_assign(&mut self, global: u32) -> u32
    {
        match self.map.entry(global) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(hole) => {
                let local = self.keys.len() as u32;
                hole.insert(local);
                self.keys.push(global);
                local
            }
        }
    }

    #[inline]
    pub fn get(&self, global: u32) -> Option<u32>
    {
        self.map.get(&global).copied()
    }

    pub fn contains(&self, global: u32) -> bool
    {
        self.map.contains_key(&global)
    }

    /// Global ids indexed by local id.
    pub fn keys_in_order(&self) -> &[u32]
    {
        &self.keys[..]
    }

    pub fn len(&self) -> usize
    {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.keys.is_empty()
    }

    pub fn into_keys(self) -> Vec<u32>
    {
        self.keys
    }
}

impl Extend<u32> for NodeRemapper
{
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I)
    {
        for global in iter {
            self.get_or_assign(global);
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn assigns_in_discovery_order()
    {
        let mut remap = NodeRemapper::new();
        assert!(remap.is_empty());
        assert_eq!(0, remap.get_or_assign(42));
        assert_eq!(1, remap.get_or_assign(7));
        assert_eq!(0, remap.get_or_assign(42));
        assert_eq!(2, remap.get_or_assign(0));
        assert_eq!(&[42, 7, 0], remap.keys_in_order());
        assert_eq!(3, remap.len());
    }

    #[test]
    fn lookups_do_not_assign()
    {
        let mut remap = NodeRemapper::with_capacity(4);
        remap.extend([5, 6, 5]);
        assert_eq!(Some(1), remap.get(6));
        assert_eq!(None, remap.get(9));
        assert!(remap.contains(5));
        assert!(!remap.contains(9));
        assert_eq!(2, remap.len());
        assert_eq!(vec![5, 6], remap.into_keys());
    }
}
