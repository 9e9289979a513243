use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::bitset::bitset_traits;
use crate::Side;

const VALID_BITS: u8 = 0b1111;

/// A compact set of [`Side`]s.
///
/// Supports intersection (`&`), union (`|`), symmetric difference (`^`)
/// and complement (`!`).
/// Iterating yields the members in canonical order (north, east, south, west).
///
/// ```
/// use obidos::{Side, SideSet};
/// let set = SideSet::new().insert(Side::West).insert(Side::North);
/// assert_eq!(Vec::from_iter(set), vec![Side::North, Side::West]);
/// assert_eq!(Vec::from_iter(!set), vec![Side::East, Side::South]);
/// ```
///
/// This is an immutable type, so its "mutating" methods return a new value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Side>", from = "Vec<Side>")]
pub struct SideSet {
    // Only the low 4 bits are used.
    bits: u8,
}

bitset_traits!(SideSet, VALID_BITS);

impl SideSet {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        Self { bits: VALID_BITS }
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, side: Side) -> bool {
        self.bits & (1 << side as u8) != 0
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn insert(self, side: Side) -> Self {
        Self {
            bits: self.bits | (1 << side as u8),
        }
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn remove(self, side: Side) -> Self {
        Self {
            bits: self.bits & !(1 << side as u8),
        }
    }

    /// Rotates every member by `by`.
    #[must_use]
    pub fn rotate(self, by: Side) -> Self {
        let shift = by as u8;
        Self {
            bits: ((self.bits << shift) | (self.bits >> (4 - shift))) & VALID_BITS,
        }
    }

    /// The first member in canonical order.
    pub fn first(self) -> Option<Side> {
        self.into_iter().next()
    }
}

impl std::fmt::Debug for SideSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

impl FromIterator<Side> for SideSet {
    fn from_iter<T: IntoIterator<Item = Side>>(iter: T) -> Self {
        let mut set = SideSet::new();
        for side in iter {
            set = set.insert(side);
        }
        set
    }
}

impl From<Vec<Side>> for SideSet {
    fn from(sides: Vec<Side>) -> Self {
        Self::from_iter(sides)
    }
}

impl From<SideSet> for Vec<Side> {
    fn from(set: SideSet) -> Self {
        Vec::from_iter(set)
    }
}

impl IntoIterator for SideSet {
    type Item = Side;

    type IntoIter = SideSetIter;

    fn into_iter(self) -> Self::IntoIter {
        SideSetIter { bits: self.bits }
    }
}

#[derive(Clone, Copy)]
pub struct SideSetIter {
    bits: u8,
}

impl Iterator for SideSetIter {
    type Item = Side;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(Side::from_index(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for SideSetIter {}

impl FusedIterator for SideSetIter {}
