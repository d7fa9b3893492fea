use std::fmt;

use crate::data::filter::STAGE_COUNT;

// ---------------------------------------------------------------------------
// StageMask – a set of stage indices
// ---------------------------------------------------------------------------

/// Bitset over the pipeline's stages. Used both for dirty tracking and for the
/// set of stages a pass evaluates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StageMask(u8);

impl StageMask {
    pub const EMPTY: StageMask = StageMask(0);
    pub const ALL: StageMask = StageMask((1 << STAGE_COUNT) - 1);

    pub fn single(index: usize) -> Self {
        debug_assert!(index < STAGE_COUNT);
        StageMask(1 << index)
    }

    /// `index` and every stage after it.
    pub fn from_stage(index: usize) -> Self {
        if index >= STAGE_COUNT {
            return Self::EMPTY;
        }
        StageMask(Self::ALL.0 & !((1u8 << index) - 1))
    }

    pub fn contains(self, index: usize) -> bool {
        index < STAGE_COUNT && self.0 & (1 << index) != 0
    }

    pub fn insert(&mut self, index: usize) {
        *self = self.union(Self::single(index));
    }

    pub fn union(self, other: StageMask) -> StageMask {
        StageMask(self.0 | other.0)
    }

    pub fn difference(self, other: StageMask) -> StageMask {
        StageMask(self.0 & !other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Lowest stage index in the set.
    pub fn first(self) -> Option<usize> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as usize)
    }

    /// Stage indices in ascending pipeline order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..STAGE_COUNT).filter(move |&i| self.contains(i))
    }
}

impl FromIterator<usize> for StageMask {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        iter.into_iter().fold(StageMask::EMPTY, |mut m, i| {
            m.insert(i);
            m
        })
    }
}

impl fmt::Display for StageMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idx: Vec<String> = self.iter().map(|i| i.to_string()).collect();
        write!(f, "{{{}}}", idx.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_stage_is_the_suffix() {
        assert_eq!(StageMask::from_stage(0), StageMask::ALL);
        assert_eq!(StageMask::from_stage(2).iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(StageMask::from_stage(4), StageMask::single(4));
        assert!(StageMask::from_stage(STAGE_COUNT).is_empty());
    }

    #[test]
    fn set_operations() {
        let m: StageMask = [1, 3].into_iter().collect();
        assert_eq!(m.len(), 2);
        assert_eq!(m.first(), Some(1));
        assert!(m.contains(3) && !m.contains(2));
        assert_eq!(StageMask::ALL.difference(m).iter().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(m.union(StageMask::single(0)).first(), Some(0));
        assert_eq!(StageMask::EMPTY.first(), None);
        assert_eq!(m.to_string(), "{1,3}");
    }
}
