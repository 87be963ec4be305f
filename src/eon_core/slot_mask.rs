use std::{fmt::Display, ops::{ BitOr, BitOrAssign, Index, IndexMut }};

/// Occupancy mask of a spectrum grid. `true` means the slot is taken.
///
/// Masks of several links are OR-ed together to find slots that are free on
/// a whole route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMask(Vec<bool>);

impl BitOr for SlotMask {
    type Output = SlotMask;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self |= rhs;
        self
    }
}

impl BitOrAssign for SlotMask {
    fn bitor_assign(&mut self, rhs: Self) {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        for (self_s, &rhs_s) in self.0.iter_mut().zip(rhs.0.iter()) {
            *self_s |= rhs_s;
        }
    }
}

impl Index<usize> for SlotMask {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for SlotMask {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl SlotMask {
    pub fn new(slot_count: usize) -> SlotMask {
        Self(vec![false; slot_count])
    }

    pub fn new_fulfilled(slot_count: usize) -> SlotMask {
        Self(vec![true; slot_count])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|x| !*x)
    }

    pub fn are_slots_empty(&self, slot: usize, width: usize) -> bool {
        if slot + width > self.0.len() {
            return false;
        }
        self.0[slot..slot + width].iter().all(|s| !*s)
    }

    /// Lowest index `i` such that `[i, i + size)` is entirely free.
    pub fn get_empty_contiguous_slots(&self, size: usize) -> Option<usize> {
        if size == 0 || size > self.0.len() {
            return None;
        }

        let mut target_mask = self.clone();
        let mut mask_for_shift = self.clone();

        for _ in 0..size - 1 {
            mask_for_shift.r_shift();
            target_mask |= mask_for_shift.clone();
        }

        target_mask.0.iter().position(|x| !*x)
    }

    /// Moves every slot one position towards index 0, filling the tail with
    /// an occupied slot.
    fn r_shift(&mut self) {
        let mut prev_s = true;
        for s in self.0.iter_mut().rev() {
            std::mem::swap(&mut *s, &mut prev_s);
        }
    }
}

impl Display for SlotMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in &self.0 {
            if *element {
                write!(f, "█")?;
            } else {
                write!(f, "▏")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(bits: &[u8]) -> SlotMask {
        let mut m = SlotMask::new(bits.len());
        for (i, b) in bits.iter().enumerate() {
            m[i] = *b == 1;
        }
        m
    }

    #[test]
    fn first_fit_on_empty_mask() {
        let m = SlotMask::new(8);
        assert_eq!(m.get_empty_contiguous_slots(1), Some(0));
        assert_eq!(m.get_empty_contiguous_slots(8), Some(0));
        assert_eq!(m.get_empty_contiguous_slots(9), None);
        assert_eq!(m.get_empty_contiguous_slots(0), None);
    }

    #[test]
    fn first_fit_skips_fragments() {
        let m = mask(&[1, 0, 1, 0, 0, 1, 0, 0, 0]);
        assert_eq!(m.get_empty_contiguous_slots(1), Some(1));
        assert_eq!(m.get_empty_contiguous_slots(2), Some(3));
        assert_eq!(m.get_empty_contiguous_slots(3), Some(6));
        assert_eq!(m.get_empty_contiguous_slots(4), None);
    }

    #[test]
    fn block_may_end_on_the_last_slot() {
        let m = mask(&[1, 1, 0, 0]);
        assert_eq!(m.get_empty_contiguous_slots(2), Some(2));
        assert!(m.are_slots_empty(2, 2));
        assert!(!m.are_slots_empty(3, 2));
    }

    #[test]
    fn union_of_masks() {
        let a = mask(&[1, 0, 0, 0]);
        let b = mask(&[0, 1, 0, 0]);
        let u = a | b;
        assert_eq!(u, mask(&[1, 1, 0, 0]));
        assert_eq!(u.get_empty_contiguous_slots(2), Some(2));
        assert!(SlotMask::new_fulfilled(3).get_empty_contiguous_slots(1).is_none());
    }
}
