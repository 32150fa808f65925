use bitvec::prelude::*;
use std::ops::Range;

use crate::spatial::state::ImageState;

/// 4-connected neighbour offsets: up, left, right, down
const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Membership bitset of the fill front
///
/// A pixel is on the front when it is unknown and at least one of its
/// 4-connected neighbours inside the buffer is known. Bits are stored in
/// row-major order, so reading them out yields a row-major scan.
#[derive(Clone, Debug)]
pub struct FrontTracker {
    bits: BitVec,
    dimensions: (usize, usize),
}

impl FrontTracker {
    /// Scan the whole mask and collect the front
    pub fn build(state: &ImageState) -> Self {
        let dimensions = state.dimensions();
        let mut tracker = Self {
            bits: bitvec![0; dimensions.0 * dimensions.1],
            dimensions,
        };
        tracker.refresh_region(state, 0..dimensions.0, 0..dimensions.1);
        tracker
    }

    /// Recompute membership for every pixel inside the given spans
    ///
    /// Spans are clamped to the buffer. Only pixels whose own mask value or
    /// whose neighbours changed can move in or out of the front, so callers
    /// pass the modified footprint plus a margin.
    pub fn refresh_region(&mut self, state: &ImageState, rows: Range<usize>, cols: Range<usize>) {
        let rows = rows.start..rows.end.min(self.dimensions.0);
        let cols = cols.start..cols.end.min(self.dimensions.1);

        for r in rows {
            for c in cols.clone() {
                let on_front = is_front_pixel(state, [r, c]);
                let index = r * self.dimensions.1 + c;
                if let Some(mut bit) = self.bits.get_mut(index) {
                    *bit = on_front;
                }
            }
        }
    }

    /// Front pixels in row-major order
    pub fn current_front(&self) -> Vec<[usize; 2]> {
        let cols = self.dimensions.1.max(1);
        self.bits
            .iter_ones()
            .map(|index| [index / cols, index % cols])
            .collect()
    }

    /// Test front membership
    pub fn contains(&self, position: [usize; 2]) -> bool {
        if position[0] >= self.dimensions.0 || position[1] >= self.dimensions.1 {
            return false;
        }
        let index = position[0] * self.dimensions.1 + position[1];
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Number of front pixels
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// Whether the front is empty
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }
}

/// Whether an unknown pixel touches a known 4-connected neighbour
pub fn is_front_pixel(state: &ImageState, position: [usize; 2]) -> bool {
    if !state.is_unknown(position) {
        return false;
    }

    let (rows, cols) = state.dimensions();
    NEIGHBOURS.iter().any(|&(dr, dc)| {
        match (
            position[0].checked_add_signed(dr),
            position[1].checked_add_signed(dc),
        ) {
            (Some(r), Some(c)) if r < rows && c < cols => !state.is_unknown([r, c]),
            _ => false,
        }
    })
}
