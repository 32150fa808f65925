//! Square patch footprints and clamped region spans
//!
//! A patch is never stored: it is a centre plus a half-width, resolved against the
//! buffer dimensions on demand. Footprints are `2 * half + 1` pixels wide, so even
//! window sizes round up to the next odd footprint.

use std::ops::Range;

/// Square footprint centred on a buffer pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchWindow {
    /// Centre pixel (row, col)
    pub center: [usize; 2],
    /// Pixels on each side of the centre
    pub half: usize,
}

impl PatchWindow {
    /// Create the footprint of a `window`-wide patch centred on `center`
    pub const fn new(center: [usize; 2], window: usize) -> Self {
        Self {
            center,
            half: window / 2,
        }
    }

    /// Footprint width in pixels
    pub const fn width(&self) -> usize {
        2 * self.half + 1
    }

    /// Nominal footprint area, independent of clamping
    pub const fn area(&self) -> usize {
        self.width() * self.width()
    }

    /// Whether the whole footprint lies inside a buffer of the given dimensions
    pub const fn is_interior(&self, dimensions: (usize, usize)) -> bool {
        self.center[0] >= self.half
            && self.center[1] >= self.half
            && self.center[0] + self.half < dimensions.0
            && self.center[1] + self.half < dimensions.1
    }

    /// Row and column spans of the footprint, clamped to the buffer
    pub fn spans(&self, dimensions: (usize, usize)) -> (Range<usize>, Range<usize>) {
        region_spans(self.center, self.half, dimensions)
    }

    /// Spans of the footprint grown by `margin` on every side, clamped to the buffer
    pub fn expanded_spans(
        &self,
        margin: usize,
        dimensions: (usize, usize),
    ) -> (Range<usize>, Range<usize>) {
        region_spans(self.center, self.half + margin, dimensions)
    }

    /// Buffer positions covered by the clamped footprint, in row-major order
    pub fn positions(
        &self,
        dimensions: (usize, usize),
    ) -> impl Iterator<Item = [usize; 2]> + use<> {
        let (rows, cols) = self.spans(dimensions);
        rows.flat_map(move |r| cols.clone().map(move |c| [r, c]))
    }

    /// Map a position in this footprint onto the same offset in `other`
    ///
    /// Returns `None` when the translated position would be negative.
    pub fn translate(&self, position: [usize; 2], other: &Self) -> Option<[usize; 2]> {
        let row = (position[0] + other.center[0]).checked_sub(self.center[0])?;
        let col = (position[1] + other.center[1]).checked_sub(self.center[1])?;
        Some([row, col])
    }
}

/// Get clamped row and column spans for a square region
///
/// Covers `center ± radius` on both axes, clipped to `0..dimensions`.
pub fn region_spans(
    center: [usize; 2],
    radius: usize,
    dimensions: (usize, usize),
) -> (Range<usize>, Range<usize>) {
    let row_start = center[0].saturating_sub(radius);
    let col_start = center[1].saturating_sub(radius);
    let row_end = center[0].saturating_add(radius + 1).min(dimensions.0);
    let col_end = center[1].saturating_add(radius + 1).min(dimensions.1);

    (row_start..row_end.max(row_start), col_start..col_end.max(col_start))
}
