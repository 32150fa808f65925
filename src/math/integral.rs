//! Summed-area table over the unknown mask
//!
//! Answers "how many unknown pixels lie in this rectangle" in constant time, which
//! turns the fully-known test for every candidate patch into four lookups.

use ndarray::Array2;
use std::ops::Range;

/// Prefix sums of unknown pixels, one row and column larger than the mask
#[derive(Debug, Clone)]
pub struct UnknownIntegral {
    sums: Array2<usize>,
}

impl UnknownIntegral {
    /// Build the table from a mask (`true` = unknown)
    pub fn build(mask: &Array2<bool>) -> Self {
        let (rows, cols) = mask.dim();
        let mut sums = Array2::zeros((rows + 1, cols + 1));

        for r in 0..rows {
            let mut row_sum = 0;
            for c in 0..cols {
                if mask.get([r, c]).copied().unwrap_or(false) {
                    row_sum += 1;
                }
                let above = sums.get([r, c + 1]).copied().unwrap_or(0);
                if let Some(cell) = sums.get_mut([r + 1, c + 1]) {
                    *cell = above + row_sum;
                }
            }
        }

        Self { sums }
    }

    fn at(&self, r: usize, c: usize) -> usize {
        self.sums.get([r, c]).copied().unwrap_or(0)
    }

    /// Unknown pixels inside a rectangle
    ///
    /// Spans are clamped to the mask dimensions.
    pub fn count(&self, rows: &Range<usize>, cols: &Range<usize>) -> usize {
        let (height, width) = self.sums.dim();
        let r0 = rows.start.min(height - 1);
        let r1 = rows.end.min(height - 1).max(r0);
        let c0 = cols.start.min(width - 1);
        let c1 = cols.end.min(width - 1).max(c0);

        (self.at(r1, c1) + self.at(r0, c0)) - (self.at(r0, c1) + self.at(r1, c0))
    }

    /// Whether a rectangle contains no unknown pixel
    pub fn is_known(&self, rows: &Range<usize>, cols: &Range<usize>) -> bool {
        self.count(rows, cols) == 0
    }

    /// Total unknown pixels in the mask
    pub fn total(&self) -> usize {
        let (height, width) = self.sums.dim();
        self.at(height - 1, width - 1)
    }
}
