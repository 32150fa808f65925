//! Padded image, mask and confidence buffers shared by every engine stage
//!
//! All three buffers have the same shape. The image and confidence buffers are
//! only written through [`ImageState::commit_patch`], and only at positions the
//! mask still marks unknown, so originally known pixels keep their value and a
//! confidence of 1.0 for the whole run.

use ndarray::Array2;

use crate::io::configuration::MAX_BUFFER_DIMENSION;
use crate::io::error::{InpaintError, Result, invalid_parameter, invalid_source};
use crate::spatial::patch::PatchWindow;

/// Engine state: padded intensities, unknown mask and per-pixel confidence
#[derive(Debug, Clone)]
pub struct ImageState {
    image: Array2<f64>,
    /// `true` marks a pixel that still has to be synthesized
    mask: Array2<bool>,
    confidence: Array2<f64>,
    window: usize,
    unknown_count: usize,
}

impl ImageState {
    /// Build the state from a padded image and mask
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `window` is zero or wider than the smallest buffer dimension
    /// - The image and mask shapes differ
    /// - A buffer dimension exceeds [`MAX_BUFFER_DIMENSION`]
    /// - An image value is not finite or lies outside `[0, 1]`
    /// - The padding ring contains unknown pixels
    pub fn new(image: Array2<f64>, mask: Array2<bool>, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(invalid_parameter("window", &window, &"must be positive"));
        }

        let dimensions = image.dim();
        if mask.dim() != dimensions {
            return Err(InpaintError::ShapeMismatch {
                image: dimensions,
                mask: mask.dim(),
            });
        }

        if dimensions.0.max(dimensions.1) > MAX_BUFFER_DIMENSION {
            return Err(invalid_source(&format!(
                "buffer of {}x{} exceeds the {MAX_BUFFER_DIMENSION} pixel limit",
                dimensions.0, dimensions.1
            )));
        }

        if window > dimensions.0.min(dimensions.1) {
            return Err(invalid_parameter(
                "window",
                &window,
                &format!(
                    "must not exceed the smallest buffer dimension of {}x{}",
                    dimensions.0, dimensions.1
                ),
            ));
        }

        if let Some(bad) = image.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(invalid_source(&format!(
                "image value {bad} is outside [0, 1]"
            )));
        }

        let half = window / 2;
        let trailing = window - 1 - half;
        for ((r, c), &unknown) in mask.indexed_iter() {
            let in_ring = r < half
                || c < half
                || r + trailing >= dimensions.0
                || c + trailing >= dimensions.1;
            if unknown && in_ring {
                return Err(invalid_source(&format!(
                    "masked pixel ({r}, {c}) lies in the padding ring"
                )));
            }
        }

        let confidence = mask.mapv(|unknown| if unknown { 0.0 } else { 1.0 });
        let unknown_count = mask.iter().filter(|&&unknown| unknown).count();

        Ok(Self {
            image,
            mask,
            confidence,
            window,
            unknown_count,
        })
    }

    /// Padded image buffer
    pub const fn image(&self) -> &Array2<f64> {
        &self.image
    }

    /// Unknown mask (`true` = unknown)
    pub const fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    /// Per-pixel confidence buffer
    pub const fn confidence(&self) -> &Array2<f64> {
        &self.confidence
    }

    /// Buffer dimensions (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        self.image.dim()
    }

    /// Patch window width
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Pixels on each side of a patch centre
    pub const fn half_window(&self) -> usize {
        self.window / 2
    }

    /// Number of pixels still unknown
    pub const fn unknown_count(&self) -> usize {
        self.unknown_count
    }

    /// Intensity at a position, `None` outside the buffer
    pub fn value(&self, position: [usize; 2]) -> Option<f64> {
        self.image.get(position).copied()
    }

    /// Whether a position is unknown; positions outside the buffer count as known
    pub fn is_unknown(&self, position: [usize; 2]) -> bool {
        self.mask.get(position).copied().unwrap_or(false)
    }

    /// Confidence at a position, 0.0 outside the buffer
    pub fn confidence_at(&self, position: [usize; 2]) -> f64 {
        self.confidence.get(position).copied().unwrap_or(0.0)
    }

    /// Footprint of the patch centred on `center`
    pub const fn patch(&self, center: [usize; 2]) -> PatchWindow {
        PatchWindow::new(center, self.window)
    }

    /// Copy of the clamped patch footprint centred on `center`
    pub fn extract_patch(&self, center: [usize; 2]) -> Array2<f64> {
        let (rows, cols) = self.patch(center).spans(self.dimensions());
        let row_start = rows.start;
        let col_start = cols.start;
        Array2::from_shape_fn((rows.len(), cols.len()), |(r, c)| {
            self.value([row_start + r, col_start + c]).unwrap_or(0.0)
        })
    }

    /// Copy `source` into the unknown positions of `target` and mark them known
    ///
    /// Known target positions are left untouched. Every filled position receives
    /// `confidence` (clamped to `[0, 1]`). Returns the number of pixels filled.
    pub(crate) fn commit_patch(
        &mut self,
        target: &PatchWindow,
        source: &PatchWindow,
        confidence: f64,
    ) -> usize {
        let dimensions = self.dimensions();
        let confidence = confidence.clamp(0.0, 1.0);
        let mut filled = 0;

        for position in target.positions(dimensions) {
            if !self.is_unknown(position) {
                continue;
            }
            let Some(value) = target
                .translate(position, source)
                .and_then(|from| self.value(from))
            else {
                continue;
            };

            if let Some(pixel) = self.image.get_mut(position) {
                *pixel = value;
            }
            if let Some(conf) = self.confidence.get_mut(position) {
                *conf = confidence;
            }
            if let Some(unknown) = self.mask.get_mut(position) {
                *unknown = false;
            }
            filled += 1;
        }

        self.unknown_count = self.unknown_count.saturating_sub(filled);
        filled
    }

    /// Consume the state, returning the image buffer
    pub fn into_image(self) -> Array2<f64> {
        self.image
    }
}
