//! Padding, cropping and intensity normalization around the exemplar engine
//!
//! The engine works on buffers padded by `window / 2` pixels on the leading
//! sides and `window - 1 - window / 2` on the trailing sides, so every patch
//! centred on an original pixel is fully defined. The padding ring holds
//! intensity 0.0 and is always known.

use ndarray::Array2;
use num_traits::{Bounded, ToPrimitive, Zero};

use crate::io::error::{InpaintError, Result, invalid_parameter, invalid_source};

/// Padding added on each side of an unpadded buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingInfo {
    /// Rows/columns added before the data
    pub leading: usize,
    /// Rows/columns added after the data
    pub trailing: usize,
}

impl PaddingInfo {
    /// Padding required for a given patch window
    pub const fn for_window(window: usize) -> Self {
        let leading = window / 2;
        Self {
            leading,
            trailing: window.saturating_sub(1) - leading,
        }
    }

    /// Padded dimensions of an unpadded `(rows, cols)` buffer
    pub const fn padded_dimensions(&self, dimensions: (usize, usize)) -> (usize, usize) {
        (
            dimensions.0 + self.leading + self.trailing,
            dimensions.1 + self.leading + self.trailing,
        )
    }
}

/// Pad an unpadded image and mask for a `window`-wide engine run
///
/// # Errors
///
/// Returns an error if:
/// - `window` is zero or larger than the smallest unpadded dimension
/// - The image and mask shapes differ
pub fn pad_for_window(
    image: &Array2<f64>,
    mask: &Array2<bool>,
    window: usize,
) -> Result<(Array2<f64>, Array2<bool>)> {
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

    if window > dimensions.0.min(dimensions.1) {
        return Err(invalid_parameter(
            "window",
            &window,
            &format!(
                "must not exceed the smallest image dimension of {}x{}",
                dimensions.0, dimensions.1
            ),
        ));
    }

    let padding = PaddingInfo::for_window(window);
    let padded_dims = padding.padded_dimensions(dimensions);
    let lead = padding.leading;

    let padded_image = Array2::from_shape_fn(padded_dims, |position| {
        unpadded_index(position, lead, dimensions)
            .and_then(|inner| image.get(inner).copied())
            .unwrap_or(0.0)
    });
    let padded_mask = Array2::from_shape_fn(padded_dims, |position| {
        unpadded_index(position, lead, dimensions)
            .and_then(|inner| mask.get(inner).copied())
            .unwrap_or(false)
    });

    Ok((padded_image, padded_mask))
}

/// Unpadded index of a padded position, `None` inside the padding ring
fn unpadded_index(
    (r, c): (usize, usize),
    lead: usize,
    dimensions: (usize, usize),
) -> Option<[usize; 2]> {
    let r = r.checked_sub(lead).filter(|&r| r < dimensions.0)?;
    let c = c.checked_sub(lead).filter(|&c| c < dimensions.1)?;
    Some([r, c])
}

/// Crop a padded buffer back to its original `(rows, cols)` shape
///
/// # Errors
///
/// Returns an error if the padded buffer is smaller than the original shape
/// plus the window padding
pub fn crop_padding<T: Clone>(
    padded: &Array2<T>,
    window: usize,
    dimensions: (usize, usize),
) -> Result<Array2<T>> {
    let padding = PaddingInfo::for_window(window.max(1));
    let expected = padding.padded_dimensions(dimensions);
    if padded.dim() != expected {
        return Err(invalid_source(&format!(
            "padded buffer is {}x{} but window {window} over {}x{} needs {}x{}",
            padded.nrows(),
            padded.ncols(),
            dimensions.0,
            dimensions.1,
            expected.0,
            expected.1
        )));
    }

    let lead = padding.leading;
    let mut cropped = Vec::with_capacity(dimensions.0 * dimensions.1);
    for r in lead..lead + dimensions.0 {
        for c in lead..lead + dimensions.1 {
            let value = padded.get([r, c]).ok_or_else(|| {
                invalid_source(&format!("crop position ({r}, {c}) outside the padded buffer"))
            })?;
            cropped.push(value.clone());
        }
    }

    Array2::from_shape_vec(dimensions, cropped)
        .map_err(|error| invalid_source(&format!("cropped buffer: {error}")))
}

/// Map integer samples onto `[0, 1]` by dividing by the type's maximum
pub fn normalize_samples<T>(data: &Array2<T>) -> Array2<f64>
where
    T: ToPrimitive + Bounded + Copy,
{
    let max = T::max_value().to_f64().unwrap_or(1.0).max(f64::MIN_POSITIVE);
    data.mapv(|v| (v.to_f64().unwrap_or(0.0) / max).clamp(0.0, 1.0))
}

/// Map `[0, 1]` intensities back onto the full range of an integer type
pub fn denormalize_samples<T>(data: &Array2<f64>) -> Array2<T>
where
    T: num_traits::NumCast + Bounded + Zero + Copy,
{
    let max = T::max_value().to_f64().unwrap_or(1.0);
    data.mapv(|v| T::from((v.clamp(0.0, 1.0) * max).round()).unwrap_or_else(T::zero))
}

/// Build an unknown mask from mask samples: any non-zero sample is unknown
pub fn mask_from_samples<T>(data: &Array2<T>) -> Array2<bool>
where
    T: Zero + PartialEq + Copy,
{
    data.mapv(|v| v != T::zero())
}
