//! Sobel gradient, isophote and fill-front normal estimators
//!
//! Gradients are `[d/drow, d/dcol]` pairs from the 3x3 Sobel operator scaled by
//! 1/8, so intensities in `[0, 1]` give components in `[-0.5, 0.5]`.

use ndarray::Array2;

use crate::io::configuration::DEGENERACY_EPSILON;
use crate::spatial::patch::PatchWindow;

const SOBEL_WEIGHTS: [f64; 3] = [1.0, 2.0, 1.0];
const SOBEL_SCALE: f64 = 1.0 / 8.0;

/// Apply the Sobel operator through a sampling function
///
/// `sample(dr, dc)` returns the value at the given offset from the centre, or
/// `None` if it is unavailable, in which case the whole estimate is `None`.
pub fn sobel<F>(sample: F) -> Option<[f64; 2]>
where
    F: Fn(isize, isize) -> Option<f64>,
{
    let mut g_row = 0.0;
    let mut g_col = 0.0;

    for (k, &weight) in (-1..=1).zip(SOBEL_WEIGHTS.iter()) {
        g_row = weight.mul_add(sample(1, k)? - sample(-1, k)?, g_row);
        g_col = weight.mul_add(sample(k, 1)? - sample(k, -1)?, g_col);
    }

    Some([g_row * SOBEL_SCALE, g_col * SOBEL_SCALE])
}

/// Offset a position, `None` when it leaves the non-negative quadrant
pub const fn offset_position(position: [usize; 2], dr: isize, dc: isize) -> Option<[usize; 2]> {
    match (
        position[0].checked_add_signed(dr),
        position[1].checked_add_signed(dc),
    ) {
        (Some(r), Some(c)) => Some([r, c]),
        _ => None,
    }
}

/// Image gradient at a known pixel whose whole 3x3 neighbourhood is known
///
/// Returns `None` if any neighbour is unknown or outside the buffer.
pub fn known_gradient_at(
    image: &Array2<f64>,
    mask: &Array2<bool>,
    position: [usize; 2],
) -> Option<[f64; 2]> {
    sobel(|dr, dc| {
        let at = offset_position(position, dr, dc)?;
        match mask.get(at) {
            Some(&false) => image.get(at).copied(),
            _ => None,
        }
    })
}

/// Strongest known-pixel gradient inside a patch footprint
///
/// Scans the footprint in row-major order; ties keep the first pixel found.
pub fn strongest_known_gradient(
    image: &Array2<f64>,
    mask: &Array2<bool>,
    patch: &PatchWindow,
) -> Option<[f64; 2]> {
    let mut best: Option<([f64; 2], f64)> = None;

    for position in patch.positions(image.dim()) {
        let Some(gradient) = known_gradient_at(image, mask, position) else {
            continue;
        };
        let magnitude = norm(gradient);
        if best.is_none_or(|(_, best_magnitude)| magnitude > best_magnitude) {
            best = Some((gradient, magnitude));
        }
    }

    best.map(|(gradient, _)| gradient)
}

/// Unit normal of the fill front at a position
///
/// Sobel of the mask (unknown = 1.0) with border replication. Returns `None`
/// where the mask is locally symmetric and no direction is defined.
pub fn front_normal(mask: &Array2<bool>, position: [usize; 2]) -> Option<[f64; 2]> {
    let (rows, cols) = mask.dim();
    if rows == 0 || cols == 0 {
        return None;
    }

    let gradient = sobel(|dr, dc| {
        let r = position[0].saturating_add_signed(dr).min(rows - 1);
        let c = position[1].saturating_add_signed(dc).min(cols - 1);
        mask.get([r, c]).map(|&unknown| if unknown { 1.0 } else { 0.0 })
    })?;

    normalized(gradient)
}

/// Direction of constant intensity: the gradient rotated by 90 degrees
pub const fn isophote(gradient: [f64; 2]) -> [f64; 2] {
    [-gradient[1], gradient[0]]
}

/// Euclidean length of a 2-vector
pub fn norm(v: [f64; 2]) -> f64 {
    v[0].hypot(v[1])
}

/// Unit vector in the direction of `v`, `None` if `v` is degenerate
pub fn normalized(v: [f64; 2]) -> Option<[f64; 2]> {
    let length = norm(v);
    (length > DEGENERACY_EPSILON).then(|| [v[0] / length, v[1] / length])
}

/// Dot product of two 2-vectors
pub fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0].mul_add(b[0], a[1] * b[1])
}
