//! Distance-ordered diffusion inpainting (Telea's fast marching method)
//!
//! Unknown pixels are filled in order of their arrival time `T` from the known
//! boundary. Each new value is a weighted mean of the frozen pixels within
//! `radius`, weighted by direction (alignment with `∇T`), geometric distance
//! and level-set distance, then nudged along the weighted image gradient.
//!
//! The march runs inside a one-pixel frame of known zeros at time 0. The frame
//! takes part in the eikonal and gradient stencils but is never sampled, and
//! neither are the first image row and column.

use ndarray::Array2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

use crate::io::error::{
    InpaintError, Result, computation_error, invalid_parameter, invalid_source,
};

/// Arrival time assigned to pixels the front has not reached yet
const FAR_AWAY: f64 = 1.0e6;

/// Direction weight used when a neighbour is perpendicular to `∇T`
const MIN_DIRECTION: f64 = 1.0e-6;

/// Gradient corrections at or below this magnitude are rounding noise
const MIN_CORRECTION: f64 = 1.0e-9;

/// Keeps the correction finite when its magnitude is tiny
const CORRECTION_GUARD: f64 = 1.0e-20;

/// Width of the known frame around the image
const FRAME: usize = 1;

const FOUR_NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelState {
    Known,
    Band,
    Inside,
}

/// Narrow-band entry ordered by arrival time, earliest first
#[derive(Debug, Clone, Copy)]
struct BandNode {
    time: f64,
    position: [usize; 2],
}

impl PartialEq for BandNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BandNode {}

impl PartialOrd for BandNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BandNode {
    // Reversed so the max-heap pops the smallest time, then the first row-major position
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.position.cmp(&self.position))
    }
}

/// March state over the framed grid
struct Marcher {
    image: Array2<f64>,
    times: Array2<f64>,
    states: Array2<PixelState>,
    radius: usize,
}

impl Marcher {
    /// Frame the image and mask; frame pixels are known zeros at time 0
    fn framed(image: &Array2<f64>, mask: &Array2<bool>, radius: usize) -> Self {
        let (rows, cols) = image.dim();
        let shape = (rows + 2 * FRAME, cols + 2 * FRAME);
        let inner = |(r, c): (usize, usize)| {
            let r = r.checked_sub(FRAME).filter(|&r| r < rows)?;
            let c = c.checked_sub(FRAME).filter(|&c| c < cols)?;
            Some([r, c])
        };

        let unknown =
            |p| inner(p).is_some_and(|inner| mask.get(inner).copied().unwrap_or(false));

        Self {
            image: Array2::from_shape_fn(shape, |p| {
                inner(p)
                    .and_then(|inner| image.get(inner).copied())
                    .unwrap_or(0.0)
            }),
            times: Array2::from_shape_fn(shape, |p| if unknown(p) { FAR_AWAY } else { 0.0 }),
            states: Array2::from_shape_fn(shape, |p| {
                if unknown(p) {
                    PixelState::Inside
                } else {
                    PixelState::Known
                }
            }),
            radius,
        }
    }

    /// Drop the frame
    fn into_image(self) -> Array2<f64> {
        let (rows, cols) = self.image.dim();
        let (rows, cols) = (rows - 2 * FRAME, cols - 2 * FRAME);
        Array2::from_shape_fn((rows, cols), |(r, c)| {
            self.image
                .get([r + FRAME, c + FRAME])
                .copied()
                .unwrap_or(0.0)
        })
    }

    fn state(&self, position: [usize; 2]) -> Option<PixelState> {
        self.states.get(position).copied()
    }

    fn set_state(&mut self, position: [usize; 2], state: PixelState) {
        if let Some(slot) = self.states.get_mut(position) {
            *slot = state;
        }
    }

    /// Known or in the band
    fn settled(&self, position: [usize; 2]) -> bool {
        matches!(
            self.state(position),
            Some(PixelState::Known | PixelState::Band)
        )
    }

    fn is_known(&self, position: [usize; 2]) -> bool {
        self.state(position) == Some(PixelState::Known)
    }

    /// Inside the frame
    fn is_interior(&self, position: [usize; 2]) -> bool {
        let (rows, cols) = self.states.dim();
        (FRAME..rows - FRAME).contains(&position[0]) && (FRAME..cols - FRAME).contains(&position[1])
    }

    /// Pixels that may contribute to a fill: the interior without its first row and column
    fn is_sampled(&self, position: [usize; 2]) -> bool {
        let (rows, cols) = self.states.dim();
        (FRAME + 1..rows - FRAME).contains(&position[0])
            && (FRAME + 1..cols - FRAME).contains(&position[1])
    }

    fn time(&self, position: [usize; 2]) -> f64 {
        self.times.get(position).copied().unwrap_or(FAR_AWAY)
    }

    fn neighbour(&self, position: [usize; 2], dr: isize, dc: isize) -> Option<[usize; 2]> {
        let r = position[0].checked_add_signed(dr)?;
        let c = position[1].checked_add_signed(dc)?;
        let (rows, cols) = self.image.dim();
        (r < rows && c < cols).then_some([r, c])
    }

    /// Eikonal update from one vertical and one horizontal frozen neighbour
    fn solve(&self, a: Option<[usize; 2]>, b: Option<[usize; 2]>) -> f64 {
        let a = a.filter(|&p| self.is_known(p)).map(|p| self.time(p));
        let b = b.filter(|&p| self.is_known(p)).map(|p| self.time(p));

        match (a, b) {
            (Some(ta), Some(tb)) => {
                let diff = ta - tb;
                // No upwind solution when the two times are too far apart
                if diff.abs() > 1.0 {
                    FAR_AWAY
                } else {
                    let root = diff.mul_add(-diff, 2.0).sqrt();
                    (ta + tb + root) * 0.5
                }
            }
            (Some(t), None) | (None, Some(t)) => 1.0 + t,
            (None, None) => FAR_AWAY,
        }
    }

    fn arrival_time(&self, position: [usize; 2]) -> f64 {
        let up = self.neighbour(position, -1, 0);
        let down = self.neighbour(position, 1, 0);
        let left = self.neighbour(position, 0, -1);
        let right = self.neighbour(position, 0, 1);

        [
            self.solve(up, left),
            self.solve(down, right),
            self.solve(up, right),
            self.solve(down, left),
        ]
        .into_iter()
        .fold(FAR_AWAY, f64::min)
    }

    /// Central or one-sided difference of `field` along an axis, over settled pixels
    fn difference(&self, field: &Array2<f64>, position: [usize; 2], axis: usize) -> f64 {
        let (dr, dc) = if axis == 0 { (1, 0) } else { (0, 1) };
        let at = |p: [usize; 2]| field.get(p).copied().unwrap_or(0.0);
        let forward = self
            .neighbour(position, dr, dc)
            .filter(|&p| self.settled(p));
        let backward = self
            .neighbour(position, -dr, -dc)
            .filter(|&p| self.settled(p));

        match (forward, backward) {
            (Some(f), Some(b)) => (at(f) - at(b)) * 0.5,
            (Some(f), None) => at(f) - at(position),
            (None, Some(b)) => at(position) - at(b),
            (None, None) => 0.0,
        }
    }

    fn gradient(&self, field: &Array2<f64>, position: [usize; 2]) -> [f64; 2] {
        [
            self.difference(field, position, 0),
            self.difference(field, position, 1),
        ]
    }

    /// Weighted mean of the known pixels within the radius, plus the gradient correction
    fn inpaint_value(&self, position: [usize; 2]) -> Option<f64> {
        let grad_t = self.gradient(&self.times, position);
        let own_time = self.time(position);
        let radius = self.radius as isize;
        let radius_sq = (self.radius * self.radius) as f64;

        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        let mut correction = [0.0; 2];

        for dr in -radius..=radius {
            for dc in -radius..=radius {
                let Some(other) = self.neighbour(position, dr, dc) else {
                    continue;
                };
                if !self.is_sampled(other) || !self.is_known(other) {
                    continue;
                }

                let r = [(-dr) as f64, (-dc) as f64];
                let length_sq = r[0].mul_add(r[0], r[1] * r[1]);
                if length_sq > radius_sq {
                    continue;
                }

                let mut direction = r[0].mul_add(grad_t[0], r[1] * grad_t[1]).abs();
                if direction < f64::EPSILON {
                    direction = MIN_DIRECTION;
                }
                let distance = 1.0 / (length_sq * length_sq.sqrt());
                let level = 1.0 / (1.0 + (self.time(other) - own_time).abs());
                let weight = direction * distance * level;

                let grad_i = self.gradient(&self.image, other);
                correction[0] -= weight * grad_i[0] * r[0];
                correction[1] -= weight * grad_i[1] * r[1];

                weighted += weight * self.image.get(other).copied().unwrap_or(0.0);
                total_weight += weight;
            }
        }

        if total_weight <= 0.0 {
            return None;
        }

        let mean = weighted / total_weight;
        let magnitude = correction[0].hypot(correction[1]);
        if magnitude > MIN_CORRECTION {
            Some(mean + (correction[0] + correction[1]) / (magnitude + CORRECTION_GUARD))
        } else {
            Some(mean)
        }
    }
}

/// Fill masked pixels by fast-marching diffusion
///
/// `image` and `mask` are unpadded and share a shape; `true` in `mask` marks
/// pixels to fill. Known pixels are returned unchanged. Intensities are grey
/// levels: the gradient correction moves each filled value by at most `√2`
/// from the weighted mean of its known neighbours, so callers holding `[0, 1]`
/// samples should scale them to `[0, 255]` first.
///
/// # Errors
///
/// Returns an error if:
/// - `radius` is zero
/// - The image and mask shapes differ
/// - The mask covers the whole image
/// - A masked pixel has no usable known pixel within `radius` when it is reached
pub fn inpaint_fast_marching(
    image: &Array2<f64>,
    mask: &Array2<bool>,
    radius: usize,
) -> Result<Array2<f64>> {
    if radius == 0 {
        return Err(invalid_parameter("radius", &radius, &"must be positive"));
    }
    if image.dim() != mask.dim() {
        return Err(InpaintError::ShapeMismatch {
            image: image.dim(),
            mask: mask.dim(),
        });
    }

    let unknown = mask.iter().filter(|&&m| m).count();
    if unknown == 0 {
        return Ok(image.clone());
    }

    if unknown == mask.len() {
        return Err(invalid_source(&"mask covers the whole image"));
    }

    let mut marcher = Marcher::framed(image, mask, radius);

    let mut heap = BinaryHeap::new();
    let band: Vec<[usize; 2]> = marcher
        .states
        .indexed_iter()
        .filter(|&(_, &state)| state == PixelState::Known)
        .map(|((r, c), _)| [r, c])
        .filter(|&position| {
            FOUR_NEIGHBOURS.iter().any(|&(dr, dc)| {
                marcher
                    .neighbour(position, dr, dc)
                    .is_some_and(|p| marcher.state(p) == Some(PixelState::Inside))
            })
        })
        .collect();
    for position in band {
        marcher.set_state(position, PixelState::Band);
        heap.push(BandNode {
            time: 0.0,
            position,
        });
    }

    let mut filled = 0;
    while let Some(node) = heap.pop() {
        marcher.set_state(node.position, PixelState::Known);

        for (dr, dc) in FOUR_NEIGHBOURS {
            let Some(next) = marcher.neighbour(node.position, dr, dc) else {
                continue;
            };
            if !marcher.is_interior(next) {
                continue;
            }
            let Some(state) = marcher.state(next) else {
                continue;
            };
            if state == PixelState::Known {
                continue;
            }

            // Band pixels get a fresh arrival time but keep their queue entry
            let time = marcher.arrival_time(next);
            if let Some(t) = marcher.times.get_mut(next) {
                *t = time;
            }
            if state == PixelState::Band {
                continue;
            }

            // Joins the band before its value is computed, so neighbouring
            // gradient stencils read its current value
            marcher.set_state(next, PixelState::Band);
            heap.push(BandNode {
                time,
                position: next,
            });

            let value = marcher.inpaint_value(next).ok_or_else(|| {
                computation_error(
                    "fast marching",
                    &format!(
                        "no known pixel within radius {radius} of ({}, {})",
                        next[0] - FRAME,
                        next[1] - FRAME
                    ),
                )
            })?;
            if let Some(pixel) = marcher.image.get_mut(next) {
                *pixel = value;
            }
            filled += 1;
        }
    }

    debug!(filled, unknown, radius, "fast marching inpainting finished");
    Ok(marcher.into_image())
}
