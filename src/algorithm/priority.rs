//! Fill-order priority: confidence term times data term
//!
//! The confidence term favours front pixels surrounded by reliable content; the
//! data term favours pixels where a strong isophote hits the front head-on, so
//! linear structures are propagated before flat texture fills them in.

use rayon::prelude::*;
use std::cmp::Ordering;

use crate::io::configuration::{DATA_TERM_FLOOR, DEGENERACY_EPSILON};
use crate::math::gradient::{dot, front_normal, isophote, norm, strongest_known_gradient};
use crate::spatial::state::ImageState;

/// Priority terms evaluated for one front pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityScore {
    /// Front pixel (row, col)
    pub position: [usize; 2],
    /// Share of the patch already known, weighted by confidence
    pub confidence: f64,
    /// Isophote strength across the front, in `[DATA_TERM_FLOOR, 1]`
    pub data: f64,
    /// `confidence * data`
    pub priority: f64,
}

/// Confidence term `C(p)`
///
/// Sum of the confidence of known pixels in the patch, divided by the nominal
/// patch area (clamped footprints still divide by the full area).
pub fn confidence_term(state: &ImageState, position: [usize; 2]) -> f64 {
    let patch = state.patch(position);
    let total: f64 = patch
        .positions(state.dimensions())
        .filter(|&q| !state.is_unknown(q))
        .map(|q| state.confidence_at(q))
        .sum();

    (total / patch.area() as f64).clamp(0.0, 1.0)
}

/// Data term `D(p)`
///
/// `|isophote · normal|`, where the isophote comes from the strongest known
/// gradient inside the patch and the normal from the mask gradient at `p`.
/// Degenerate gradients or normals fall back to [`DATA_TERM_FLOOR`].
pub fn data_term(state: &ImageState, position: [usize; 2]) -> f64 {
    let Some(normal) = front_normal(state.mask(), position) else {
        return DATA_TERM_FLOOR;
    };
    let Some(gradient) =
        strongest_known_gradient(state.image(), state.mask(), &state.patch(position))
    else {
        return DATA_TERM_FLOOR;
    };
    if norm(gradient) <= DEGENERACY_EPSILON {
        return DATA_TERM_FLOOR;
    }

    let strength = dot(isophote(gradient), normal).abs();
    if strength.is_finite() {
        strength.clamp(DATA_TERM_FLOOR, 1.0)
    } else {
        DATA_TERM_FLOOR
    }
}

/// Evaluate both terms and their product for one front pixel
pub fn evaluate(state: &ImageState, position: [usize; 2]) -> PriorityScore {
    let confidence = confidence_term(state, position);
    let data = data_term(state, position);

    PriorityScore {
        position,
        confidence,
        data,
        priority: confidence * data,
    }
}

/// Order scores by priority, preferring the earlier row-major position on ties
///
/// `Ordering::Greater` means `a` should be selected over `b`.
pub fn compare_scores(a: &PriorityScore, b: &PriorityScore) -> Ordering {
    a.priority
        .total_cmp(&b.priority)
        .then_with(|| b.position.cmp(&a.position))
}

/// Pick the highest-priority pixel of the front
///
/// Scores are computed in parallel; the reduction is a total order, so the
/// outcome equals a sequential row-major scan keeping the first maximum.
/// Returns `None` for an empty front.
pub fn select_target(state: &ImageState, front: &[[usize; 2]]) -> Option<PriorityScore> {
    front
        .par_iter()
        .map(|&position| evaluate(state, position))
        .max_by(compare_scores)
}
