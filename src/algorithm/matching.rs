//! Masked sum-of-squared-differences search for the best source patch
//!
//! Candidates are every patch whose footprint lies inside the buffer and covers
//! no unknown pixel, visited in row-major order of their centres. The first
//! candidate at or below `max_thresh` is accepted immediately; otherwise the
//! global minimum wins, with ties going to the earliest candidate.

use rayon::prelude::*;
use tracing::trace;

use crate::io::error::{InpaintError, Result, invalid_parameter};
use crate::math::integral::UnknownIntegral;
use crate::spatial::patch::PatchWindow;
use crate::spatial::state::ImageState;

/// Candidates scored per parallel batch before checking for early acceptance
pub const MATCH_BATCH_SIZE: usize = 1024;

/// Outcome of a patch search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchMatch {
    /// Centre of the chosen source patch (row, col)
    pub source: [usize; 2],
    /// Masked SSD between target and source
    pub ssd: f64,
    /// Whether the source was accepted under the threshold
    pub early_accepted: bool,
    /// Candidates considered up to and including the chosen one
    pub candidates_scanned: usize,
}

/// Validate an early-acceptance threshold
///
/// # Errors
///
/// Returns an error if `max_thresh` is not finite or not strictly positive
pub fn validate_threshold(max_thresh: f64) -> Result<()> {
    if max_thresh.is_finite() && max_thresh > 0.0 {
        Ok(())
    } else {
        Err(invalid_parameter(
            "max_thresh",
            &max_thresh,
            &"must be a finite positive number",
        ))
    }
}

/// Known target pixels paired with their intensities
///
/// Unknown target positions never contribute to the distance, so they are
/// dropped once up front instead of being tested for every candidate.
pub fn known_template(state: &ImageState, target: &PatchWindow) -> Vec<([usize; 2], f64)> {
    target
        .positions(state.dimensions())
        .filter(|&position| !state.is_unknown(position))
        .filter_map(|position| state.value(position).map(|value| (position, value)))
        .collect()
}

/// Masked SSD between a target template and a candidate source patch
pub fn template_ssd(
    state: &ImageState,
    template: &[([usize; 2], f64)],
    target: &PatchWindow,
    source: &PatchWindow,
) -> f64 {
    template
        .iter()
        .map(|&(position, value)| {
            let other = target
                .translate(position, source)
                .and_then(|from| state.value(from))
                .unwrap_or(0.0);
            let diff = value - other;
            diff * diff
        })
        .sum()
}

/// Masked SSD between the patches centred on `target` and `source`
///
/// Only positions known in the target contribute.
pub fn masked_ssd(state: &ImageState, target: [usize; 2], source: [usize; 2]) -> f64 {
    let target = state.patch(target);
    let template = known_template(state, &target);
    template_ssd(state, &template, &target, &state.patch(source))
}

/// Centres of all fully-known, fully-inside patches in row-major order
pub fn candidate_centers(state: &ImageState, integral: &UnknownIntegral) -> Vec<[usize; 2]> {
    let (rows, cols) = state.dimensions();
    let half = state.half_window();
    if rows < 2 * half + 1 || cols < 2 * half + 1 {
        return Vec::new();
    }

    let mut centers = Vec::new();
    for r in half..rows - half {
        for c in half..cols - half {
            let patch = state.patch([r, c]);
            let (row_span, col_span) = patch.spans((rows, cols));
            if integral.is_known(&row_span, &col_span) {
                centers.push([r, c]);
            }
        }
    }

    centers
}

/// Search the known region for the best source patch for `target`
///
/// # Errors
///
/// Returns an error if:
/// - `max_thresh` is not a finite positive number
/// - No fully-known candidate patch exists (`SearchExhausted`; the iteration
///   field is left at 0 for the caller to fill in)
pub fn find_best_match(
    state: &ImageState,
    target: [usize; 2],
    max_thresh: f64,
) -> Result<PatchMatch> {
    validate_threshold(max_thresh)?;

    let integral = UnknownIntegral::build(state.mask());
    let candidates = candidate_centers(state, &integral);
    if candidates.is_empty() {
        return Err(InpaintError::SearchExhausted {
            iteration: 0,
            target,
            dimensions: state.dimensions(),
        });
    }

    let target_patch = state.patch(target);
    let template = known_template(state, &target_patch);

    let mut best: Option<PatchMatch> = None;
    let mut scanned = 0;

    for batch in candidates.chunks(MATCH_BATCH_SIZE) {
        let scores: Vec<f64> = batch
            .par_iter()
            .map(|&center| {
                template_ssd(state, &template, &target_patch, &state.patch(center))
            })
            .collect();

        for (&source, &ssd) in batch.iter().zip(&scores) {
            scanned += 1;

            if ssd <= max_thresh {
                trace!(center = ?target, ?source, ssd, scanned, "early acceptance");
                return Ok(PatchMatch {
                    source,
                    ssd,
                    early_accepted: true,
                    candidates_scanned: scanned,
                });
            }

            if best.is_none_or(|current| ssd < current.ssd) {
                best = Some(PatchMatch {
                    source,
                    ssd,
                    early_accepted: false,
                    candidates_scanned: scanned,
                });
            }
        }
    }

    best.ok_or(InpaintError::SearchExhausted {
        iteration: 0,
        target,
        dimensions: state.dimensions(),
    })
}
