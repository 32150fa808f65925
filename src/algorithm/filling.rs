use crate::algorithm::front::FrontTracker;
use crate::spatial::state::ImageState;

/// Commit a matched source patch into the unknown part of a target patch
///
/// Copies intensities into every unknown target position, freezes their
/// confidence at `confidence`, marks them known, then refreshes the fill front
/// over the target footprint grown by one full window. Returns the number of
/// pixels filled.
pub fn fill_patch(
    state: &mut ImageState,
    front: &mut FrontTracker,
    target: [usize; 2],
    source: [usize; 2],
    confidence: f64,
) -> usize {
    let target_patch = state.patch(target);
    let source_patch = state.patch(source);

    let filled = state.commit_patch(&target_patch, &source_patch, confidence);

    let (rows, cols) = target_patch.expanded_spans(state.window(), state.dimensions());
    front.refresh_region(state, rows, cols);

    filled
}
