use ndarray::Array2;
use tracing::{debug, trace};

use crate::{
    algorithm::filling::fill_patch,
    algorithm::front::FrontTracker,
    algorithm::matching::{PatchMatch, find_best_match, validate_threshold},
    algorithm::priority::{PriorityScore, select_target},
    io::configuration::{DEFAULT_MAX_THRESH, DEFAULT_WINDOW},
    io::error::{
        ErrorContext, InpaintError, Result, WithContext, computation_error, invalid_parameter,
    },
    spatial::padding::{crop_padding, pad_for_window},
    spatial::state::ImageState,
};

/// Engine parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InpaintConfig {
    /// Patch window width (odd values give centred patches)
    pub window: usize,
    /// Early-acceptance threshold for masked SSD matching
    pub max_thresh: f64,
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_thresh: DEFAULT_MAX_THRESH,
        }
    }
}

impl InpaintConfig {
    /// Check parameters that don't depend on the buffers
    ///
    /// # Errors
    ///
    /// Returns an error if the window is zero or the threshold is not a finite
    /// positive number
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(invalid_parameter("window", &self.window, &"must be positive"));
        }
        validate_threshold(self.max_thresh)
    }
}

/// Orchestrator state
///
/// `Scanning → Matching → Filling → Scanning`, until `Scanning` finds nothing
/// left to fill and moves to `Terminated`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InpaintPhase {
    /// Compute the front, evaluate priorities and pick a target
    Scanning,
    /// Search the known region for the target's best source patch
    Matching {
        /// Selected target and its priority terms
        target: PriorityScore,
    },
    /// Commit the matched patch
    Filling {
        /// Selected target and its priority terms
        target: PriorityScore,
        /// Chosen source patch
        matched: PatchMatch,
    },
    /// Every unknown pixel has been synthesized
    Terminated,
}

/// Summary of one completed iteration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillRecord {
    /// Iteration number, starting at 1
    pub iteration: usize,
    /// Target patch centre
    pub target: [usize; 2],
    /// Source patch centre
    pub source: [usize; 2],
    /// Priority of the target when it was selected
    pub priority: f64,
    /// Confidence frozen into the filled pixels
    pub confidence: f64,
    /// Masked SSD of the match
    pub ssd: f64,
    /// Pixels filled by this iteration
    pub filled: usize,
    /// Unknown pixels left afterwards
    pub remaining: usize,
}

/// Progress callback receiving (pixels filled so far, pixels initially unknown)
pub type ProgressCallback = Box<dyn FnMut(usize, usize) + Send>;

/// Exemplar-based inpainting executor
///
/// Owns the engine state and drives the scan/match/fill state machine one
/// transition at a time. Stopping between iterations always leaves a valid
/// image and mask pair.
pub struct ExemplarInpainter {
    state: ImageState,
    front: FrontTracker,
    config: InpaintConfig,
    phase: InpaintPhase,
    iteration: usize,
    initial_unknown: usize,
    history: Vec<FillRecord>,
    progress: Option<ProgressCallback>,
}

impl ExemplarInpainter {
    /// Create an executor over a padded image and mask
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the buffers are invalid
    /// (see [`ImageState::new`])
    pub fn new(image: Array2<f64>, mask: Array2<bool>, config: InpaintConfig) -> Result<Self> {
        config.validate()?;
        let state = ImageState::new(image, mask, config.window)?;
        let front = FrontTracker::build(&state);
        let initial_unknown = state.unknown_count();

        debug!(
            rows = state.dimensions().0,
            cols = state.dimensions().1,
            window = config.window,
            max_thresh = config.max_thresh,
            unknown = initial_unknown,
            front = front.len(),
            "exemplar inpainting initialized"
        );

        Ok(Self {
            state,
            front,
            config,
            phase: InpaintPhase::Scanning,
            iteration: 0,
            initial_unknown,
            history: Vec::new(),
            progress: None,
        })
    }

    /// Attach a progress callback invoked after every fill
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Current engine state
    pub const fn state(&self) -> &ImageState {
        &self.state
    }

    /// Current fill front
    pub const fn front(&self) -> &FrontTracker {
        &self.front
    }

    /// Engine parameters
    pub const fn config(&self) -> &InpaintConfig {
        &self.config
    }

    /// Current state machine phase
    pub const fn phase(&self) -> InpaintPhase {
        self.phase
    }

    /// Completed iterations
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// Unknown pixels at construction
    pub const fn initial_unknown(&self) -> usize {
        self.initial_unknown
    }

    /// One record per completed iteration
    pub fn history(&self) -> &[FillRecord] {
        &self.history
    }

    /// Whether the run has finished
    pub const fn is_terminated(&self) -> bool {
        matches!(self.phase, InpaintPhase::Terminated)
    }

    /// Perform a single state transition and return the new phase
    ///
    /// On error the phase is left unchanged; the run should be abandoned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Unknown pixels remain but none borders a known pixel
    /// - No fully-known source patch exists (`SearchExhausted`)
    /// - A fill fails to make progress
    pub fn advance(&mut self) -> Result<InpaintPhase> {
        let next = match self.phase {
            InpaintPhase::Scanning => self.scan()?,
            InpaintPhase::Matching { target } => {
                let matched =
                    find_best_match(&self.state, target.position, self.config.max_thresh)
                        .with_context(self.context(target, "patch search"))?;
                InpaintPhase::Filling { target, matched }
            }
            InpaintPhase::Filling { target, matched } => {
                let context = self.context(target, "patch filling");
                self.fill(target, matched).with_context(context)?;
                InpaintPhase::Scanning
            }
            InpaintPhase::Terminated => InpaintPhase::Terminated,
        };

        self.phase = next;
        Ok(next)
    }

    /// Context for errors raised while working on `target` in the coming iteration
    const fn context(&self, target: PriorityScore, operation: &'static str) -> ErrorContext {
        ErrorContext {
            iteration: Some(self.iteration + 1),
            position: Some(target.position),
            operation: Some(operation),
        }
    }

    fn scan(&self) -> Result<InpaintPhase> {
        if self.state.unknown_count() == 0 {
            return Ok(InpaintPhase::Terminated);
        }

        let front = self.front.current_front();
        if front.is_empty() {
            // Unknown pixels with no known neighbour anywhere: nothing to copy from
            let first_unknown = self
                .state
                .mask()
                .indexed_iter()
                .find(|&(_, &unknown)| unknown)
                .map_or([0, 0], |((r, c), _)| [r, c]);
            return Err(InpaintError::SearchExhausted {
                iteration: self.iteration + 1,
                target: first_unknown,
                dimensions: self.state.dimensions(),
            });
        }

        let target = select_target(&self.state, &front).ok_or_else(|| {
            computation_error("priority selection", &"non-empty front produced no target")
        })?;

        Ok(InpaintPhase::Matching { target })
    }

    fn fill(&mut self, target: PriorityScore, matched: PatchMatch) -> Result<()> {
        let filled = fill_patch(
            &mut self.state,
            &mut self.front,
            target.position,
            matched.source,
            target.confidence,
        );
        if filled == 0 {
            return Err(computation_error(
                "patch filling",
                &format!(
                    "target ({}, {}) had no unknown pixel to fill",
                    target.position[0], target.position[1]
                ),
            ));
        }

        self.iteration += 1;
        let remaining = self.state.unknown_count();
        self.history.push(FillRecord {
            iteration: self.iteration,
            target: target.position,
            source: matched.source,
            priority: target.priority,
            confidence: target.confidence,
            ssd: matched.ssd,
            filled,
            remaining,
        });

        trace!(
            iteration = self.iteration,
            center = ?target.position,
            source = ?matched.source,
            priority = target.priority,
            ssd = matched.ssd,
            early = matched.early_accepted,
            filled,
            remaining,
            "patch filled"
        );

        if let Some(callback) = self.progress.as_mut() {
            callback(self.initial_unknown - remaining, self.initial_unknown);
        }

        Ok(())
    }

    /// Run one full scan/match/fill iteration
    ///
    /// Returns `Ok(false)` once the run has terminated and nothing was filled.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::advance`]
    pub fn execute_iteration(&mut self) -> Result<bool> {
        if self.is_terminated() {
            return Ok(false);
        }

        loop {
            match self.advance()? {
                InpaintPhase::Scanning => return Ok(true),
                InpaintPhase::Terminated => return Ok(false),
                InpaintPhase::Matching { .. } | InpaintPhase::Filling { .. } => {}
            }
        }
    }

    /// Run to completion and return the filled padded image
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::advance`]; no partially filled image
    /// is returned
    pub fn run(mut self) -> Result<Array2<f64>> {
        while self.execute_iteration()? {}

        debug!(
            iterations = self.iteration,
            filled = self.initial_unknown,
            "exemplar inpainting finished"
        );

        Ok(self.state.into_image())
    }
}

/// Inpaint a padded image
///
/// `image` and `mask` must already carry the `window / 2` padding ring, with the
/// ring known. The returned buffer has the same padded shape.
///
/// # Errors
///
/// Returns an error for invalid configuration or buffers, or when no
/// fully-known source patch exists
pub fn inpaint_padded(
    image: Array2<f64>,
    mask: Array2<bool>,
    window: usize,
    max_thresh: f64,
) -> Result<Array2<f64>> {
    ExemplarInpainter::new(image, mask, InpaintConfig { window, max_thresh })?.run()
}

/// Inpaint an unpadded image, handling padding and cropping
///
/// Intensities must lie in `[0, 1]`; `true` in `mask` marks pixels to synthesize.
///
/// # Errors
///
/// Returns an error for invalid configuration or buffers, or when no
/// fully-known source patch exists
pub fn inpaint_exemplar(
    image: &Array2<f64>,
    mask: &Array2<bool>,
    window: usize,
    max_thresh: f64,
) -> Result<Array2<f64>> {
    let (padded_image, padded_mask) = pad_for_window(image, mask, window)?;
    let filled = inpaint_padded(padded_image, padded_mask, window, max_thresh)?;
    crop_padding(&filled, window, image.dim())
}
