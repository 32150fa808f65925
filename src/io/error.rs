//! Crate-wide error type
//!
//! Every fallible operation returns [`InpaintError`]. Variants fall into four
//! groups: rejected input (parameters, shapes, buffer contents), an exhausted
//! patch search, file and image I/O, and numeric failures inside the engines.

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors raised while validating input, inpainting, or reading and writing files
#[derive(Debug)]
pub enum InpaintError {
    /// A parameter is outside its accepted range
    InvalidParameter {
        /// Parameter name as exposed to callers
        parameter: &'static str,
        /// Offending value, rendered for display
        value: String,
        /// Accepted range or rule
        reason: String,
    },

    /// Image and mask buffers disagree on shape
    ShapeMismatch {
        /// Image dimensions (rows, cols)
        image: (usize, usize),
        /// Mask dimensions (rows, cols)
        mask: (usize, usize),
    },

    /// Buffer contents the engine cannot work with
    InvalidSourceData {
        /// What is wrong with the buffers
        reason: String,
    },

    /// No fully known source patch exists for the selected target
    ///
    /// Happens when every patch footprint in the buffer overlaps the unknown
    /// region, e.g. when the mask covers the whole non-padding interior.
    SearchExhausted {
        /// Iteration whose search came up empty, starting at 1
        iteration: usize,
        /// Target patch centre (row, col)
        target: [usize; 2],
        /// Padded buffer dimensions (rows, cols)
        dimensions: (usize, usize),
    },

    /// An input image could not be opened or decoded
    ImageLoad {
        /// Image file
        path: PathBuf,
        /// Decoder error
        source: image::ImageError,
    },

    /// A result image could not be encoded or written
    ImageExport {
        /// Destination file
        path: PathBuf,
        /// Encoder error
        source: image::ImageError,
    },

    /// An input image has no companion mask file
    MissingMask {
        /// Image that needed a mask
        image: PathBuf,
        /// Where the mask was looked for
        expected: PathBuf,
    },

    /// Filesystem access failed
    FileSystem {
        /// Path being accessed
        path: PathBuf,
        /// What was being done, e.g. "read directory"
        operation: &'static str,
        /// I/O error
        source: std::io::Error,
    },

    /// An engine produced a result it cannot use
    Computation {
        /// Engine step that failed
        operation: &'static str,
        /// What went wrong
        reason: String,
    },
}

fn shape(dimensions: (usize, usize)) -> String {
    format!("{}x{}", dimensions.0, dimensions.1)
}

fn quoted(path: &Path) -> String {
    format!("'{}'", path.display())
}

impl fmt::Display for InpaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}"),
            Self::ShapeMismatch { image, mask } => {
                write!(f, "Image is {} but mask is {}", shape(*image), shape(*mask))
            }
            Self::InvalidSourceData { reason } => write!(f, "Unusable input buffers: {reason}"),
            Self::SearchExhausted {
                iteration,
                target,
                dimensions,
            } => write!(
                f,
                "Iteration {iteration}: no fully known source patch for target ({}, {}) in a {} buffer",
                target[0],
                target[1],
                shape(*dimensions)
            ),
            Self::ImageLoad { path, source } => {
                write!(f, "Cannot read image {}: {source}", quoted(path))
            }
            Self::ImageExport { path, source } => {
                write!(f, "Cannot write image {}: {source}", quoted(path))
            }
            Self::MissingMask { image, expected } => write!(
                f,
                "Image {} has no mask (looked for {})",
                quoted(image),
                quoted(expected)
            ),
            Self::FileSystem {
                path,
                operation,
                source,
            } => write!(f, "Cannot {operation} {}: {source}", quoted(path)),
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for InpaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::InvalidParameter { .. }
            | Self::ShapeMismatch { .. }
            | Self::InvalidSourceData { .. }
            | Self::SearchExhausted { .. }
            | Self::MissingMask { .. }
            | Self::Computation { .. } => None,
        }
    }
}

impl From<std::io::Error> for InpaintError {
    fn from(source: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::new(),
            operation: "access",
            source,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, InpaintError>;

/// Engine state stamped onto errors raised below the orchestrator
///
/// Lower layers do not know which iteration they run in, so they leave those
/// fields at defaults and the orchestrator fills them in on the way up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Iteration in progress
    pub iteration: Option<usize>,
    /// Target patch centre
    pub position: Option<[usize; 2]>,
    /// Engine step being performed
    pub operation: Option<&'static str>,
}

impl ErrorContext {
    /// Overwrite the matching fields of `error` with the ones set here
    pub fn apply(self, mut error: InpaintError) -> InpaintError {
        match &mut error {
            InpaintError::SearchExhausted {
                iteration, target, ..
            } => {
                if let Some(current) = self.iteration {
                    *iteration = current;
                }
                if let Some(position) = self.position {
                    *target = position;
                }
            }
            InpaintError::Computation { operation, .. } => {
                if let Some(step) = self.operation {
                    *operation = step;
                }
            }
            _ => {}
        }
        error
    }
}

/// Attach engine context to the error side of a result
pub trait WithContext<T> {
    /// Apply every field set in `context`
    ///
    /// # Errors
    ///
    /// Returns the original error with the context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Apply only the iteration number
    ///
    /// # Errors
    ///
    /// Returns the original error with the iteration applied
    fn with_iteration(self, iteration: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<InpaintError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|error| context.apply(error.into()))
    }

    fn with_iteration(self, iteration: usize) -> Result<T> {
        self.with_context(ErrorContext {
            iteration: Some(iteration),
            ..ErrorContext::default()
        })
    }
}

/// Build an [`InpaintError::InvalidParameter`]
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> InpaintError {
    InpaintError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Build an [`InpaintError::InvalidSourceData`]
pub fn invalid_source(reason: &impl ToString) -> InpaintError {
    InpaintError::InvalidSourceData {
        reason: reason.to_string(),
    }
}

/// Build an [`InpaintError::Computation`]
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> InpaintError {
    InpaintError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
