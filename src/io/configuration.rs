//! Engine constants and runtime configuration defaults

/// Default patch window width (odd, so patches are centred)
pub const DEFAULT_WINDOW: usize = 9;

/// Default early-acceptance threshold for masked SSD matching
pub const DEFAULT_MAX_THRESH: f64 = 0.2;

/// Default neighbourhood radius for the fast-marching engine
pub const DEFAULT_RADIUS: usize = 5;

/// Grey levels per unit sample; fast marching works on the 8-bit scale
pub const GREY_LEVELS: f64 = 255.0;

// Flat regions still need a positive data term so confidence alone can order them
/// Lower bound applied to the data term
pub const DATA_TERM_FLOOR: f64 = 1e-3;

/// Magnitudes below this are treated as zero by the gradient and normal estimators
pub const DEGENERACY_EPSILON: f64 = 1e-9;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed buffer dimension
pub const MAX_BUFFER_DIMENSION: usize = 10_000;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// File naming
/// Suffix of the mask file expected next to each input image
pub const MASK_SUFFIX: &str = "_mask";
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
