//! Exemplar-based image inpainting driven by a patch-priority fill front
//!
//! Masked regions of a grayscale image are reconstructed by copying patches from
//! the image's own known content. At every step the front pixel with the highest
//! confidence-times-structure priority is filled from its best masked-SSD match,
//! so edges are continued across the hole before flat texture closes it.

#![forbid(unsafe_code)]

/// Inpainting engines: fill front, priorities, matching, filling and orchestration
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Gradient estimators and summed-area tables
pub mod math;
/// Engine state buffers, patch geometry and padding
pub mod spatial;

pub use algorithm::executor::{
    ExemplarInpainter, InpaintConfig, inpaint_exemplar, inpaint_padded,
};
pub use algorithm::marching::inpaint_fast_marching;
pub use io::error::{InpaintError, Result};
