//! Spatial data structures for the inpainting engine
//!
//! This module contains spatial-related functionality including:
//! - Padding and cropping around the engine buffers
//! - Patch footprints and clamped spans
//! - Engine state management

/// Padding, cropping and sample normalization
pub mod padding;
/// Patch footprint geometry
pub mod patch;
/// Image, mask and confidence buffers
pub mod state;

pub use patch::PatchWindow;
pub use state::ImageState;
