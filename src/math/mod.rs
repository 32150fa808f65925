//! Mathematical utilities for the engine

/// Sobel gradients, isophotes and front normals
pub mod gradient;
/// Summed-area tables over the unknown mask
pub mod integral;
