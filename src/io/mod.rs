/// Command-line interface and batch processing
pub mod cli;
/// Engine constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Grayscale PNG loading and export
pub mod image;
/// Progress display
pub mod progress;
