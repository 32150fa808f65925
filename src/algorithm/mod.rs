/// Exemplar inpainting state machine and entry points
pub mod executor;
/// Patch commit and front refresh
pub mod filling;
/// Fill front tracking
pub mod front;
/// Distance-ordered diffusion inpainting
pub mod marching;
/// Masked SSD source patch search
pub mod matching;
/// Confidence and data terms for fill ordering
pub mod priority;
