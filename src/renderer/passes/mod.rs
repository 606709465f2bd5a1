//! Render Passes
//!
//! The frame is two fixed passes:
//!
//! 1. [`RaymarchPass`] — compute kernel that marches the compiled shape
//!    records and writes lit color into the output storage image
//! 2. [`CompositePass`] — fullscreen triangle that resolves an input view
//!    onto the destination; it doubles as the passthrough blit when a frame
//!    has nothing to march

pub mod composite;
pub mod raymarch;

pub use composite::CompositePass;
pub use raymarch::RaymarchPass;
