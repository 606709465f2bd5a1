//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`MirageError`] covers all failure modes including:
//! - GPU initialization failures
//! - Scene configuration errors
//! - Frame resource allocation errors
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, MirageError>`.
//!
//! ```rust,ignore
//! use mirage::errors::{MirageError, Result};
//!
//! fn render_frame() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Mirage renderer.
///
/// This enum covers all possible error conditions that can occur
/// during operation. Each variant provides specific context about
/// what went wrong.
#[derive(Error, Debug)]
pub enum MirageError {
    // ========================================================================
    // GPU Initialization Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Required wiring is missing or inconsistent, detected before any GPU
    /// work is issued for the frame.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A scene has no active camera node to render from.
    #[error("No active camera: {0}")]
    NoActiveCamera(String),

    // ========================================================================
    // Frame Resource Errors
    // ========================================================================
    /// A frame resource could not be allocated or validated.
    #[error("Resource error: {context} ({width}x{height})")]
    Resource {
        /// Description of the rejected allocation
        context: String,
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },
}

/// Alias for `Result<T, MirageError>`.
pub type Result<T> = std::result::Result<T, MirageError>;
