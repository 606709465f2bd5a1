//! Renderer Settings
//!
//! Global configuration for renderer initialization and frame shading.
//!
//! Settings split into two groups: GPU/backend options consumed once when the
//! context is created, and shading knobs (ambient light, shadow softness,
//! debug views) that are re-read every frame and may be changed between
//! frames through [`Renderer::settings_mut`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mirage::renderer::RendererSettings;
//!
//! // Default: discrete GPU, soft shadows, dim white ambient
//! let settings = RendererSettings::default();
//!
//! // Battery-friendly setup with normals debug view
//! let settings = RendererSettings {
//!     power_preference: wgpu::PowerPreference::LowPower,
//!     paint_normals: true,
//!     ..Default::default()
//! };
//!
//! let renderer = Renderer::new(settings).await?;
//! ```
//!
//! [`Renderer::settings_mut`]: crate::renderer::Renderer::settings_mut

use glam::Vec4;

/// Global configuration for the renderer.
///
/// # Fields
///
/// | Field               | Description                                | Default            |
/// |---------------------|--------------------------------------------|--------------------|
/// | `ambient_color`     | Ambient light color (linear RGBA)          | White (1,1,1,1)    |
/// | `ambient_intensity` | Ambient contribution scale                 | `0.1`              |
/// | `soft_shadow_coef`  | Shadow penumbra sharpness                  | `4.0`              |
/// | `paint_normals`     | Output world-space normals instead of shading | `false`         |
/// | `output_format`     | Format of the destination views            | `Rgba8UnormSrgb`   |
/// | `power_preference`  | GPU adapter selection strategy             | `HighPerformance`  |
/// | `required_features` | Required wgpu features                     | Empty              |
/// | `required_limits`   | Required wgpu limits                       | Default            |
#[derive(Debug, Clone)]
pub struct RendererSettings {
    // === Shading Defaults ===
    /// Ambient light color in linear space.
    ///
    /// Applied uniformly to every surface before per-light shading. The
    /// alpha channel is carried but unused by the kernel.
    pub ambient_color: Vec4,

    /// Scale applied to `ambient_color`.
    ///
    /// `0.0` disables the ambient term entirely; values around `0.1` give a
    /// dim base illumination so unlit faces stay readable.
    pub ambient_intensity: f32,

    /// Sharpness coefficient for soft shadows.
    ///
    /// Higher values tighten the penumbra toward a hard shadow edge; lower
    /// values widen it. `4.0` is a reasonable middle ground.
    pub soft_shadow_coef: f32,

    /// Replace shading with a world-space normal visualization.
    ///
    /// Debug aid: when `true` the kernel writes `normal * 0.5 + 0.5` and
    /// skips lighting and shadows.
    pub paint_normals: bool,

    // === GPU / Backend Configuration ===
    /// Texture format of the destination views frames are composited onto.
    ///
    /// Fixed at initialization because the composite pipeline is compiled
    /// against it. Every [`FrameTarget::destination`] view must use this
    /// format.
    ///
    /// [`FrameTarget::destination`]: crate::renderer::FrameTarget
    pub output_format: wgpu::TextureFormat,

    /// GPU adapter selection preference.
    ///
    /// - `HighPerformance`: Prefer discrete / dedicated GPU
    /// - `LowPower`: Prefer integrated GPU (better battery life)
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features that must be supported by the adapter.
    ///
    /// Initialization fails if these features are unavailable.
    pub required_features: wgpu::Features,

    /// Required wgpu limits (max buffer sizes, binding counts, etc.).
    pub required_limits: wgpu::Limits,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            ambient_color: Vec4::ONE,
            ambient_intensity: 0.1,
            soft_shadow_coef: 4.0,
            paint_normals: false,
            output_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}
