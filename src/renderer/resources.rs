//! Frame Resource Management
//!
//! Owns the GPU resources whose lifetime the per-frame procedure has to get
//! right:
//!
//! - the **output target**, a persistent storage image the kernel writes;
//!   kept across frames and recreated only when the viewport size changes
//! - the **record buffers** (shapes, lights), created fresh every frame and
//!   destroyed when their [`FrameBuffer`] guard drops — on every exit path,
//!   including the empty-scene early return
//!
//! Allocation requests are validated against device limits before any GPU
//! call is made.

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::errors::{MirageError, Result};
use crate::renderer::records::{LightRecord, ShapeRecord};

/// Storage format of the raymarch output image. Linear color; the composite
/// pass resolves it onto the destination.
pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// The persistent image the kernel writes and the composite pass samples.
pub struct OutputTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Storage buffer scoped to a single frame.
///
/// Dropping the guard destroys the GPU allocation immediately instead of
/// waiting for the handle's reference count, so a frame can never leak its
/// record buffers past its own scope.
pub struct FrameBuffer {
    buffer: wgpu::Buffer,
}

impl FrameBuffer {
    fn from_bytes(device: &wgpu::Device, label: &'static str, contents: &[u8]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::STORAGE,
        });
        Self { buffer }
    }

    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub fn as_entire_binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

/// Decision helper behind [`ResourceManager::ensure_output_target`]: a held
/// image of `current` size must be replaced when the request differs.
#[inline]
#[must_use]
pub fn needs_recreate(current: Option<(u32, u32)>, width: u32, height: u32) -> bool {
    match current {
        Some((w, h)) => w != width || h != height,
        None => true,
    }
}

/// Validates viewport dimensions against device limits.
pub fn validate_viewport(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MirageError::Resource {
            context: "viewport must be non-zero".to_string(),
            width,
            height,
        });
    }
    if width > max_dimension || height > max_dimension {
        return Err(MirageError::Resource {
            context: format!("viewport exceeds max texture dimension {max_dimension}"),
            width,
            height,
        });
    }
    Ok(())
}

/// Owns the persistent output image and creates the per-frame buffers.
pub struct ResourceManager {
    output: Option<OutputTarget>,
    max_dimension: u32,
}

impl ResourceManager {
    #[must_use]
    pub fn new(limits: &wgpu::Limits) -> Self {
        Self {
            output: None,
            max_dimension: limits.max_texture_dimension_2d,
        }
    }

    /// Returns the output target for a `width` x `height` frame, allocating
    /// or reallocating only when the size changed.
    ///
    /// The boolean is `true` when a new image was allocated this call.
    pub fn ensure_output_target(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> Result<(&OutputTarget, bool)> {
        validate_viewport(width, height, self.max_dimension)?;

        let current = self.output.as_ref().map(|o| (o.width, o.height));
        if !needs_recreate(current, width, height) {
            // The first call always recreates, so a held image exists here
            let target = self.output.as_ref().expect("output target held");
            return Ok((target, false));
        }

        if let Some(old) = self.output.take() {
            log::debug!(
                "Recreating raymarch output target: {}x{} -> {}x{}",
                old.width,
                old.height,
                width,
                height
            );
            old.texture.destroy();
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Raymarch Output"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let target = self.output.insert(OutputTarget {
            texture,
            view,
            width,
            height,
        });
        Ok((target, true))
    }

    /// Current output target, if one has been allocated.
    #[must_use]
    pub fn output(&self) -> Option<&OutputTarget> {
        self.output.as_ref()
    }

    /// Frame-scoped storage buffer holding the compiled shape records.
    ///
    /// Callers must not request a buffer for an empty record list; the
    /// orchestrator skips the dispatch entirely in that case.
    #[must_use]
    pub fn create_shape_buffer(
        &self,
        device: &wgpu::Device,
        records: &[ShapeRecord],
    ) -> FrameBuffer {
        debug_assert!(!records.is_empty());
        FrameBuffer::from_bytes(device, "Shape Records", bytemuck::cast_slice(records))
    }

    /// Frame-scoped storage buffer holding the compiled light records.
    ///
    /// An empty list still yields a valid binding: zero-sized buffers are
    /// not bindable, so one zeroed record backs the buffer while the
    /// uniform light count stays 0.
    #[must_use]
    pub fn create_light_buffer(
        &self,
        device: &wgpu::Device,
        records: &[LightRecord],
    ) -> FrameBuffer {
        if records.is_empty() {
            let placeholder = LightRecord::zeroed();
            FrameBuffer::from_bytes(device, "Light Records", bytemuck::bytes_of(&placeholder))
        } else {
            FrameBuffer::from_bytes(device, "Light Records", bytemuck::cast_slice(records))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recreate_only_when_size_differs() {
        assert!(needs_recreate(None, 640, 480));
        assert!(!needs_recreate(Some((640, 480)), 640, 480));
        assert!(needs_recreate(Some((640, 480)), 641, 480));
        assert!(needs_recreate(Some((640, 480)), 640, 479));
    }

    #[test]
    fn viewport_validation_rejects_degenerate_sizes() {
        assert!(validate_viewport(1920, 1080, 8192).is_ok());
        assert!(validate_viewport(0, 1080, 8192).is_err());
        assert!(validate_viewport(1920, 0, 8192).is_err());
        assert!(validate_viewport(8193, 1080, 8192).is_err());

        let err = validate_viewport(0, 720, 8192).unwrap_err();
        match err {
            MirageError::Resource { width, height, .. } => {
                assert_eq!(width, 0);
                assert_eq!(height, 720);
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
