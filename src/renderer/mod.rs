//! Renderer
//!
//! The per-frame driver tying the pipeline together. [`Renderer::render`]
//! runs the whole frame:
//!
//! 1. validate the viewport and ensure the output target matches it
//! 2. refresh the camera (aspect, projection) and the scene world matrices
//! 3. extract shape and light descriptors out of the scene
//! 4. compile them into sorted, fixed-layout GPU records
//! 5. upload records and uniforms, record the compute dispatch and the
//!    composite pass into one encoder, submit
//!
//! When a frame has no shapes the kernel is skipped entirely and the source
//! view is blitted onto the destination unchanged. Per-frame record buffers
//! are scope guards, so both exit paths release them.
//!
//! The renderer is headless: each frame reads a caller-owned source view and
//! writes a caller-owned destination view. The only resource that survives a
//! frame is the kernel's output image, recreated on viewport resizes.

pub mod compiler;
pub mod context;
pub mod extracted;
pub mod passes;
pub mod records;
pub mod resources;
pub mod settings;

pub use context::WgpuContext;
pub use extracted::{ExtractedLight, ExtractedShape, SceneQuery};
pub use records::{LightRecord, ShapeRecord, LIGHT_RECORD_SIZE, SHAPE_RECORD_SIZE};
pub use resources::{FrameBuffer, OutputTarget, ResourceManager, OUTPUT_FORMAT};
pub use settings::RendererSettings;

use crate::errors::{MirageError, Result};
use crate::scene::{NodeHandle, Scene};

use self::compiler::{compile_lights, compile_shapes, dispatch_groups};
use self::passes::composite::CompositePass;
use self::passes::raymarch::RaymarchPass;
use self::records::KernelUniforms;

/// The views one frame reads and writes, owned by the caller.
///
/// `source` is the camera color input the kernel composites over;
/// `destination` receives the final image and must use the
/// [`RendererSettings::output_format`] the renderer was built with. Both
/// views are expected to match the `width` x `height` viewport.
pub struct FrameTarget<'a> {
    pub source: &'a wgpu::TextureView,
    pub destination: &'a wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// What a finished frame did, for hosts and tests that want to observe the
/// orchestration without reading GPU memory back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Shapes compiled this frame.
    pub shape_count: usize,
    /// Lights compiled this frame.
    pub light_count: usize,
    /// `false` on the empty-scene passthrough path.
    pub dispatched: bool,
    /// `true` when the output target was (re)allocated this frame.
    pub output_recreated: bool,
}

/// Per-frame scene compiler and dispatch orchestrator.
pub struct Renderer {
    context: WgpuContext,
    settings: RendererSettings,

    resources: ResourceManager,
    raymarch: RaymarchPass,
    composite: CompositePass,

    /// Persistent uniform buffer, rewritten each dispatched frame.
    uniform_buffer: wgpu::Buffer,

    // Extraction scratch, reused across frames to keep allocations flat.
    shapes: Vec<ExtractedShape>,
    lights: Vec<ExtractedLight>,
}

impl Renderer {
    /// Creates a headless renderer, blocking on adapter and device
    /// acquisition.
    pub fn new(settings: RendererSettings) -> Result<Self> {
        let context = pollster::block_on(WgpuContext::new(&settings))?;
        Ok(Self::with_context(context, settings))
    }

    /// Creates a renderer on an already-acquired context. Used by hosts that
    /// share a device, and by `new`.
    #[must_use]
    pub fn with_context(context: WgpuContext, settings: RendererSettings) -> Self {
        let device = &context.device;

        let resources = ResourceManager::new(&device.limits());
        let raymarch = RaymarchPass::new(device);
        let composite = CompositePass::new(device, settings.output_format);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Kernel Uniforms"),
            size: size_of::<KernelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            context,
            settings,
            resources,
            raymarch,
            composite,
            uniform_buffer,
            shapes: Vec::new(),
            lights: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> &WgpuContext {
        &self.context
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Shading settings (ambient, shadow softness, debug views) may be
    /// changed between frames; GPU/backend fields are only read at
    /// construction.
    #[inline]
    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// Renders one frame from the scene's active camera.
    ///
    /// # Errors
    ///
    /// Viewport validation failures surface as [`MirageError::Resource`]
    /// before any GPU work; no passthrough is attempted in that case, since
    /// a destination view of the rejected size cannot exist either.
    pub fn render(&mut self, scene: &mut Scene, frame: &FrameTarget) -> Result<FrameReport> {
        let camera = scene.active_camera.ok_or_else(|| {
            MirageError::NoActiveCamera("scene has no active camera node".to_string())
        })?;
        self.render_with_camera(scene, camera, frame)
    }

    /// Renders one frame from an explicit camera node.
    pub fn render_with_camera(
        &mut self,
        scene: &mut Scene,
        camera: NodeHandle,
        frame: &FrameTarget,
    ) -> Result<FrameReport> {
        // 1. Output target, sized to the viewport. Validation happens here,
        // before any other GPU work.
        let (_, output_recreated) =
            self.resources
                .ensure_output_target(&self.context.device, frame.width, frame.height)?;

        // 2. Camera and world matrices. Aspect follows the viewport; the
        // transform system refreshes the view matrix from the node.
        let aspect = frame.width as f32 / frame.height as f32;
        let (_, cam) = scene.query_camera_bundle(camera).ok_or_else(|| {
            MirageError::Configuration("camera node has no camera component".to_string())
        })?;
        cam.set_aspect(aspect);
        scene.update_matrix_world();

        let cam = scene
            .get_camera(camera)
            .ok_or_else(|| MirageError::Configuration("camera component vanished".to_string()))?;
        let camera_to_world = cam.camera_to_world();
        let projection_inverse = cam.projection_inverse();

        // 3. Extraction. Scratch vectors keep their allocations frame to
        // frame.
        self.shapes.clear();
        self.lights.clear();
        scene.collect_shapes(&mut self.shapes);
        scene.collect_lights(&mut self.lights);
        log::trace!(
            "Frame extraction: {} shapes, {} lights",
            self.shapes.len(),
            self.lights.len()
        );

        // 4. Compilation. The light buffer exists on both paths and is
        // released on both: the guards below live until after submit.
        let light_records = compile_lights(&self.lights);
        let light_buffer = self
            .resources
            .create_light_buffer(&self.context.device, &light_records);

        let shape_records = compile_shapes(&self.shapes);

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });

        // 5. Empty scene: passthrough blit, no shape buffer, no dispatch.
        if shape_records.is_empty() {
            let blit = self
                .composite
                .create_bind_group(&self.context.device, frame.source);
            self.composite.record(&mut encoder, &blit, frame.destination);
            self.context.queue.submit(Some(encoder.finish()));

            drop(light_buffer);
            return Ok(FrameReport {
                shape_count: 0,
                light_count: light_records.len(),
                dispatched: false,
                output_recreated,
            });
        }

        // 6. Upload, dispatch, composite.
        let shape_buffer = self
            .resources
            .create_shape_buffer(&self.context.device, &shape_records);

        let uniforms = KernelUniforms {
            camera_to_world,
            projection_inverse,
            ambient_color: self.settings.ambient_color,
            ambient_intensity: self.settings.ambient_intensity,
            soft_shadow_coef: self.settings.soft_shadow_coef,
            num_shapes: shape_records.len() as u32,
            num_lights: light_records.len() as u32,
            paint_normals: u32::from(self.settings.paint_normals),
            pad: [0; 3],
        };
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let output = self
            .resources
            .output()
            .ok_or_else(|| MirageError::Configuration("output target missing".to_string()))?;

        let kernel_bind = self.raymarch.create_bind_group(
            &self.context.device,
            &self.uniform_buffer,
            shape_buffer.buffer(),
            light_buffer.buffer(),
            frame.source,
            &output.view,
        );
        self.raymarch.record(
            &mut encoder,
            &kernel_bind,
            dispatch_groups(frame.width, frame.height),
        );

        let resolve = self
            .composite
            .create_bind_group(&self.context.device, &output.view);
        self.composite
            .record(&mut encoder, &resolve, frame.destination);

        self.context.queue.submit(Some(encoder.finish()));

        // Guards drop here; the queued work holds its own references.
        drop(shape_buffer);
        drop(light_buffer);

        Ok(FrameReport {
            shape_count: shape_records.len(),
            light_count: light_records.len(),
            dispatched: true,
            output_recreated,
        })
    }
}
