//! Offscreen raymarching demo.
//!
//! Builds the classic test scene (floor, backdrop, a smooth-blended cube and
//! sphere, a carving torus, three light classes), animates it for a couple of
//! seconds, renders the final frame headless, and saves it as `raymarch.png`.

use anyhow::{Context, Result};
use glam::{Vec3, Vec4};
use mirage::{
    AnimationSystem, Animator, BlendMode, Camera, FrameTarget, Light, Orbit, Renderer,
    RendererSettings, Scene, Shape, Spin, SpinAxis,
};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

/// Simulated seconds of animation before the frame is taken.
const WARMUP_SECONDS: f32 = 2.0;
const TICK: f32 = 1.0 / 60.0;

fn build_scene(scene: &mut Scene, animation: &mut AnimationSystem) {
    // Ground and backdrop
    let floor = scene.add_shape(Shape::floor_plane(Vec3::new(0.35, 0.35, 0.38)));
    scene.get_node_mut(floor).unwrap().transform.position = Vec3::new(0.0, -1.0, 0.0);

    let backdrop = scene.add_shape(Shape::background_plane(Vec3::new(0.5, 0.6, 0.75)));
    scene.get_node_mut(backdrop).unwrap().transform.position = Vec3::new(0.0, 0.0, -8.0);

    // A cube and a sphere smooth-blended into one blob
    let cube = scene.add_shape(Shape::new(
        mirage::ShapeKind::Cube,
        Vec4::new(0.9, 0.25, 0.2, 1.0),
    ));
    scene.get_node_mut(cube).unwrap().transform.position = Vec3::new(-0.8, 0.0, 0.0);
    animation.set(cube, Animator::Spin(Spin::new(SpinAxis::Y, 0.8)));

    let sphere = scene.add_shape(
        Shape::sphere(Vec4::new(0.2, 0.5, 0.9, 1.0)).with_blend(BlendMode::Blend, 0.4),
    );
    let sphere_node = scene.get_node_mut(sphere).unwrap();
    sphere_node.transform.position = Vec3::new(0.6, 0.2, 0.0);
    sphere_node.transform.scale = Vec3::splat(1.4);

    // A torus carving into the blob
    let torus = scene.add_shape(
        Shape::torus(Vec4::new(0.9, 0.8, 0.2, 1.0)).with_blend(BlendMode::Cut, 0.0),
    );
    let torus_node = scene.get_node_mut(torus).unwrap();
    torus_node.transform.position = Vec3::new(0.0, 0.6, 0.3);
    torus_node.transform.scale = Vec3::new(1.6, 0.5, 1.6);
    animation.set(torus, Animator::Spin(Spin::new(SpinAxis::X, 0.5)));

    // Key light
    let sun = scene.add_light(Light::new_directional(Vec3::new(1.0, 0.96, 0.9), 1.2));
    scene
        .get_node_mut(sun)
        .unwrap()
        .transform
        .look_at(Vec3::new(-0.5, -1.0, -0.6), Vec3::Y);

    // Orbiting fill light
    let fill = scene.add_light(Light::new_point(Vec3::new(0.3, 0.5, 1.0), 2.0, 8.0));
    scene.get_node_mut(fill).unwrap().transform.position = Vec3::new(2.0, 1.5, 1.0);
    animation.set(fill, Animator::Orbit(Orbit::new(2.5, 0.0, 1.2)));

    // Narrow spot from above
    let spot = scene.add_light(Light::new_spot(Vec3::new(1.0, 0.4, 0.8), 3.0, 12.0, 35.0));
    let spot_node = scene.get_node_mut(spot).unwrap();
    spot_node.transform.position = Vec3::new(0.0, 4.0, 2.0);
    spot_node.transform.look_at(Vec3::ZERO, Vec3::Y);

    // Camera
    let camera = scene.add_camera(Camera::new_perspective(
        60.0,
        WIDTH as f32 / HEIGHT as f32,
        0.1,
        100.0,
    ));
    let camera_node = scene.get_node_mut(camera).unwrap();
    camera_node.transform.position = Vec3::new(0.0, 1.6, 5.0);
    camera_node.transform.look_at(Vec3::new(0.0, 0.2, 0.0), Vec3::Y);
    scene.active_camera = Some(camera);
}

/// Uploads a vertical sky gradient used as the frame's source image.
fn create_source_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Demo Source"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    for y in 0..HEIGHT {
        let t = y as f32 / HEIGHT as f32;
        let r = (40.0 + 60.0 * t) as u8;
        let g = (70.0 + 80.0 * t) as u8;
        let b = (140.0 + 90.0 * t) as u8;
        for x in 0..WIDTH {
            let i = ((y * WIDTH + x) * 4) as usize;
            pixels[i] = r;
            pixels[i + 1] = g;
            pixels[i + 2] = b;
            pixels[i + 3] = 255;
        }
    }

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(WIDTH * 4),
            rows_per_image: Some(HEIGHT),
        },
        wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
    );

    texture
}

/// Copies the destination texture into a mapped buffer and returns tightly
/// packed RGBA8 rows.
fn read_back(device: &wgpu::Device, queue: &wgpu::Queue, texture: &wgpu::Texture) -> Result<Vec<u8>> {
    const ALIGN: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let row_bytes = WIDTH * 4;
    let padded_row = row_bytes.div_ceil(ALIGN) * ALIGN;

    let read_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback"),
        size: u64::from(padded_row) * u64::from(HEIGHT),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &read_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(HEIGHT),
            },
        },
        wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(Some(encoder.finish()));

    let slice = read_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |res| {
        let _ = tx.send(res);
    });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .context("device poll failed")?;
    rx.recv()
        .context("map_async callback dropped")?
        .context("buffer mapping failed")?;

    let data = slice.get_mapped_range();
    let mut out = Vec::with_capacity((row_bytes * HEIGHT) as usize);
    for y in 0..HEIGHT as usize {
        let start = y * padded_row as usize;
        out.extend_from_slice(&data[start..start + row_bytes as usize]);
    }
    drop(data);
    read_buffer.unmap();

    Ok(out)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut renderer = Renderer::new(RendererSettings::default())?;

    let mut scene = Scene::new();
    let mut animation = AnimationSystem::new();
    build_scene(&mut scene, &mut animation);

    let device = &renderer.context().device;
    let source = create_source_texture(device, &renderer.context().queue);
    let source_view = source.create_view(&wgpu::TextureViewDescriptor::default());

    let destination = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Demo Destination"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: renderer.settings().output_format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let destination_view = destination.create_view(&wgpu::TextureViewDescriptor::default());

    let frame = FrameTarget {
        source: &source_view,
        destination: &destination_view,
        width: WIDTH,
        height: HEIGHT,
    };

    let ticks = (WARMUP_SECONDS / TICK) as usize;
    for _ in 0..ticks {
        animation.advance(&mut scene, TICK);
    }

    let report = renderer.render(&mut scene, &frame)?;
    log::info!(
        "Rendered {} shapes / {} lights (dispatched: {})",
        report.shape_count,
        report.light_count,
        report.dispatched
    );

    let pixels = read_back(
        &renderer.context().device,
        &renderer.context().queue,
        &destination,
    )?;

    let img = image::RgbaImage::from_raw(WIDTH, HEIGHT, pixels)
        .context("readback size mismatch")?;
    img.save("raymarch.png").context("failed to write PNG")?;
    println!("Wrote raymarch.png ({WIDTH}x{HEIGHT})");

    Ok(())
}
