//! GPU rendering subsystem.
//!
//! `WgpuBackend` is the reference `RenderBackend` implementation. Each
//! context owns a `device::Gpu` bound to one window plus two passes: soft
//! additive sprites for point clouds and alpha-blended line lists for
//! wireframes. GPU buffers are uploaded lazily on first use and keyed by
//! `ResourceId`, so release calls can drop them individually.
//!
//! Convention: each pass owns its pipeline and all buffers it draws with.

mod lines;
mod points;

use std::sync::Arc;

use glam::Mat4;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::backend::{BackendError, ContextOptions, RenderBackend};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::scene::{Camera, Drawable, Geometry, Material, Materials, Scene};

use lines::LinesPass;
use points::PointsPass;

/// wgpu-backed rendering.
///
/// The backend itself is a context factory; all GPU state lives in the
/// per-surface `WgpuContext`.
#[derive(Debug, Default)]
pub struct WgpuBackend;

impl WgpuBackend {
    pub fn new() -> Self {
        Self
    }
}

/// One surface's rendering state: GPU handles plus both passes.
pub struct WgpuContext {
    gpu: Gpu,
    points: PointsPass,
    lines: LinesPass,
}

/// A flattened drawable ready for submission.
struct DrawJob<'a> {
    geometry: &'a Geometry,
    materials: &'a Materials,
    model: Mat4,
}

fn collect_jobs<'a>(scene: &'a Scene, out: &mut Vec<DrawJob<'a>>) {
    fn walk<'a>(drawable: &'a Drawable, parent: Mat4, out: &mut Vec<DrawJob<'a>>) {
        let model = parent * drawable.transform.matrix();
        out.push(DrawJob {
            geometry: &drawable.geometry,
            materials: &drawable.materials,
            model,
        });
        for child in &drawable.children {
            walk(child, model, out);
        }
    }

    for root in &scene.roots {
        walk(root, Mat4::IDENTITY, out);
    }
}

impl RenderBackend for WgpuBackend {
    type Target = Arc<Window>;
    type Context = WgpuContext;

    fn create_context(
        &mut self,
        target: &Self::Target,
        options: &ContextOptions,
    ) -> Result<Self::Context, BackendError> {
        let init = GpuInit {
            alpha_mode: options
                .transparent
                .then_some(wgpu::CompositeAlphaMode::PreMultiplied),
            max_pixel_ratio: options.max_pixel_ratio,
            ..GpuInit::default()
        };

        let gpu = pollster::block_on(Gpu::new(target.clone(), init))
            .map_err(|e| BackendError::Unavailable(format!("{e:#}")))?;

        log::debug!(
            "created rendering context, {}x{} {:?}",
            gpu.size().width,
            gpu.size().height,
            gpu.surface_format()
        );

        Ok(WgpuContext {
            gpu,
            points: PointsPass::default(),
            lines: LinesPass::default(),
        })
    }

    fn set_size(&mut self, context: &mut Self::Context, width: u32, height: u32) {
        context.gpu.resize(PhysicalSize::new(width, height));
    }

    fn render(&mut self, context: &mut Self::Context, scene: &Scene, camera: &Camera) {
        let mut frame = match context.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = context.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("fatal surface error; frame dropped");
                }
                return;
            }
        };

        // Clear pass — transparent so the backdrop composites over whatever
        // the host renders underneath.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("emberfield clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let mut jobs = Vec::new();
        collect_jobs(scene, &mut jobs);

        let device = context.gpu.device();
        let queue = context.gpu.queue();
        let format = context.gpu.surface_format();

        for job in &jobs {
            let Some(material) = job.materials.primary() else {
                continue;
            };

            context.points.render(
                device,
                queue,
                format,
                &mut frame.encoder,
                &frame.view,
                job.geometry,
                material,
                job.model,
                camera,
            );
            context.lines.render(
                device,
                queue,
                format,
                &mut frame.encoder,
                &frame.view,
                job.geometry,
                material,
                job.model,
                camera,
            );
        }

        context.gpu.submit(frame);
    }

    fn release_geometry(&mut self, context: &mut Self::Context, geometry: &Geometry) {
        context.points.release(geometry.id);
        context.lines.release(geometry.id);
        log::trace!("released geometry {:?}", geometry.id);
    }

    fn release_material(&mut self, _context: &mut Self::Context, material: &Material) {
        // Materials are uniform parameters in this backend; nothing is held
        // per material on the GPU. The call still participates in the
        // exactly-once disposal contract.
        log::trace!("released material {:?}", material.id);
    }

    fn release_context(&mut self, context: Self::Context) {
        drop(context);
        log::debug!("released rendering context");
    }
}
