//! Desktop-only wireframe emblem.
//!
//! The emblem follows the backdrop's activation pattern — lazy, one-shot,
//! visibility-gated — but only when the viewport was desktop-sized at
//! construction time. Narrow viewports skip it silently: skipping is the
//! intended behavior there, not a failure.

use glam::Vec3;

use crate::backend::{ContextOptions, RenderBackend};
use crate::scene::{Camera, ColorRgb, ResourceRef, Scene, wire_sphere};
use crate::visibility::VisibilityGate;

use super::{ActivationError, Phase};

/// Minimum initial viewport width, in logical pixels, for the emblem.
pub const DESKTOP_MIN_WIDTH: f32 = 1024.0;
/// Per-frame pitch increment.
pub const TUMBLE_X_PER_FRAME: f32 = 0.005;
/// Per-frame yaw increment.
pub const TUMBLE_Y_PER_FRAME: f32 = 0.01;
/// Camera distance from the sphere's center.
pub const CAMERA_Z: f32 = 3.0;

/// Construction parameters for the emblem.
#[derive(Debug, Clone)]
pub struct EmblemConfig {
    /// Viewport width at construction time; decides desktop eligibility once.
    pub viewport_width: f32,
    /// Drawable surface size in logical pixels.
    pub surface_size: (f32, f32),
    pub color: ColorRgb,
}

impl Default for EmblemConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            surface_size: (400.0, 400.0),
            color: ColorRgb::EMBER,
        }
    }
}

/// Lifecycle controller for the tumbling wireframe sphere.
pub struct EmblemController<B: RenderBackend> {
    config: EmblemConfig,
    phase: Phase,
    gate: VisibilityGate,
    camera: Camera,
    scene: Scene,
    context: Option<B::Context>,
    failure: Option<ActivationError>,
}

impl<B: RenderBackend> EmblemController<B> {
    pub fn new(config: EmblemConfig) -> Self {
        Self {
            config,
            phase: Phase::Dormant,
            gate: VisibilityGate::default(),
            camera: Camera::default(),
            scene: Scene::new(),
            context: None,
            failure: None,
        }
    }

    /// Reports the visible fraction of the host element.
    ///
    /// Same one-shot gate as the backdrop: the first report at or above the
    /// threshold attempts activation.
    pub fn on_visibility(&mut self, fraction: f32, backend: &mut B, target: Option<&B::Target>) {
        if self.gate.observe(fraction) {
            self.try_activate(backend, target);
        }
    }

    /// Builds the sphere and rendering context on desktop-sized viewports.
    ///
    /// On narrower viewports the controller stays dormant without recording
    /// a failure or logging: the emblem simply does not exist there.
    pub fn try_activate(&mut self, backend: &mut B, target: Option<&B::Target>) {
        if self.phase != Phase::Dormant || self.failure.is_some() {
            return;
        }
        if self.config.viewport_width < DESKTOP_MIN_WIDTH {
            return;
        }

        let Some(target) = target else {
            self.fail(ActivationError::MissingTarget);
            return;
        };

        let context = match backend.create_context(target, &ContextOptions::default()) {
            Ok(ctx) => ctx,
            Err(err) => {
                self.fail(ActivationError::BackendUnavailable(err.to_string()));
                return;
            }
        };

        self.scene.add(wire_sphere::generate(self.config.color));

        self.camera.position = Vec3::new(0.0, 0.0, CAMERA_Z);
        self.camera
            .set_aspect(self.config.surface_size.0, self.config.surface_size.1);

        self.context = Some(context);
        self.phase = Phase::Active;
        log::debug!("emblem activated");
    }

    fn fail(&mut self, err: ActivationError) {
        log::warn!("emblem activation failed: {err}");
        self.failure = Some(err);
    }

    /// Adapts the camera and drawable surface to a new surface size.
    pub fn on_resize(&mut self, backend: &mut B, width: f32, height: f32) {
        if self.phase != Phase::Active {
            return;
        }
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        self.config.surface_size = (width, height);
        self.camera.set_aspect(width, height);
        if let Some(context) = self.context.as_mut() {
            backend.set_size(context, width as u32, height as u32);
        }
    }

    /// Advances the tumble one frame and renders.
    pub fn on_frame(&mut self, backend: &mut B) {
        if self.phase != Phase::Active {
            return;
        }

        if let Some(sphere) = self.scene.roots.first_mut() {
            sphere.transform.rotation.x += TUMBLE_X_PER_FRAME;
            sphere.transform.rotation.y += TUMBLE_Y_PER_FRAME;
        }

        if let Some(context) = self.context.as_mut() {
            backend.render(context, &self.scene, &self.camera);
        }
    }

    /// Releases every scene resource exactly once, then the context.
    pub fn dispose(&mut self, backend: &mut B) {
        if self.phase == Phase::Disposed {
            return;
        }
        if self.phase == Phase::Dormant {
            self.phase = Phase::Disposed;
            return;
        }

        if let Some(mut context) = self.context.take() {
            self.scene.visit_resources(&mut |res| match res {
                ResourceRef::Geometry(g) => backend.release_geometry(&mut context, g),
                ResourceRef::Material(m) => backend.release_material(&mut context, m),
            });
            backend.release_context(context);
        }

        self.scene = Scene::new();
        self.phase = Phase::Disposed;
        log::debug!("emblem disposed");
    }

    // ── accessors ──────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn failure(&self) -> Option<&ActivationError> {
        self.failure.as_ref()
    }
}
