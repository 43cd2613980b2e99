//! Pointer-reactive particle backdrop.
//!
//! Lifecycle:
//! 1. Construct dormant. Nothing is allocated.
//! 2. Feed visibility reports; the first one at or above the threshold
//!    triggers activation (context + point cloud + camera).
//! 3. Per frame: apply pointer-driven rotation, the constant drift, the
//!    breathing offset, then render.
//! 4. Dispose releases every geometry and material exactly once, then the
//!    context itself.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::backend::{ContextOptions, RenderBackend};
use crate::input::PointerTracker;
use crate::scene::{Camera, ColorRgb, ResourceRef, Scene, point_cloud};
use crate::visibility::VisibilityGate;

use super::{ActivationError, Phase};

/// Pointer offsets are in logical pixels; this brings them to rotation scale.
pub const POINTER_SCALE: f32 = 0.001;
/// Gain from the scaled pointer offset to per-frame rotation deltas.
pub const POINTER_ROTATION_GAIN: f32 = 0.05;
/// Constant yaw drift per frame, present even with the pointer at rest.
pub const DRIFT_PER_FRAME: f32 = 0.0005;
/// Breathing wave frequency in radians per second of elapsed time.
pub const BREATH_RATE: f32 = 0.5;
/// Breathing wave amplitude in world units on y.
pub const BREATH_AMPLITUDE: f32 = 0.1;
/// Camera distance from the cloud's center plane.
pub const CAMERA_Z: f32 = 5.0;

/// Construction parameters for the backdrop.
#[derive(Debug, Clone)]
pub struct BackdropConfig {
    /// Viewport size in logical pixels at construction time.
    ///
    /// The width decides the point count once; later resizes never regenerate
    /// the cloud.
    pub viewport: (f32, f32),
    /// Brand color the per-point shades attenuate from.
    pub base_color: ColorRgb,
    /// Fixed seed for the point sampler. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            viewport: (1280.0, 720.0),
            base_color: ColorRgb::EMBER,
            seed: None,
        }
    }
}

/// Lifecycle controller for the particle field.
pub struct BackdropController<B: RenderBackend> {
    config: BackdropConfig,
    phase: Phase,
    gate: VisibilityGate,
    pointer: PointerTracker,
    camera: Camera,
    scene: Scene,
    context: Option<B::Context>,
    /// Whether frames should actually render (viewport-presence toggle).
    live: bool,
    failure: Option<ActivationError>,
}

impl<B: RenderBackend> BackdropController<B> {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            config,
            phase: Phase::Dormant,
            gate: VisibilityGate::default(),
            pointer: PointerTracker::new(),
            camera: Camera::default(),
            scene: Scene::new(),
            context: None,
            live: false,
            failure: None,
        }
    }

    /// Reports the visible fraction of the host element.
    ///
    /// The first report at or above the gate threshold activates the
    /// controller; everything after that is ignored.
    pub fn on_visibility(&mut self, fraction: f32, backend: &mut B, target: Option<&B::Target>) {
        if self.gate.observe(fraction) {
            self.try_activate(backend, target);
        }
    }

    /// Builds the scene and rendering context.
    ///
    /// Idempotent: once the controller has left `Dormant`, or a previous
    /// attempt has failed, this is a no-op.
    pub fn try_activate(&mut self, backend: &mut B, target: Option<&B::Target>) {
        if self.phase != Phase::Dormant || self.failure.is_some() {
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

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let cloud = point_cloud::generate(self.config.viewport.0, self.config.base_color, &mut rng);
        log::debug!("backdrop activated with {} points", cloud.geometry.vertex_count());
        self.scene.add(cloud);

        self.camera.position = Vec3::new(0.0, 0.0, CAMERA_Z);
        self.camera.set_aspect(self.config.viewport.0, self.config.viewport.1);

        self.context = Some(context);
        self.live = true;
        self.phase = Phase::Active;
    }

    /// Records a terminal activation failure.
    fn fail(&mut self, err: ActivationError) {
        log::warn!("backdrop activation failed: {err}");
        self.failure = Some(err);
    }

    /// Records a pointer position in viewport coordinates.
    pub fn on_pointer_move(&mut self, client: (f32, f32), viewport: (f32, f32)) {
        self.pointer.record(client, viewport);
    }

    /// Adapts the camera and drawable surface to a new viewport size.
    ///
    /// The point cloud is never regenerated here; a window dragged across the
    /// narrow-width boundary keeps its original count.
    pub fn on_resize(&mut self, backend: &mut B, width: f32, height: f32) {
        if self.phase != Phase::Active {
            return;
        }
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        self.config.viewport = (width, height);
        self.camera.set_aspect(width, height);
        if let Some(context) = self.context.as_mut() {
            backend.set_size(context, width as u32, height as u32);
        }
    }

    /// Toggles the liveness flag gating `on_frame`.
    ///
    /// Tracks the host surface's presence (occlusion, tab visibility). While
    /// not live the frame step is skipped entirely, so a hidden backdrop does
    /// no work.
    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    /// Advances the animation one frame and renders.
    ///
    /// `elapsed_secs` is time since the clock started, used for the breathing
    /// wave. Rotation advances by fixed per-frame deltas.
    pub fn on_frame(&mut self, backend: &mut B, elapsed_secs: f32) {
        if self.phase != Phase::Active || !self.live {
            return;
        }

        let (px, py) = self.pointer.offset();
        let (tx, ty) = (px * POINTER_SCALE, py * POINTER_SCALE);

        if let Some(cloud) = self.scene.roots.first_mut() {
            cloud.transform.rotation.y += DRIFT_PER_FRAME + tx * POINTER_ROTATION_GAIN;
            cloud.transform.rotation.x += ty * POINTER_ROTATION_GAIN;
            cloud.transform.position.y = (elapsed_secs * BREATH_RATE).sin() * BREATH_AMPLITUDE;
        }

        if let Some(context) = self.context.as_mut() {
            backend.render(context, &self.scene, &self.camera);
        }
    }

    /// Releases every scene resource exactly once, then the context.
    ///
    /// Safe to call from any phase: disposing twice is a no-op, and disposing
    /// a dormant controller just marks it disposed.
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
        self.live = false;
        self.phase = Phase::Disposed;
        log::debug!("backdrop disposed");
    }

    // ── accessors ──────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Point count of the generated cloud; zero while dormant or disposed.
    pub fn point_count(&self) -> usize {
        self.scene
            .roots
            .first()
            .map(|d| d.geometry.vertex_count())
            .unwrap_or(0)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The terminal activation failure, if one occurred.
    pub fn failure(&self) -> Option<&ActivationError> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::fake::FakeBackend;
    use crate::scene::{Drawable, Geometry, Material, Materials, point_cloud};

    use super::*;

    fn config(width: f32) -> BackdropConfig {
        BackdropConfig {
            viewport: (width, 720.0),
            seed: Some(7),
            ..Default::default()
        }
    }

    fn active_controller(width: f32) -> (BackdropController<FakeBackend>, FakeBackend) {
        let mut backend = FakeBackend::default();
        let mut ctl = BackdropController::new(config(width));
        ctl.on_visibility(1.0, &mut backend, Some(&()));
        assert_eq!(ctl.phase(), Phase::Active);
        (ctl, backend)
    }

    // ── activation ────────────────────────────────────────────────────────

    #[test]
    fn dormant_until_visibility_threshold() {
        let mut backend = FakeBackend::default();
        let mut ctl = BackdropController::new(config(1280.0));

        ctl.on_visibility(0.0, &mut backend, Some(&()));
        ctl.on_visibility(0.09, &mut backend, Some(&()));
        assert_eq!(ctl.phase(), Phase::Dormant);
        assert_eq!(backend.contexts_created, 0);

        ctl.on_visibility(0.1, &mut backend, Some(&()));
        assert_eq!(ctl.phase(), Phase::Active);
        assert_eq!(backend.contexts_created, 1);
    }

    #[test]
    fn activation_happens_once() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        ctl.on_visibility(1.0, &mut backend, Some(&()));
        ctl.try_activate(&mut backend, Some(&()));

        assert_eq!(backend.contexts_created, 1);
    }

    #[test]
    fn wide_viewport_gets_full_cloud() {
        let (ctl, _) = active_controller(1920.0);
        assert_eq!(ctl.point_count(), point_cloud::WIDE_COUNT);
    }

    #[test]
    fn narrow_viewport_gets_reduced_cloud() {
        let (ctl, _) = active_controller(500.0);
        assert_eq!(ctl.point_count(), point_cloud::NARROW_COUNT);
    }

    #[test]
    fn camera_starts_behind_the_cloud() {
        let (ctl, _) = active_controller(1280.0);
        assert_eq!(ctl.camera().position.z, CAMERA_Z);
        assert!((ctl.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    // ── activation failures ───────────────────────────────────────────────

    #[test]
    fn missing_target_latches_dormant() {
        let mut backend = FakeBackend::default();
        let mut ctl = BackdropController::new(config(1280.0));

        ctl.on_visibility(1.0, &mut backend, None);

        assert_eq!(ctl.phase(), Phase::Dormant);
        assert_eq!(ctl.failure(), Some(&ActivationError::MissingTarget));
        assert_eq!(backend.contexts_created, 0);
        assert_eq!(ctl.point_count(), 0);

        // A target appearing later does not revive the controller.
        ctl.try_activate(&mut backend, Some(&()));
        assert_eq!(ctl.phase(), Phase::Dormant);
        assert_eq!(backend.contexts_created, 0);
    }

    #[test]
    fn unavailable_backend_latches_dormant() {
        let mut backend = FakeBackend {
            unavailable: true,
            ..Default::default()
        };
        let mut ctl = BackdropController::new(config(1280.0));

        ctl.on_visibility(1.0, &mut backend, Some(&()));

        assert_eq!(ctl.phase(), Phase::Dormant);
        assert!(matches!(
            ctl.failure(),
            Some(ActivationError::BackendUnavailable(_))
        ));
        assert!(ctl.scene().is_empty());

        // Backend recovery does not matter; the failure is terminal.
        backend.unavailable = false;
        ctl.try_activate(&mut backend, Some(&()));
        assert_eq!(ctl.phase(), Phase::Dormant);
        assert_eq!(backend.contexts_created, 0);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_updates_camera_and_surface_only() {
        let (mut ctl, mut backend) = active_controller(1280.0);
        let count_before = ctl.point_count();

        ctl.on_resize(&mut backend, 800.0, 600.0);

        assert!((ctl.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(backend.set_size_calls, vec![(800, 600)]);
        // Crossing the narrow-width boundary must not regenerate the cloud.
        assert_eq!(ctl.point_count(), count_before);
    }

    #[test]
    fn resize_ignores_degenerate_sizes() {
        let (mut ctl, mut backend) = active_controller(1280.0);
        let aspect_before = ctl.camera().aspect;

        ctl.on_resize(&mut backend, 0.0, 600.0);
        ctl.on_resize(&mut backend, 800.0, 0.0);

        assert_eq!(ctl.camera().aspect, aspect_before);
        assert!(backend.set_size_calls.is_empty());
    }

    #[test]
    fn resize_before_activation_is_ignored() {
        let mut backend = FakeBackend::default();
        let mut ctl = BackdropController::<FakeBackend>::new(config(1280.0));

        ctl.on_resize(&mut backend, 800.0, 600.0);

        assert!(backend.set_size_calls.is_empty());
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn frame_applies_drift_and_pointer_rotation() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        // Pointer 100 px right of center, 200 px above.
        ctl.on_pointer_move((740.0, 160.0), (1280.0, 720.0));
        ctl.on_frame(&mut backend, 0.0);

        let rot = ctl.scene().roots[0].transform.rotation;
        let expected_y = DRIFT_PER_FRAME + (100.0 * POINTER_SCALE) * POINTER_ROTATION_GAIN;
        let expected_x = (-200.0 * POINTER_SCALE) * POINTER_ROTATION_GAIN;
        assert!((rot.y - expected_y).abs() < 1e-6);
        assert!((rot.x - expected_x).abs() < 1e-6);
        assert_eq!(backend.render_count, 1);
    }

    #[test]
    fn rotation_accumulates_across_frames() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        for i in 0..10 {
            ctl.on_frame(&mut backend, i as f32 / 60.0);
        }

        let rot = ctl.scene().roots[0].transform.rotation;
        assert!((rot.y - 10.0 * DRIFT_PER_FRAME).abs() < 1e-6);
        assert_eq!(rot.x, 0.0);
        assert_eq!(backend.render_count, 10);
    }

    #[test]
    fn breathing_offset_follows_elapsed_time() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        ctl.on_frame(&mut backend, 3.0);

        let pos = ctl.scene().roots[0].transform.position;
        let expected = (3.0f32 * BREATH_RATE).sin() * BREATH_AMPLITUDE;
        assert!((pos.y - expected).abs() < 1e-6);
    }

    #[test]
    fn frames_while_dormant_do_nothing() {
        let mut backend = FakeBackend::default();
        let mut ctl = BackdropController::<FakeBackend>::new(config(1280.0));

        ctl.on_frame(&mut backend, 1.0);

        assert_eq!(backend.render_count, 0);
    }

    #[test]
    fn not_live_skips_the_frame_entirely() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        ctl.set_live(false);
        ctl.on_frame(&mut backend, 1.0);
        ctl.on_frame(&mut backend, 2.0);

        assert_eq!(backend.render_count, 0);
        assert_eq!(ctl.scene().roots[0].transform.rotation.y, 0.0);

        // Coming back live resumes without disposing anything.
        ctl.set_live(true);
        ctl.on_frame(&mut backend, 3.0);
        assert_eq!(backend.render_count, 1);
        assert!(ctl.scene().roots[0].transform.rotation.y > 0.0);
    }

    // ── disposal ──────────────────────────────────────────────────────────

    #[test]
    fn dispose_releases_each_resource_exactly_once() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        ctl.dispose(&mut backend);

        assert_eq!(ctl.phase(), Phase::Disposed);
        assert_eq!(backend.released_geometries.len(), 1);
        assert_eq!(backend.released_materials.len(), 1);
        assert_eq!(backend.released_contexts, 1);
    }

    #[test]
    fn dispose_is_idempotent() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        ctl.dispose(&mut backend);
        ctl.dispose(&mut backend);

        assert_eq!(backend.released_geometries.len(), 1);
        assert_eq!(backend.released_contexts, 1);
    }

    #[test]
    fn dispose_while_dormant_releases_nothing() {
        let mut backend = FakeBackend::default();
        let mut ctl = BackdropController::<FakeBackend>::new(config(1280.0));

        ctl.dispose(&mut backend);

        assert_eq!(ctl.phase(), Phase::Disposed);
        assert_eq!(backend.released_contexts, 0);
        assert!(backend.released_geometries.is_empty());
    }

    #[test]
    fn dispose_reaches_nested_drawables_and_material_arrays() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        // Attach a grouped drawable carrying a material array, nested one
        // level deep under a second root.
        let mut extra = Drawable::new(
            Geometry::points(vec![[0.0; 3]], vec![[1.0; 3]]),
            Material::points(0.05, 0.6),
        );
        let mut nested = Drawable::new(
            Geometry::points(vec![[1.0; 3]], vec![[1.0; 3]]),
            Material::points(0.05, 0.6),
        );
        nested.materials = Materials::Array(vec![
            Material::points(0.05, 0.6),
            Material::wireframe(ColorRgb::EMBER, 0.4),
        ]);
        extra.add_child(nested);
        ctl.scene.add(extra);

        ctl.dispose(&mut backend);

        // Cloud + extra + nested geometries.
        assert_eq!(backend.released_geometries.len(), 3);
        // Cloud + extra singles, plus both array entries.
        assert_eq!(backend.released_materials.len(), 4);

        let mut ids = backend.released_materials.clone();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4, "a material was released twice");
    }

    #[test]
    fn disposed_controller_ignores_frames() {
        let (mut ctl, mut backend) = active_controller(1280.0);

        ctl.dispose(&mut backend);
        let renders = backend.render_count;
        ctl.on_frame(&mut backend, 5.0);

        assert_eq!(backend.render_count, renders);
    }
}
