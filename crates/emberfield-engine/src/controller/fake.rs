//! Recording backend for controller tests.

use crate::backend::{BackendError, ContextOptions, RenderBackend};
use crate::scene::{Camera, Geometry, Material, ResourceId, Scene};

/// In-memory `RenderBackend` that records every call.
///
/// Contexts are plain counters, so tests can assert how many were created
/// and released without any window or GPU present.
#[derive(Debug, Default)]
pub struct FakeBackend {
    /// When set, `create_context` fails with `BackendError::Unavailable`.
    pub unavailable: bool,

    pub contexts_created: u32,
    pub released_contexts: u32,
    pub set_size_calls: Vec<(u32, u32)>,
    pub render_count: u32,
    pub released_geometries: Vec<ResourceId>,
    pub released_materials: Vec<ResourceId>,
}

impl RenderBackend for FakeBackend {
    type Target = ();
    type Context = u32;

    fn create_context(
        &mut self,
        _target: &Self::Target,
        _options: &ContextOptions,
    ) -> Result<Self::Context, BackendError> {
        if self.unavailable {
            return Err(BackendError::Unavailable("no adapter".into()));
        }
        self.contexts_created += 1;
        Ok(self.contexts_created)
    }

    fn set_size(&mut self, _context: &mut Self::Context, width: u32, height: u32) {
        self.set_size_calls.push((width, height));
    }

    fn render(&mut self, _context: &mut Self::Context, _scene: &Scene, _camera: &Camera) {
        self.render_count += 1;
    }

    fn release_geometry(&mut self, _context: &mut Self::Context, geometry: &Geometry) {
        self.released_geometries.push(geometry.id);
    }

    fn release_material(&mut self, _context: &mut Self::Context, material: &Material) {
        self.released_materials.push(material.id);
    }

    fn release_context(&mut self, _context: Self::Context) {
        self.released_contexts += 1;
    }
}
