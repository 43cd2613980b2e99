//! Rendering backend seam.
//!
//! Controllers never talk to wgpu directly: they drive a `RenderBackend`,
//! which owns one context per surface and exposes exactly the operations the
//! lifecycle needs — create, resize, render, release. The seam exists so the
//! controllers can be unit-tested against a recording fake with no window or
//! GPU present.

use std::fmt;

use crate::scene::{Camera, Geometry, Material, Scene};

/// Options for a new rendering context.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Whether the surface should composite over the content behind it.
    ///
    /// Backdrops sit behind application content, so this defaults to on.
    pub transparent: bool,

    /// Upper bound on the device pixel ratio used for the drawable size.
    ///
    /// High-density displays pay quadratic fill cost for a decorative layer;
    /// the drawable is scaled down once the window scale factor exceeds this.
    pub max_pixel_ratio: f64,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            transparent: true,
            max_pixel_ratio: 2.0,
        }
    }
}

/// Backend construction failure.
///
/// There is no transient class here on purpose: activation either fully
/// succeeds or the controller latches dormant, so every failure is terminal
/// from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// No usable rendering backend (adapter/device acquisition failed or the
    /// platform has none).
    Unavailable(String),
    /// A backend exists but the context could not be created for this target.
    CreateFailed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "rendering backend unavailable: {msg}"),
            BackendError::CreateFailed(msg) => write!(f, "context creation failed: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Contract between lifecycle controllers and a rendering implementation.
///
/// One `Context` per surface; contexts are never shared between controllers.
/// Release calls are idempotence-free by design — the caller (the disposal
/// traversal) guarantees each resource is released exactly once.
pub trait RenderBackend {
    /// Surface handle the backend binds a context to (a window for the wgpu
    /// implementation, `()` for fakes).
    type Target;

    /// Per-surface rendering context (camera target + GPU resources).
    type Context;

    fn create_context(
        &mut self,
        target: &Self::Target,
        options: &ContextOptions,
    ) -> Result<Self::Context, BackendError>;

    /// Resizes the context's output to the new drawable size.
    fn set_size(&mut self, context: &mut Self::Context, width: u32, height: u32);

    /// Renders one frame of `scene` through `camera`.
    fn render(&mut self, context: &mut Self::Context, scene: &Scene, camera: &Camera);

    /// Releases GPU resources held for a geometry.
    fn release_geometry(&mut self, context: &mut Self::Context, geometry: &Geometry);

    /// Releases GPU resources held for a material.
    fn release_material(&mut self, context: &mut Self::Context, material: &Material);

    /// Consumes and releases the whole context.
    fn release_context(&mut self, context: Self::Context);
}
