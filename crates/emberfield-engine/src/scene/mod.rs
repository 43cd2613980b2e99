//! Scene data model.
//!
//! Responsibilities:
//! - renderer-agnostic drawable tree (geometry + materials + transform)
//! - camera math
//! - generators for the two backdrop shapes (point cloud, wire sphere)
//!
//! Nothing in this module touches the GPU. Resources carry process-unique ids
//! so backends can key their uploads and release them exactly once.

mod camera;
mod color;
mod node;
mod transform;

pub mod point_cloud;
pub mod wire_sphere;

pub use camera::Camera;
pub use color::ColorRgb;
pub use node::{
    Drawable, Geometry, Material, MaterialKind, Materials, ResourceId, ResourceRef, Scene,
    Topology,
};
pub use transform::Transform;
