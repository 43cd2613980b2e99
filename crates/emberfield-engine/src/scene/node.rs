use std::sync::atomic::{AtomicU64, Ordering};

use super::color::ColorRgb;
use super::transform::Transform;

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique id for a geometry or material.
///
/// Backends key GPU uploads by id; disposal releases each id exactly once.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Primitive topology of a geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    /// Unconnected points (rendered as camera-facing sprites).
    Points,
    /// Line list indexed by `Geometry::edges` pairs.
    Lines,
}

/// Immutable vertex data.
///
/// Positions (and per-vertex colors, when present) are fixed at generation
/// time; animation only touches the owning drawable's transform.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub id: ResourceId,
    pub topology: Topology,
    pub positions: Vec<[f32; 3]>,
    pub colors: Option<Vec<[f32; 3]>>,
    /// Vertex index pairs for `Topology::Lines`.
    pub edges: Option<Vec<[u32; 2]>>,
}

impl Geometry {
    pub fn points(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        Self {
            id: ResourceId::next(),
            topology: Topology::Points,
            positions,
            colors: Some(colors),
            edges: None,
        }
    }

    pub fn lines(positions: Vec<[f32; 3]>, edges: Vec<[u32; 2]>) -> Self {
        Self {
            id: ResourceId::next(),
            topology: Topology::Lines,
            positions,
            colors: None,
            edges: Some(edges),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Appearance parameters for a drawable.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialKind {
    /// Soft round sprites with per-vertex colors and additive blending.
    Points { size: f32, opacity: f32 },
    /// Constant-color wireframe lines with alpha blending.
    Wireframe { color: ColorRgb, opacity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: ResourceId,
    pub kind: MaterialKind,
}

impl Material {
    pub fn points(size: f32, opacity: f32) -> Self {
        Self {
            id: ResourceId::next(),
            kind: MaterialKind::Points { size, opacity },
        }
    }

    pub fn wireframe(color: ColorRgb, opacity: f32) -> Self {
        Self {
            id: ResourceId::next(),
            kind: MaterialKind::Wireframe { color, opacity },
        }
    }
}

/// One material or several (multi-material drawables).
#[derive(Debug, Clone, PartialEq)]
pub enum Materials {
    Single(Material),
    Array(Vec<Material>),
}

impl Materials {
    /// Returns the material used for rendering (first of an array).
    pub fn primary(&self) -> Option<&Material> {
        match self {
            Materials::Single(m) => Some(m),
            Materials::Array(ms) => ms.first(),
        }
    }
}

/// A drawable node: geometry + materials + transform, with optional children
/// for grouped drawables.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub geometry: Geometry,
    pub materials: Materials,
    pub transform: Transform,
    pub children: Vec<Drawable>,
}

impl Drawable {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            materials: Materials::Single(material),
            transform: Transform::default(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: Drawable) {
        self.children.push(child);
    }
}

/// Reference to a releasable resource encountered during traversal.
#[derive(Debug)]
pub enum ResourceRef<'a> {
    Geometry(&'a Geometry),
    Material(&'a Material),
}

/// The drawable set owned by one scene context.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    pub roots: Vec<Drawable>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, drawable: Drawable) {
        self.roots.push(drawable);
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Visits every geometry and material in the scene exactly once.
    ///
    /// Pre-order over the drawable tree; material arrays are expanded
    /// entry by entry. This is the traversal disposal relies on, so it must
    /// reach nested children and every array element.
    pub fn visit_resources(&self, f: &mut impl FnMut(ResourceRef<'_>)) {
        for root in &self.roots {
            visit_drawable(root, f);
        }
    }
}

fn visit_drawable(drawable: &Drawable, f: &mut impl FnMut(ResourceRef<'_>)) {
    f(ResourceRef::Geometry(&drawable.geometry));

    match &drawable.materials {
        Materials::Single(m) => f(ResourceRef::Material(m)),
        Materials::Array(ms) => {
            for m in ms {
                f(ResourceRef::Material(m));
            }
        }
    }

    for child in &drawable.children {
        visit_drawable(child, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_drawable() -> Drawable {
        Drawable::new(
            Geometry::points(vec![[0.0; 3]], vec![[1.0; 3]]),
            Material::points(0.05, 0.6),
        )
    }

    #[test]
    fn resource_ids_are_unique() {
        let a = Geometry::points(vec![], vec![]);
        let b = Geometry::points(vec![], vec![]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn visits_single_drawable_resources_once() {
        let mut scene = Scene::new();
        scene.add(point_drawable());

        let mut geometries = 0;
        let mut materials = 0;
        scene.visit_resources(&mut |res| match res {
            ResourceRef::Geometry(_) => geometries += 1,
            ResourceRef::Material(_) => materials += 1,
        });

        assert_eq!(geometries, 1);
        assert_eq!(materials, 1);
    }

    #[test]
    fn visits_material_arrays_entry_by_entry() {
        let mut drawable = point_drawable();
        drawable.materials = Materials::Array(vec![
            Material::points(0.05, 0.6),
            Material::wireframe(ColorRgb::EMBER, 0.4),
        ]);

        let mut scene = Scene::new();
        scene.add(drawable);

        let mut material_ids = Vec::new();
        scene.visit_resources(&mut |res| {
            if let ResourceRef::Material(m) = res {
                material_ids.push(m.id);
            }
        });

        assert_eq!(material_ids.len(), 2);
        assert_ne!(material_ids[0], material_ids[1]);
    }

    #[test]
    fn visits_nested_children() {
        let mut parent = point_drawable();
        let mut child = point_drawable();
        child.add_child(point_drawable());
        parent.add_child(child);

        let mut scene = Scene::new();
        scene.add(parent);

        let mut seen = Vec::new();
        scene.visit_resources(&mut |res| {
            if let ResourceRef::Geometry(g) = res {
                seen.push(g.id);
            }
        });

        // Three drawables deep, no duplicates.
        assert_eq!(seen.len(), 3);
        let mut deduped = seen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 3);
    }
}
