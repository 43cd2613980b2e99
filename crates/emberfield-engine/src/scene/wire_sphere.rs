//! Wireframe sphere generation.
//!
//! The emblem is an icosahedron of radius 1, subdivided once and rendered as
//! a line list over its unique edges. Geometry is fixed after generation;
//! only the drawable's rotation changes per frame.

use std::collections::{BTreeSet, HashMap};

use super::color::ColorRgb;
use super::node::{Drawable, Geometry, Material};

/// Sphere radius in world units.
pub const RADIUS: f32 = 1.0;
/// Emblem opacity (alpha blended).
pub const SPHERE_OPACITY: f32 = 0.4;

/// Vertex count after one subdivision of an icosahedron.
pub const VERTEX_COUNT: usize = 42;
/// Unique edge count after one subdivision (80 faces, 3 edges each, shared).
pub const EDGE_COUNT: usize = 120;

/// Generates the wireframe sphere drawable.
pub fn generate(color: ColorRgb) -> Drawable {
    let (positions, edges) = icosphere_wireframe();
    Drawable::new(
        Geometry::lines(positions, edges),
        Material::wireframe(color, SPHERE_OPACITY),
    )
}

/// Builds the subdivided icosahedron vertices and its deduplicated edge list.
fn icosphere_wireframe() -> (Vec<[f32; 3]>, Vec<[u32; 2]>) {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<[f32; 3]> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|p| normalize(*p))
    .collect();

    let faces: [[u32; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    // One subdivision: split each face into four, reusing shared midpoints so
    // vertices stay unique (12 originals + 30 midpoints = 42).
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut subdivided: Vec<[u32; 3]> = Vec::with_capacity(faces.len() * 4);

    for [a, b, c] in faces {
        let ab = midpoint(&mut positions, &mut midpoints, a, b);
        let bc = midpoint(&mut positions, &mut midpoints, b, c);
        let ca = midpoint(&mut positions, &mut midpoints, c, a);

        subdivided.push([a, ab, ca]);
        subdivided.push([b, bc, ab]);
        subdivided.push([c, ca, bc]);
        subdivided.push([ab, bc, ca]);
    }

    // Collect unique edges; BTreeSet keeps the output order deterministic.
    let mut edge_set: BTreeSet<(u32, u32)> = BTreeSet::new();
    for [a, b, c] in &subdivided {
        for (u, v) in [(*a, *b), (*b, *c), (*c, *a)] {
            edge_set.insert((u.min(v), u.max(v)));
        }
    }

    let edges = edge_set.into_iter().map(|(u, v)| [u, v]).collect();
    (positions, edges)
}

fn midpoint(
    positions: &mut Vec<[f32; 3]>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = (a.min(b), a.max(b));
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }

    let pa = positions[a as usize];
    let pb = positions[b as usize];
    let mid = normalize([
        (pa[0] + pb[0]) / 2.0,
        (pa[1] + pb[1]) / 2.0,
        (pa[2] + pb[2]) / 2.0,
    ]);

    let idx = positions.len() as u32;
    positions.push(mid);
    cache.insert(key, idx);
    idx
}

fn normalize(p: [f32; 3]) -> [f32; 3] {
    let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
    [
        p[0] / len * RADIUS,
        p[1] / len * RADIUS,
        p[2] / len * RADIUS,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MaterialKind, Materials, Topology};

    #[test]
    fn subdivided_icosahedron_counts() {
        let (positions, edges) = icosphere_wireframe();
        assert_eq!(positions.len(), VERTEX_COUNT);
        assert_eq!(edges.len(), EDGE_COUNT);
    }

    #[test]
    fn all_vertices_lie_on_the_sphere() {
        let (positions, _) = icosphere_wireframe();
        for p in &positions {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - RADIUS).abs() < 1e-5, "|v| = {len}");
        }
    }

    #[test]
    fn edges_are_unique_and_in_range() {
        let (positions, edges) = icosphere_wireframe();
        let mut seen = std::collections::HashSet::new();
        for [u, v] in &edges {
            assert!(u < v, "edges stored with ascending indices");
            assert!((*v as usize) < positions.len());
            assert!(seen.insert((*u, *v)), "duplicate edge {u}-{v}");
        }
    }

    #[test]
    fn drawable_uses_wireframe_material() {
        let sphere = generate(ColorRgb::EMBER);
        assert_eq!(sphere.geometry.topology, Topology::Lines);
        match &sphere.materials {
            Materials::Single(m) => match &m.kind {
                MaterialKind::Wireframe { color, opacity } => {
                    assert_eq!(*color, ColorRgb::EMBER);
                    assert_eq!(*opacity, SPHERE_OPACITY);
                }
                other => panic!("unexpected material kind: {other:?}"),
            },
            other => panic!("unexpected materials: {other:?}"),
        }
    }
}
