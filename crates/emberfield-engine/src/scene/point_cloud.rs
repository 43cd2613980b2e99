//! Particle field generation.
//!
//! The point cloud is generated once at activation and never regenerated:
//! its count is decided by the viewport width at construction time, and only
//! the aggregate transform of the whole cloud changes per frame.

use rand::Rng;

use super::color::ColorRgb;
use super::node::{Drawable, Geometry, Material};

/// Viewports narrower than this get the reduced point count.
pub const NARROW_VIEWPORT_MAX: f32 = 768.0;
/// Point count on narrow viewports.
pub const NARROW_COUNT: usize = 300;
/// Point count everywhere else.
pub const WIDE_COUNT: usize = 500;

/// Half extent of the sampling box on x and y.
pub const HALF_EXTENT_XY: f32 = 7.5;
/// Half extent of the sampling box on z.
pub const HALF_EXTENT_Z: f32 = 5.0;

/// Sprite size in world units.
pub const POINT_SIZE: f32 = 0.05;
/// Cloud opacity (rendered with additive blending).
pub const CLOUD_OPACITY: f32 = 0.6;

const ATTENUATION_MIN: f32 = 0.8;
const ATTENUATION_MAX: f32 = 1.0;

/// Number of points for a given viewport width, in logical pixels.
pub fn point_count(viewport_width: f32) -> usize {
    if viewport_width < NARROW_VIEWPORT_MAX {
        NARROW_COUNT
    } else {
        WIDE_COUNT
    }
}

/// Generates the particle field drawable.
///
/// Positions are sampled uniformly inside the bounding box; each point gets
/// one attenuation factor in [0.8, 1.0) applied to all three channels of the
/// base color, so every particle is a dimmer or brighter shade of the same
/// hue.
pub fn generate(viewport_width: f32, base: ColorRgb, rng: &mut impl Rng) -> Drawable {
    let count = point_count(viewport_width);

    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    for _ in 0..count {
        positions.push([
            rng.gen_range(-HALF_EXTENT_XY..HALF_EXTENT_XY),
            rng.gen_range(-HALF_EXTENT_XY..HALF_EXTENT_XY),
            rng.gen_range(-HALF_EXTENT_Z..HALF_EXTENT_Z),
        ]);

        let shade = base.attenuated(rng.gen_range(ATTENUATION_MIN..ATTENUATION_MAX));
        colors.push([shade.r, shade.g, shade.b]);
    }

    Drawable::new(
        Geometry::points(positions, colors),
        Material::points(POINT_SIZE, CLOUD_OPACITY),
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    // ── point count ───────────────────────────────────────────────────────

    #[test]
    fn narrow_viewports_get_reduced_count() {
        assert_eq!(point_count(320.0), NARROW_COUNT);
        assert_eq!(point_count(500.0), NARROW_COUNT);
        assert_eq!(point_count(767.9), NARROW_COUNT);
    }

    #[test]
    fn wide_viewports_get_full_count() {
        assert_eq!(point_count(768.0), WIDE_COUNT);
        assert_eq!(point_count(1024.0), WIDE_COUNT);
        assert_eq!(point_count(1920.0), WIDE_COUNT);
    }

    #[test]
    fn generated_drawable_matches_count() {
        let cloud = generate(500.0, ColorRgb::EMBER, &mut rng());
        assert_eq!(cloud.geometry.vertex_count(), NARROW_COUNT);

        let cloud = generate(1920.0, ColorRgb::EMBER, &mut rng());
        assert_eq!(cloud.geometry.vertex_count(), WIDE_COUNT);
    }

    // ── position sampling ─────────────────────────────────────────────────

    #[test]
    fn positions_stay_inside_bounding_box() {
        let cloud = generate(1920.0, ColorRgb::EMBER, &mut rng());
        for p in &cloud.geometry.positions {
            assert!(p[0] >= -HALF_EXTENT_XY && p[0] < HALF_EXTENT_XY, "x = {}", p[0]);
            assert!(p[1] >= -HALF_EXTENT_XY && p[1] < HALF_EXTENT_XY, "y = {}", p[1]);
            assert!(p[2] >= -HALF_EXTENT_Z && p[2] < HALF_EXTENT_Z, "z = {}", p[2]);
        }
    }

    // ── color attenuation ─────────────────────────────────────────────────

    #[test]
    fn colors_are_attenuated_brand_shades() {
        let base = ColorRgb::from_rgb8(255, 77, 0);
        let cloud = generate(500.0, base, &mut rng());
        let colors = cloud.geometry.colors.as_ref().unwrap();

        assert_eq!(colors.len(), NARROW_COUNT);
        for c in colors {
            assert!(c[0] >= ATTENUATION_MIN * base.r && c[0] <= base.r);
            assert!(c[1] >= ATTENUATION_MIN * base.g && c[1] <= base.g);
            // Base blue channel is zero; attenuation cannot invent color.
            assert_eq!(c[2], 0.0);
        }
    }

    #[test]
    fn attenuation_factor_is_shared_across_channels() {
        let base = ColorRgb::from_rgb8(255, 77, 0);
        let cloud = generate(500.0, base, &mut rng());
        let colors = cloud.geometry.colors.as_ref().unwrap();

        // One factor per point: the r and g ratios must agree.
        for c in colors {
            let fr = c[0] / base.r;
            let fg = c[1] / base.g;
            assert!((fr - fg).abs() < 1e-5, "fr = {fr}, fg = {fg}");
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate(1920.0, ColorRgb::EMBER, &mut rng());
        let b = generate(1920.0, ColorRgb::EMBER, &mut rng());
        assert_eq!(a.geometry.positions, b.geometry.positions);
        assert_eq!(a.geometry.colors, b.geometry.colors);
    }
}
