//! Triplanar projection of the dot field, blended by surface normal.
//!
//! A single planar projection stretches and smears dots wherever the surface
//! turns edge-on to the projection plane. Evaluating the mask on all three
//! axis-aligned projections of the world position and blending by how much
//! the surface faces each axis keeps the pattern visually stable across a
//! box's faces (or any multi-faceted surface).
//!
//! The pairing is orthogonal: the YZ-plane mask is weighted by the normal's
//! X component, XZ by Y, and XY by Z — each plane dominates when the surface
//! faces along the axis it is perpendicular to.
//!
//! Like [`dot_mask`](crate::dot_mask::dot_mask), this is the CPU reference
//! of the fragment function in `shaders/hologram.wgsl`.

use glam::{Vec2, Vec3};

use crate::dot_mask::{ScreenJacobian, dot_mask};

/// Cell period of the tiled dot field, in spacing-normalized units.
pub const TRIPLANAR_PERIOD: f32 = 2.0;

/// Floor applied to each plane weight before renormalization, so no plane's
/// contribution is ever exactly undefined.
pub const WEIGHT_FLOOR: f32 = 1e-4;

/// Per-pixel screen derivatives of the interpolated world position.
///
/// On the GPU these are `dpdx(world_pos)` / `dpdy(world_pos)`; a CPU caller
/// (or test) supplies whatever local linearization it has.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceDerivatives {
    /// ∂world/∂x — world-position change per horizontal pixel.
    pub dwdx: Vec3,
    /// ∂world/∂y — world-position change per vertical pixel.
    pub dwdy: Vec3,
}

impl SurfaceDerivatives {
    pub fn new(dwdx: Vec3, dwdy: Vec3) -> Self {
        Self { dwdx, dwdy }
    }
}

/// Blend weights for the three projection planes, derived from a normal.
///
/// Returns the component-wise absolute value of the normalized normal, each
/// component floored at [`WEIGHT_FLOOR`], renormalized so the three weights
/// sum to 1. Total over all inputs: a zero normal degrades to equal thirds.
pub fn plane_weights(normal: Vec3) -> Vec3 {
    let w = normal
        .normalize_or_zero()
        .abs()
        .max(Vec3::splat(WEIGHT_FLOOR));
    w / (w.x + w.y + w.z)
}

/// Evaluates the triplanar dot coverage at a world position.
///
/// Builds the XY, XZ, and YZ projections of `world_pos / spacing`, evaluates
/// the dot mask on each with [`TRIPLANAR_PERIOD`] and the matching projected
/// Jacobian, and blends the three masks by [`plane_weights`].
///
/// The result is unscaled coverage in `[0, 1]`. Presentation layers may
/// brighten it (see the `gain` hologram parameter) but that is a styling
/// choice layered on top, not part of this value.
pub fn triplanar_mask(
    world_pos: Vec3,
    normal: Vec3,
    spacing: f32,
    radius_px: f32,
    derivs: SurfaceDerivatives,
) -> f32 {
    let inv_spacing = 1.0 / spacing.max(1e-6);

    let project = |pick: fn(Vec3) -> Vec2| -> f32 {
        let p = pick(world_pos) * inv_spacing;
        let jac = ScreenJacobian::new(
            pick(derivs.dwdx) * inv_spacing,
            pick(derivs.dwdy) * inv_spacing,
        );
        dot_mask(p, TRIPLANAR_PERIOD, radius_px, jac)
    };

    let m_xy = project(|v| Vec2::new(v.x, v.y));
    let m_xz = project(|v| Vec2::new(v.x, v.z));
    let m_yz = project(|v| Vec2::new(v.y, v.z));

    let w = plane_weights(normal);
    m_yz * w.x + m_xz * w.y + m_xy * w.z
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACING: f32 = 0.05;
    const RADIUS_PX: f32 = 2.0;

    // Screen derivatives for a surface mapped 1:1-ish to pixels after the
    // spacing division: world moves by `spacing` per pixel.
    fn unit_derivs() -> SurfaceDerivatives {
        SurfaceDerivatives::new(
            Vec3::new(SPACING, 0.0, 0.0),
            Vec3::new(0.0, SPACING, 0.0),
        )
    }

    #[test]
    fn weights_are_nonnegative_and_sum_to_one() {
        let normals = [
            Vec3::X,
            Vec3::NEG_Y,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-0.2, 0.7, 0.4),
            Vec3::new(1000.0, 0.001, -3.0),
            Vec3::ZERO,
        ];
        for n in normals {
            let w = plane_weights(n);
            assert!(w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0, "normal {n:?}");
            assert!(
                ((w.x + w.y + w.z) - 1.0).abs() < 1e-6,
                "normal {n:?} → weights {w:?}"
            );
        }
    }

    #[test]
    fn zero_normal_degrades_to_equal_thirds() {
        let w = plane_weights(Vec3::ZERO);
        assert!((w.x - 1.0 / 3.0).abs() < 1e-6);
        assert!((w.y - 1.0 / 3.0).abs() < 1e-6);
        assert!((w.z - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn axis_normal_selects_single_plane() {
        let w = plane_weights(Vec3::X);
        assert!(w.x > 0.999);
        assert!(w.y < 1e-3 && w.z < 1e-3);
    }

    #[test]
    fn x_normal_coverage_equals_yz_mask() {
        // Derivatives that make the YZ projection well-conditioned and the
        // others degenerate, so only the YZ mask can contribute anyway.
        let derivs = SurfaceDerivatives::new(
            Vec3::new(0.0, SPACING, 0.0),
            Vec3::new(0.0, 0.0, SPACING),
        );
        // (y, z)/spacing = (1, 1): exactly a cell center, mask 1.
        let on_center = Vec3::new(0.123, SPACING, SPACING);
        let coverage = triplanar_mask(on_center, Vec3::X, SPACING, RADIUS_PX, derivs);
        assert!((coverage - 1.0).abs() < 5e-4, "coverage {coverage}");

        // (y, z)/spacing = (0, 0): a cell corner, sqrt(2) pixels from every
        // center under these derivatives.
        let on_corner = Vec3::new(0.123, 0.0, 0.0);
        let coverage = triplanar_mask(on_corner, Vec3::X, SPACING, 1.0, derivs);
        assert!(coverage < 5e-4, "coverage {coverage}");
    }

    #[test]
    fn coverage_stays_in_unit_range() {
        let derivs = unit_derivs();
        let normal = Vec3::new(0.3, -0.8, 0.52);
        for i in 0..24 {
            for j in 0..24 {
                let world = Vec3::new(i as f32 * 0.013, j as f32 * 0.017, 0.031);
                let c = triplanar_mask(world, normal, SPACING, RADIUS_PX, derivs);
                assert!((0.0..=1.0).contains(&c), "coverage {c} at {world:?}");
            }
        }
    }

    #[test]
    fn degenerate_derivatives_yield_zero_coverage() {
        let derivs = SurfaceDerivatives::new(Vec3::ZERO, Vec3::ZERO);
        let c = triplanar_mask(
            Vec3::new(0.4, 0.2, 0.9),
            Vec3::new(0.5, 0.5, 0.7),
            SPACING,
            RADIUS_PX,
            derivs,
        );
        assert!(c.is_finite());
        assert_eq!(c, 0.0);
    }

    #[test]
    fn z_normal_hits_dot_at_xy_cell_center() {
        // world.xy / spacing = (1, 1) is a cell center of the XY projection.
        let world = Vec3::new(SPACING, SPACING, 0.77);
        let c = triplanar_mask(world, Vec3::Z, SPACING, RADIUS_PX, unit_derivs());
        assert!(c > 0.999, "coverage {c}");
    }
}
