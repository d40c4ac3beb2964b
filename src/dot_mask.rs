//! Periodic dot-cell mask: centers in parameter space, radius in pixels.
//!
//! This is the CPU reference for the fragment function in
//! `shaders/hologram.wgsl`. Both answer the same question for a 2D
//! coordinate `p`: "am I inside a dot?", where the dots tile `p`-space with
//! a fixed period but their radius is measured in *screen pixels*.
//!
//! The pixel-radius trick is the interesting part. The offset from the
//! enclosing cell's center is known in `p`-space; the local Jacobian (how
//! `p` changes per horizontal/vertical pixel step) is inverted and applied
//! to that offset, converting it into a screen-pixel offset. Comparing its
//! length against the pixel radius makes dots round and constant-size on
//! screen regardless of perspective foreshortening, surface tilt, or
//! non-uniform scale.
//!
//! On the GPU the Jacobian columns come from the `dpdx`/`dpdy` derivative
//! builtins; on the CPU the caller supplies them as a [`ScreenJacobian`].

use glam::Vec2;

/// Determinants below this magnitude are treated as singular.
///
/// A singular Jacobian means the parameter→pixel mapping is degenerate
/// (surface edge-on to the viewer, or derivatives unavailable); the mask is
/// defined as 0 there rather than an error or NaN.
pub const DET_EPSILON: f32 = 1e-10;

/// Local 2×2 Jacobian between parameter space and screen-pixel space.
///
/// `dpdx` and `dpdy` are the columns: the change in the parameter coordinate
/// per one-pixel step right and per one-pixel step down. [`ScreenJacobian::IDENTITY`]
/// describes a surface where parameter space and pixel space coincide 1:1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenJacobian {
    /// ∂p/∂x — parameter change per horizontal pixel.
    pub dpdx: Vec2,
    /// ∂p/∂y — parameter change per vertical pixel.
    pub dpdy: Vec2,
}

impl ScreenJacobian {
    /// Parameter space and pixel space coincide.
    pub const IDENTITY: Self = Self {
        dpdx: Vec2::new(1.0, 0.0),
        dpdy: Vec2::new(0.0, 1.0),
    };

    pub fn new(dpdx: Vec2, dpdy: Vec2) -> Self {
        Self { dpdx, dpdy }
    }

    /// Determinant of the 2×2 matrix `[dpdx dpdy]`.
    pub fn determinant(&self) -> f32 {
        self.dpdx.x * self.dpdy.y - self.dpdx.y * self.dpdy.x
    }

    /// Applies the inverse Jacobian to a parameter-space offset, yielding a
    /// pixel-space offset. Returns `None` when the Jacobian is singular.
    pub fn to_pixels(&self, offset: Vec2) -> Option<Vec2> {
        let det = self.determinant();
        if det.abs() < DET_EPSILON {
            return None;
        }
        // Cofactor solve of [dpdx dpdy] · px = offset.
        Some(Vec2::new(
            (offset.x * self.dpdy.y - offset.y * self.dpdy.x) / det,
            (-offset.x * self.dpdx.y + offset.y * self.dpdx.x) / det,
        ))
    }
}

/// Evaluates the dot mask at parameter coordinate `p`.
///
/// Cells tile `p`-space with the given `period`; each cell carries one dot
/// at its center, and `local` below is the offset from that center
/// (`fract` is the GLSL flavor, `x − floor(x)`, so the tiling is stable for
/// negative coordinates too).
///
/// Returns `1.0` when the pixel-space distance to the dot center is
/// strictly less than `radius_px`, `0.0` otherwise — a hard threshold, with
/// the boundary `distance == radius_px` counting as outside. A consequence:
/// `radius_px = 0.0` yields 0 everywhere, exact centers included.
///
/// The function is total over its domain: a degenerate Jacobian yields
/// `0.0`, never NaN or infinity. `period` must be positive; that is a
/// caller-guaranteed precondition (this runs per fragment on the GPU twin,
/// where runtime validation has no place).
pub fn dot_mask(p: Vec2, period: f32, radius_px: f32, jacobian: ScreenJacobian) -> f32 {
    let q = p / period;
    let local = (q - q.floor() - 0.5) * period;

    match jacobian.to_pixels(local) {
        Some(pixel_offset) => {
            if pixel_offset.length() < radius_px {
                1.0
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: f32 = 2.0;

    // With period 2.0 the dot centers sit at (k + 0.5) * 2.0 on each axis:
    // (1, 1), (1, 3), (3, 1), ...

    #[test]
    fn identity_jacobian_inside_radius() {
        let jac = ScreenJacobian::IDENTITY;
        // Exactly on a center.
        assert_eq!(dot_mask(Vec2::new(1.0, 1.0), PERIOD, 2.0, jac), 1.0);
        // 0.5 away from the center at (1, 1).
        assert_eq!(dot_mask(Vec2::new(1.5, 1.0), PERIOD, 2.0, jac), 1.0);
        // sqrt(2)·0.9 ≈ 1.27 away, still inside radius 2.
        assert_eq!(dot_mask(Vec2::new(1.9, 1.9), PERIOD, 2.0, jac), 1.0);
    }

    #[test]
    fn identity_jacobian_outside_radius() {
        let jac = ScreenJacobian::IDENTITY;
        // 0.8 from the center at (1, 1), radius 0.5.
        assert_eq!(dot_mask(Vec2::new(1.8, 1.0), PERIOD, 0.5, jac), 0.0);
        // Cell corner (0, 0) is sqrt(2) from every surrounding center.
        assert_eq!(dot_mask(Vec2::new(0.0, 0.0), PERIOD, 1.0, jac), 0.0);
    }

    #[test]
    fn boundary_distance_counts_as_outside() {
        let jac = ScreenJacobian::IDENTITY;
        // Distance from (1.5, 1) to the center (1, 1) is exactly 0.5.
        assert_eq!(dot_mask(Vec2::new(1.5, 1.0), PERIOD, 0.5, jac), 0.0);
    }

    #[test]
    fn zero_radius_is_empty_even_at_centers() {
        let jac = ScreenJacobian::IDENTITY;
        for p in [
            Vec2::new(1.0, 1.0), // exact center
            Vec2::new(0.3, -0.7),
            Vec2::new(-5.1, 2.4),
        ] {
            assert_eq!(dot_mask(p, PERIOD, 0.0, jac), 0.0);
        }
    }

    #[test]
    fn tiling_repeats_across_cells_and_negative_coordinates() {
        let jac = ScreenJacobian::IDENTITY;
        let radius = 0.6;
        for offset in [-3.0f32, -1.0, 0.0, 2.0, 5.0] {
            let p = Vec2::new(1.25 + offset * PERIOD, 1.0);
            assert_eq!(dot_mask(p, PERIOD, radius, jac), 1.0, "offset {offset}");
            let p = Vec2::new(1.9 + offset * PERIOD, 1.0);
            assert_eq!(dot_mask(p, PERIOD, radius, jac), 0.0, "offset {offset}");
        }
    }

    #[test]
    fn jacobian_rescales_parameter_distance_to_pixels() {
        // p changes by 0.5 per pixel on both axes, so a 0.25 offset in
        // p-space is half a pixel on screen.
        let jac = ScreenJacobian::new(Vec2::new(0.5, 0.0), Vec2::new(0.0, 0.5));
        let p = Vec2::new(1.25, 1.0); // 0.25 from center in p-space
        assert_eq!(dot_mask(p, PERIOD, 0.6, jac), 1.0);
        assert_eq!(dot_mask(p, PERIOD, 0.4, jac), 0.0);
    }

    #[test]
    fn degenerate_jacobian_yields_zero_not_nan() {
        let cases = [
            // Zero derivatives.
            ScreenJacobian::new(Vec2::ZERO, Vec2::ZERO),
            // Parallel columns.
            ScreenJacobian::new(Vec2::new(1.0, 2.0), Vec2::new(2.0, 4.0)),
            // Determinant below the threshold.
            ScreenJacobian::new(Vec2::new(1e-6, 0.0), Vec2::new(0.0, 1e-6)),
        ];
        for jac in cases {
            let mask = dot_mask(Vec2::new(0.37, 0.81), PERIOD, 2.0, jac);
            assert!(mask.is_finite());
            assert_eq!(mask, 0.0, "jacobian {jac:?}");
        }
    }

    #[test]
    fn rotated_jacobian_keeps_dots_round_in_pixels() {
        // A 90° rotation of pixel axes must not change the pixel distance.
        let jac = ScreenJacobian::new(Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0));
        let px = jac.to_pixels(Vec2::new(0.3, 0.4)).unwrap();
        assert!((px.length() - 0.5).abs() < 1e-6);
    }
}
