//! TRS transform composition and its analytic inverse.
//!
//! This module is the host-side heart of the explainer. A [`TrsTransform`]
//! holds translation, rotation (unit quaternion), and non-uniform scale, and
//! turns them into a 4×4 homogeneous matrix the long way — through the
//! classical quaternion→matrix closed form — so that every intermediate
//! product is available to the teaching HUD via [`RotationTerms`].
//!
//! The inverse is never computed by Gaussian elimination. Because the matrix
//! has the block structure `M = [A t; 0 1]` with `A = R·S`, the inverse is
//! built in closed form:
//!
//! ```text
//! A⁻¹      = S⁻¹ · Rᵀ          (R is orthonormal)
//! M⁻¹      = [A⁻¹  −A⁻¹·t; 0  1]
//! ```
//!
//! Near-zero scale components are clamped to [`MIN_SCALE`] before taking
//! reciprocals, so the inverse is always finite.
//!
//! # Example
//!
//! ```
//! use holodot::{TrsTransform, Vec3};
//!
//! let transform = TrsTransform::new()
//!     .translation(Vec3::new(0.0, 1.2, 0.0))
//!     .rotation_degrees(Vec3::new(0.0, 25.0, 0.0))
//!     .scale(Vec3::new(1.2, 0.8, 1.6));
//!
//! let pair = transform.matrix_pair();
//! let local = Vec3::new(0.3, 0.2, -0.25);
//! let world = pair.to_world(local);
//! let recovered = pair.to_local(world);
//! assert!((recovered - local).length() < 1e-5);
//! ```

use glam::{Mat4, Quat, Vec3, Vec4};

/// Smallest scale magnitude used when taking reciprocals.
///
/// Scale components with `|s| < MIN_SCALE` are replaced by `MIN_SCALE`
/// before inversion, so a degenerate axis flattens geometry on the forward
/// path but never produces a division by zero on the inverse path.
pub const MIN_SCALE: f32 = 1e-6;

/// A translation + rotation + non-uniform scale, composed as `M = T·R·S`.
///
/// The struct is a pure value: matrices are always rebuilt from the current
/// components, never edited in place, so the forward matrix and its inverse
/// are guaranteed to come from the same snapshot.
///
/// `rotation` is assumed to be a unit quaternion. The constructors here only
/// produce unit quaternions; callers supplying their own are responsible for
/// normalization (none is applied).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrsTransform {
    /// World-space translation.
    pub translation: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale factors. Treated as non-zero; see [`MIN_SCALE`].
    pub scale: Vec3,
}

impl Default for TrsTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl TrsTransform {
    /// Creates an identity transform (origin, no rotation, unit scale).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the translation component.
    pub fn translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Sets the rotation from a quaternion.
    ///
    /// The quaternion must already be normalized.
    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the rotation from XYZ-order Euler angles in degrees.
    ///
    /// Degrees are the boundary representation used by the UI sliders;
    /// conversion to radians happens here and nowhere else.
    pub fn rotation_degrees(mut self, degrees: Vec3) -> Self {
        self.rotation = euler_xyz_degrees(degrees);
        self
    }

    /// Sets non-uniform scale factors.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the same scale on all three axes.
    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// The quaternion→matrix intermediates for the current rotation.
    ///
    /// This is the structured result the derivation HUD reads; see
    /// [`RotationTerms`].
    pub fn rotation_terms(&self) -> RotationTerms {
        RotationTerms::new(self.rotation)
    }

    /// Builds the forward matrix `M = T·R·S`.
    ///
    /// The upper-left 3×3 is the rotation matrix with its columns scaled by
    /// the per-axis scale factors; the last column is the translation.
    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation_terms().r;
        let (sx, sy, sz) = (self.scale.x, self.scale.y, self.scale.z);
        let t = self.translation;

        // glam is column-major; r is row-major, so r[row][col].
        Mat4::from_cols(
            Vec4::new(r[0][0] * sx, r[1][0] * sx, r[2][0] * sx, 0.0),
            Vec4::new(r[0][1] * sy, r[1][1] * sy, r[2][1] * sy, 0.0),
            Vec4::new(r[0][2] * sz, r[1][2] * sz, r[2][2] * sz, 0.0),
            Vec4::new(t.x, t.y, t.z, 1.0),
        )
    }

    /// Builds the inverse matrix in closed form, without a general inverse.
    ///
    /// Uses `A⁻¹ = S⁻¹·Rᵀ` for the linear part and `−A⁻¹·t` for the
    /// translation. Scale reciprocals use [`MIN_SCALE`]-clamped components.
    pub fn inverse_matrix(&self) -> Mat4 {
        let r = self.rotation_terms().r;
        let isx = 1.0 / safe_scale(self.scale.x);
        let isy = 1.0 / safe_scale(self.scale.y);
        let isz = 1.0 / safe_scale(self.scale.z);

        // A⁻¹ = S⁻¹ · Rᵀ: transposing R swaps r[row][col] to r[col][row],
        // multiplying by S⁻¹ on the left scales rows.
        let a = [
            [isx * r[0][0], isx * r[1][0], isx * r[2][0]],
            [isy * r[0][1], isy * r[1][1], isy * r[2][1]],
            [isz * r[0][2], isz * r[1][2], isz * r[2][2]],
        ];

        let t = self.translation;
        let itx = -(a[0][0] * t.x + a[0][1] * t.y + a[0][2] * t.z);
        let ity = -(a[1][0] * t.x + a[1][1] * t.y + a[1][2] * t.z);
        let itz = -(a[2][0] * t.x + a[2][1] * t.y + a[2][2] * t.z);

        Mat4::from_cols(
            Vec4::new(a[0][0], a[1][0], a[2][0], 0.0),
            Vec4::new(a[0][1], a[1][1], a[2][1], 0.0),
            Vec4::new(a[0][2], a[1][2], a[2][2], 0.0),
            Vec4::new(itx, ity, itz, 1.0),
        )
    }

    /// Builds the forward matrix and its analytic inverse from one snapshot.
    pub fn matrix_pair(&self) -> MatrixPair {
        MatrixPair {
            forward: self.matrix(),
            inverse: self.inverse_matrix(),
        }
    }
}

/// A forward matrix and its inverse, derived from the same [`TrsTransform`]
/// snapshot.
///
/// Keeping the two together guarantees they never diverge: there is no
/// separate inversion step that could drift from the forward matrix.
#[derive(Clone, Copy, Debug)]
pub struct MatrixPair {
    /// Local→world matrix `M`.
    pub forward: Mat4,
    /// World→local matrix `M⁻¹`, built analytically.
    pub inverse: Mat4,
}

impl MatrixPair {
    /// Maps a local-space point to world space through `M`.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.forward.transform_point3(local)
    }

    /// Maps a world-space point back to local space through `M⁻¹`.
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.inverse.transform_point3(world)
    }
}

/// Intermediate products of the classical quaternion→matrix derivation.
///
/// For a unit quaternion `(x, y, z, w)` the rotation matrix is assembled from
/// doubled components and their pairwise products:
///
/// ```text
/// x2 = 2x   xx = x·x2   wx = w·x2
/// y2 = 2y   xy = x·y2   wy = w·y2
/// z2 = 2z   ...         wz = w·z2
///
/// R = [ 1−(yy+zz)   xy−wz      xz+wy    ]
///     [ xy+wz       1−(xx+zz)  yz−wx    ]
///     [ xz−wy       yz+wx      1−(xx+yy)]
/// ```
///
/// Every field is shown verbatim in the derivation narrative, so the values
/// here are a contract, not an implementation detail.
#[derive(Clone, Copy, Debug)]
pub struct RotationTerms {
    pub x2: f32,
    pub y2: f32,
    pub z2: f32,
    pub xx: f32,
    pub xy: f32,
    pub xz: f32,
    pub yy: f32,
    pub yz: f32,
    pub zz: f32,
    pub wx: f32,
    pub wy: f32,
    pub wz: f32,
    /// Row-major rotation matrix entries: `r[row][col]`.
    pub r: [[f32; 3]; 3],
}

impl RotationTerms {
    /// Expands a unit quaternion into its matrix-derivation products.
    pub fn new(q: Quat) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);

        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        let r = [
            [1.0 - (yy + zz), xy - wz, xz + wy],
            [xy + wz, 1.0 - (xx + zz), yz - wx],
            [xz - wy, yz + wx, 1.0 - (xx + yy)],
        ];

        Self {
            x2,
            y2,
            z2,
            xx,
            xy,
            xz,
            yy,
            yz,
            zz,
            wx,
            wy,
            wz,
            r,
        }
    }
}

/// Converts XYZ-order Euler angles in degrees to a unit quaternion.
///
/// Intrinsic order: rotate about X first, then Y, then Z, matching the
/// `'XYZ'` Euler convention of the common scene-graph libraries.
pub fn euler_xyz_degrees(degrees: Vec3) -> Quat {
    Quat::from_rotation_x(degrees.x.to_radians())
        * Quat::from_rotation_y(degrees.y.to_radians())
        * Quat::from_rotation_z(degrees.z.to_radians())
}

/// Clamps a scale component away from zero, preserving nothing but safety:
/// values with magnitude below [`MIN_SCALE`] become `MIN_SCALE`.
pub(crate) fn safe_scale(s: f32) -> f32 {
    if s.abs() < MIN_SCALE { MIN_SCALE } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_transform() -> TrsTransform {
        TrsTransform::new()
            .translation(Vec3::new(0.0, 1.2, 0.0))
            .rotation_degrees(Vec3::new(0.0, 25.0, 0.0))
            .scale(Vec3::new(1.2, 0.8, 1.6))
    }

    fn max_abs_diff(a: Mat4, b: Mat4) -> f32 {
        let a = a.to_cols_array();
        let b = b.to_cols_array();
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn identity_transform_is_identity_matrix() {
        let pair = TrsTransform::new().matrix_pair();
        assert!(max_abs_diff(pair.forward, Mat4::IDENTITY) < 1e-6);
        assert!(max_abs_diff(pair.inverse, Mat4::IDENTITY) < 1e-6);
    }

    #[test]
    fn hand_built_matrix_matches_glam_compose() {
        let t = demo_transform();
        let reference =
            Mat4::from_scale_rotation_translation(t.scale, t.rotation, t.translation);
        assert!(max_abs_diff(t.matrix(), reference) < 1e-5);
    }

    #[test]
    fn rotation_terms_match_glam_rotation_matrix() {
        let q = euler_xyz_degrees(Vec3::new(30.0, -45.0, 12.5));
        let terms = RotationTerms::new(q);
        let m = glam::Mat3::from_quat(q);
        for row in 0..3 {
            for col in 0..3 {
                let expected = m.col(col)[row];
                assert!(
                    (terms.r[row][col] - expected).abs() < 1e-6,
                    "r[{row}][{col}] = {} vs {expected}",
                    terms.r[row][col]
                );
            }
        }
    }

    #[test]
    fn euler_degrees_rotates_axes() {
        // 90° about Z sends +X to +Y.
        let q = euler_xyz_degrees(Vec3::new(0.0, 0.0, 90.0));
        let v = q * Vec3::X;
        assert!((v - Vec3::Y).length() < 1e-6);

        // 90° about Y sends +Z to +X.
        let q = euler_xyz_degrees(Vec3::new(0.0, 90.0, 0.0));
        let v = q * Vec3::Z;
        assert!((v - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn closed_form_inverse_matches_general_inverse() {
        let t = demo_transform();
        assert!(max_abs_diff(t.inverse_matrix(), t.matrix().inverse()) < 1e-4);
    }

    #[test]
    fn forward_times_inverse_is_identity() {
        let pair = demo_transform().matrix_pair();
        assert!(max_abs_diff(pair.forward * pair.inverse, Mat4::IDENTITY) < 1e-4);
        assert!(max_abs_diff(pair.inverse * pair.forward, Mat4::IDENTITY) < 1e-4);
    }

    #[test]
    fn round_trip_recovers_local_point() {
        let pair = demo_transform().matrix_pair();
        let local = Vec3::new(0.3, 0.2, -0.25);
        let world = pair.to_world(local);
        let recovered = pair.to_local(world);
        assert!(
            (recovered - local).length() < 1e-5,
            "recovered {recovered:?} vs {local:?}"
        );
    }

    #[test]
    fn round_trip_across_parameter_sweep() {
        let translations = [Vec3::ZERO, Vec3::new(3.0, -2.0, 0.5)];
        let rotations = [
            Vec3::ZERO,
            Vec3::new(15.0, -75.0, 120.0),
            Vec3::new(-90.0, 33.0, 7.0),
        ];
        let scales = [Vec3::ONE, Vec3::new(2.5, 0.25, 1.75)];
        let point = Vec3::new(-0.4, 0.9, 0.15);

        for &translation in &translations {
            for &degrees in &rotations {
                for &scale in &scales {
                    let pair = TrsTransform::new()
                        .translation(translation)
                        .rotation_degrees(degrees)
                        .scale(scale)
                        .matrix_pair();
                    let recovered = pair.to_local(pair.to_world(point));
                    assert!(
                        (recovered - point).length() < 1e-4,
                        "t={translation:?} r={degrees:?} s={scale:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_scale_is_clamped_not_propagated() {
        let t = TrsTransform::new().scale(Vec3::new(0.0, 1.0, 1.0));
        let inverse = t.inverse_matrix();
        assert!(inverse.is_finite());
        // The clamped axis inverts as 1 / MIN_SCALE.
        assert!((inverse.col(0).x - 1.0 / MIN_SCALE).abs() < 1.0);
    }

    #[test]
    fn tiny_negative_scale_clamps_to_positive_epsilon() {
        assert_eq!(safe_scale(-1e-9), MIN_SCALE);
        assert_eq!(safe_scale(-0.5), -0.5);
        assert_eq!(safe_scale(2.0), 2.0);
    }
}
