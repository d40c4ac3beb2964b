//! Text rendering of the matrix derivations for the teaching HUD.
//!
//! The explainer does not just show the composed matrices; it walks through
//! every intermediate scalar product used to build them. The functions here
//! format those walkthroughs as plain multi-line strings from the structured
//! intermediates exposed by [`RotationTerms`](crate::transform::RotationTerms)
//! — nothing is recomputed ad hoc in the presentation layer.
//!
//! Formatting contract: numbers print with three decimals, non-negative
//! values padded with a leading space so columns line up in a monospace HUD.

use glam::{Mat4, Vec3};

use crate::transform::{TrsTransform, safe_scale};

/// Formats a number with 3 decimals and a leading space when non-negative.
///
/// `-0.0` prints as ` 0.000`.
pub fn fmt_num(n: f32) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    if n >= 0.0 {
        format!(" {n:.3}")
    } else {
        format!("{n:.3}")
    }
}

/// Formats a vector as `(x.xxx, y.yyy, z.zzz)`.
pub fn fmt_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Row-major view of a column-major matrix, for display and row dot products.
pub fn mat4_rows(m: &Mat4) -> [[f32; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (col_index, col) in [m.x_axis, m.y_axis, m.z_axis, m.w_axis].iter().enumerate() {
        let col = col.to_array();
        for row_index in 0..4 {
            rows[row_index][col_index] = col[row_index];
        }
    }
    rows
}

/// Formats a matrix as four bracketed row lines.
pub fn fmt_mat4(m: &Mat4) -> String {
    mat4_rows(m)
        .iter()
        .map(|r| {
            format!(
                "[ {} {} {} {} ]",
                fmt_num(r[0]),
                fmt_num(r[1]),
                fmt_num(r[2]),
                fmt_num(r[3])
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Expands the application of `m` to the homogeneous point `(p, 1)` as one
/// dot-product line per output row.
///
/// `labels` names the four output components, e.g.
/// `["x_world", "y_world", "z_world", "w'"]`.
pub fn describe_point_application(m: &Mat4, p: Vec3, labels: [&str; 4]) -> String {
    let rows = mat4_rows(m);
    let (x, y, z, w) = (p.x, p.y, p.z, 1.0);

    let mut lines = vec![
        format!(
            "p_h = ({}, {}, {}, {})",
            fmt_num(x),
            fmt_num(y),
            fmt_num(z),
            fmt_num(w)
        ),
        String::new(),
    ];

    for (row, label) in rows.iter().zip(labels) {
        let out = row[0] * x + row[1] * y + row[2] * z + row[3] * w;
        lines.push(format!(
            "{label} = {}*{} + {}*{} + {}*{} + {}*{} = {}",
            fmt_num(row[0]),
            fmt_num(x),
            fmt_num(row[1]),
            fmt_num(y),
            fmt_num(row[2]),
            fmt_num(z),
            fmt_num(row[3]),
            fmt_num(w),
            fmt_num(out)
        ));
    }

    lines.join("\n")
}

/// Walks through building `M = T·R·S`: quaternion products, expanded
/// rotation entries, column scaling, translation insertion, and the final
/// composed matrix.
///
/// `degrees` is the Euler-angle triple the rotation came from, shown among
/// the inputs; the math itself reads only the transform's quaternion.
pub fn describe_matrix_build(transform: &TrsTransform, degrees: Vec3) -> String {
    let q = transform.rotation;
    let terms = transform.rotation_terms();
    let r = terms.r;
    let s = transform.scale;
    let t = transform.translation;
    let radians = Vec3::new(
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    );

    let mul = |a: f32, b: f32| format!("{} * {} = {}", fmt_num(a), fmt_num(b), fmt_num(a * b));

    let expanded = |name: &str, expr: &str, value: f32| {
        format!("{name} = {expr} = {}", fmt_num(value))
    };

    let row_nums =
        |a: f32, b: f32, c: f32| format!("[ {} {} {} ]", fmt_num(a), fmt_num(b), fmt_num(c));

    let mut lines: Vec<String> = Vec::new();
    lines.push("// Inputs".into());
    lines.push(format!("t = {}", fmt_vec3(t)));
    lines.push(format!(
        "r_deg = ({:.1}°, {:.1}°, {:.1}°)",
        degrees.x, degrees.y, degrees.z
    ));
    lines.push(format!("euler(rad) = {}", fmt_vec3(radians)));
    lines.push(format!(
        "quat = ({}, {}, {}, {})",
        fmt_num(q.x),
        fmt_num(q.y),
        fmt_num(q.z),
        fmt_num(q.w)
    ));
    lines.push(format!("s = {}", fmt_vec3(s)));
    lines.push(String::new());

    lines.push(format!("x2 = x * 2 = {} * 2 = {}", fmt_num(q.x), fmt_num(terms.x2)));
    lines.push(format!("y2 = y * 2 = {} * 2 = {}", fmt_num(q.y), fmt_num(terms.y2)));
    lines.push(format!("z2 = z * 2 = {} * 2 = {}", fmt_num(q.z), fmt_num(terms.z2)));
    lines.push(String::new());

    lines.push(format!("xx = x * x2 = {}", mul(q.x, terms.x2)));
    lines.push(format!("xy = x * y2 = {}", mul(q.x, terms.y2)));
    lines.push(format!("xz = x * z2 = {}", mul(q.x, terms.z2)));
    lines.push(format!("yy = y * y2 = {}", mul(q.y, terms.y2)));
    lines.push(format!("yz = y * z2 = {}", mul(q.y, terms.z2)));
    lines.push(format!("zz = z * z2 = {}", mul(q.z, terms.z2)));
    lines.push(format!("wx = w * x2 = {}", mul(q.w, terms.x2)));
    lines.push(format!("wy = w * y2 = {}", mul(q.w, terms.y2)));
    lines.push(format!("wz = w * z2 = {}", mul(q.w, terms.z2)));
    lines.push(String::new());

    lines.push("// Step 1: Rotation matrix R (entries expanded)".into());
    lines.push("R =".into());
    lines.push(format!(
        "[ {} | {} | {} ]",
        expanded("r00", "1 - (yy + zz)", r[0][0]),
        expanded("r01", "xy - wz", r[0][1]),
        expanded("r02", "xz + wy", r[0][2]),
    ));
    lines.push(format!(
        "[ {} | {} | {} ]",
        expanded("r10", "xy + wz", r[1][0]),
        expanded("r11", "1 - (xx + zz)", r[1][1]),
        expanded("r12", "yz - wx", r[1][2]),
    ));
    lines.push(format!(
        "[ {} | {} | {} ]",
        expanded("r20", "xz - wy", r[2][0]),
        expanded("r21", "yz + wx", r[2][1]),
        expanded("r22", "1 - (xx + yy)", r[2][2]),
    ));
    lines.push(String::new());
    lines.push("// R (numbers)".into());
    lines.push(row_nums(r[0][0], r[0][1], r[0][2]));
    lines.push(row_nums(r[1][0], r[1][1], r[1][2]));
    lines.push(row_nums(r[2][0], r[2][1], r[2][2]));
    lines.push(String::new());

    lines.push("// Step 2: Apply scale (column-wise)".into());
    for row in 0..3 {
        lines.push(format!("RS[{row},0] = r{row}0 * sx → {}", mul(r[row][0], s.x)));
        lines.push(format!("RS[{row},1] = r{row}1 * sy → {}", mul(r[row][1], s.y)));
        lines.push(format!("RS[{row},2] = r{row}2 * sz → {}", mul(r[row][2], s.z)));
    }
    lines.push(String::new());

    lines.push("// Step 3: Insert translation".into());
    lines.push("M =".into());
    lines.push(format!(
        "[ {} {} {} {} ]",
        fmt_num(r[0][0] * s.x),
        fmt_num(r[0][1] * s.y),
        fmt_num(r[0][2] * s.z),
        fmt_num(t.x)
    ));
    lines.push(format!(
        "[ {} {} {} {} ]",
        fmt_num(r[1][0] * s.x),
        fmt_num(r[1][1] * s.y),
        fmt_num(r[1][2] * s.z),
        fmt_num(t.y)
    ));
    lines.push(format!(
        "[ {} {} {} {} ]",
        fmt_num(r[2][0] * s.x),
        fmt_num(r[2][1] * s.y),
        fmt_num(r[2][2] * s.z),
        fmt_num(t.z)
    ));
    lines.push("[  0.000  0.000  0.000  1.000 ]".into());
    lines.push(String::new());

    lines.push("// Composed matrix (actual)".into());
    lines.push(fmt_mat4(&transform.matrix()));

    lines.join("\n")
}

/// Walks through the analytic inverse: `S⁻¹·Rᵀ` entry by entry, the inverse
/// translation accumulation, and the assembled `M⁻¹`.
pub fn describe_inverse_build(transform: &TrsTransform) -> String {
    let r = transform.rotation_terms().r;
    let s = transform.scale;
    let t = transform.translation;

    let isx = 1.0 / safe_scale(s.x);
    let isy = 1.0 / safe_scale(s.y);
    let isz = 1.0 / safe_scale(s.z);

    // A⁻¹ = S⁻¹ · Rᵀ (row-major entries).
    let a = [
        [isx * r[0][0], isx * r[1][0], isx * r[2][0]],
        [isy * r[0][1], isy * r[1][1], isy * r[2][1]],
        [isz * r[0][2], isz * r[1][2], isz * r[2][2]],
    ];

    let itx = -(a[0][0] * t.x + a[0][1] * t.y + a[0][2] * t.z);
    let ity = -(a[1][0] * t.x + a[1][1] * t.y + a[1][2] * t.z);
    let itz = -(a[2][0] * t.x + a[2][1] * t.y + a[2][2] * t.z);

    let mul = |a: f32, b: f32| format!("{} * {} = {}", fmt_num(a), fmt_num(b), fmt_num(a * b));

    let mut lines: Vec<String> = Vec::new();
    lines.push("// Analytic inverse for TRS".into());
    lines.push("// If M = [ A  t ; 0  1 ]".into());
    lines.push("// then M⁻¹ = [ A⁻¹  -A⁻¹·t ; 0  1 ]".into());
    lines.push(String::new());
    lines.push("// A = R * S, so A⁻¹ = S⁻¹ * Rᵀ".into());
    lines.push(format!(
        "S⁻¹ = diag({}, {}, {})",
        fmt_num(isx),
        fmt_num(isy),
        fmt_num(isz)
    ));
    lines.push(String::new());

    let inv_names = ["(1/sx)", "(1/sy)", "(1/sz)"];
    let inv_values = [isx, isy, isz];
    for row in 0..3 {
        for col in 0..3 {
            // Rᵀ entry at (row, col) is r[col][row].
            lines.push(format!(
                "a{row}{col} = {}*r{col}{row} → {}",
                inv_names[row],
                mul(inv_values[row], r[col][row])
            ));
        }
    }
    lines.push(String::new());

    lines.push("// inverse translation = -A⁻¹ * t".into());
    lines.push(format!(
        "inv_tx = -(a00*tx + a01*ty + a02*tz) = {}",
        fmt_num(itx)
    ));
    lines.push(format!(
        "inv_ty = -(a10*tx + a11*ty + a12*tz) = {}",
        fmt_num(ity)
    ));
    lines.push(format!(
        "inv_tz = -(a20*tx + a21*ty + a22*tz) = {}",
        fmt_num(itz)
    ));
    lines.push(String::new());

    lines.push("M⁻¹ =".into());
    lines.push(fmt_mat4(&transform.inverse_matrix()));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn fmt_num_pads_non_negative_values() {
        assert_eq!(fmt_num(1.0), " 1.000");
        assert_eq!(fmt_num(-1.0), "-1.000");
        assert_eq!(fmt_num(0.1234), " 0.123");
        assert_eq!(fmt_num(-0.0), " 0.000");
    }

    #[test]
    fn fmt_vec3_three_decimals() {
        assert_eq!(fmt_vec3(Vec3::new(0.3, 0.2, -0.25)), "(0.300, 0.200, -0.250)");
    }

    #[test]
    fn fmt_mat4_identity_rows() {
        let text = fmt_mat4(&Mat4::IDENTITY);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "[  1.000  0.000  0.000  0.000 ]");
        assert_eq!(lines[3], "[  0.000  0.000  0.000  1.000 ]");
    }

    #[test]
    fn mat4_rows_transposes_column_major_storage() {
        let m = Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0));
        let rows = mat4_rows(&m);
        // Translation lives in the last column of each of the first 3 rows.
        assert_eq!(rows[0][3], 4.0);
        assert_eq!(rows[1][3], 5.0);
        assert_eq!(rows[2][3], 6.0);
        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn point_application_shows_per_row_dot_products() {
        let m = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let text = describe_point_application(
            &m,
            Vec3::new(0.3, 0.2, -0.25),
            ["x_world", "y_world", "z_world", "w'"],
        );
        assert!(text.starts_with("p_h = ( 0.300,  0.200, -0.250,  1.000)"));
        // Row 0: 1*0.3 + 0*0.2 + 0*(-0.25) + 1*1 = 1.3
        assert!(text.contains("x_world ="));
        assert!(text.contains("=  1.300"));
        assert!(text.contains("w' ="));
    }

    #[test]
    fn matrix_build_narrative_walks_the_derivation() {
        let transform = TrsTransform::new()
            .translation(Vec3::new(0.0, 1.2, 0.0))
            .rotation_degrees(Vec3::new(0.0, 25.0, 0.0))
            .scale(Vec3::new(1.2, 0.8, 1.6));
        let text = describe_matrix_build(&transform, Vec3::new(0.0, 25.0, 0.0));

        assert!(text.contains("r_deg = (0.0°, 25.0°, 0.0°)"));
        assert!(text.contains("x2 = x * 2 ="));
        assert!(text.contains("r11 = 1 - (xx + zz)"));
        assert!(text.contains("RS[0,0] = r00 * sx"));
        assert!(text.contains("// Step 3: Insert translation"));
        // Final row of the homogeneous matrix is constant.
        assert!(text.contains("[  0.000  0.000  0.000  1.000 ]"));
        // Translation y lands in the second displayed row.
        assert!(text.contains(" 1.200"));
    }

    #[test]
    fn inverse_narrative_for_pure_translation() {
        let transform = TrsTransform::new().translation(Vec3::new(1.0, 2.0, 3.0));
        let text = describe_inverse_build(&transform);

        assert!(text.contains("S⁻¹ = diag( 1.000,  1.000,  1.000)"));
        assert!(text.contains("inv_tx = -(a00*tx + a01*ty + a02*tz) = -1.000"));
        assert!(text.contains("inv_ty = -(a10*tx + a11*ty + a12*tz) = -2.000"));
        assert!(text.contains("inv_tz = -(a20*tx + a21*ty + a22*tz) = -3.000"));
    }

    #[test]
    fn inverse_narrative_transposes_rotation_entries() {
        let transform = TrsTransform::new().rotation(Quat::from_rotation_z(0.7));
        let text = describe_inverse_build(&transform);
        // a01 reads r10, not r01.
        assert!(text.contains("a01 = (1/sx)*r10"));
        assert!(text.contains("a10 = (1/sy)*r01"));
    }
}
