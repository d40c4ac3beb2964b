//! Step state for the walkthrough: which computation is active and what the
//! HUD explains.
//!
//! The viewer owns a [`Step`] value and passes it (plus a [`StepSnapshot`] of
//! the current parameters) into the pure functions here; there is no ambient
//! "current step" state anywhere in the math core.

use glam::Vec3;

use crate::narrative::{
    describe_inverse_build, describe_matrix_build, describe_point_application, fmt_mat4, fmt_vec3,
};
use crate::transform::{MatrixPair, TrsTransform};

/// The five stages of the walkthrough, in presentation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A point in mesh-local space, before any transform.
    LocalPoint,
    /// Composing `M = T·R·S` and mapping the point to world space.
    WorldMapping,
    /// Deriving `M⁻¹` analytically and recovering the local point.
    InverseRecovery,
    /// The single-plane dot mask: cell tiling + pixel-round conversion.
    SinglePlaneMask,
    /// Triplanar projection blended by surface normal.
    TriplanarField,
}

/// Which hologram shading mode a step activates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HologramMode {
    /// Dot mask on the world XY plane only.
    SinglePlane,
    /// All three projections blended by normal weight.
    Triplanar,
}

/// What a step shows: marker visibility and hologram mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepView {
    /// White marker at the local-space point.
    pub show_local_marker: bool,
    /// Yellow marker at the forward-mapped world point.
    pub show_world_marker: bool,
    /// Mint marker at the inverse-recovered local point.
    pub show_recovered_marker: bool,
    /// Hologram dot-field material on the box, if any.
    pub hologram: Option<HologramMode>,
}

impl Step {
    /// All steps, in order.
    pub const ALL: [Step; 5] = [
        Step::LocalPoint,
        Step::WorldMapping,
        Step::InverseRecovery,
        Step::SinglePlaneMask,
        Step::TriplanarField,
    ];

    /// 1-based step number for display.
    pub fn number(self) -> usize {
        match self {
            Step::LocalPoint => 1,
            Step::WorldMapping => 2,
            Step::InverseRecovery => 3,
            Step::SinglePlaneMask => 4,
            Step::TriplanarField => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::LocalPoint => "Step 1 — A point in local space",
            Step::WorldMapping => "Step 2 — Compose M = T·R·S and map local → world",
            Step::InverseRecovery => "Step 3 — Analytic inverse and world → local recovery",
            Step::SinglePlaneMask => "Step 4 — One dot cell: centers in p-space, radius in pixels",
            Step::TriplanarField => "Step 5 — Triplanar world dots blended by surface normal",
        }
    }

    /// The following step, saturating at the last.
    pub fn next(self) -> Step {
        match self {
            Step::LocalPoint => Step::WorldMapping,
            Step::WorldMapping => Step::InverseRecovery,
            Step::InverseRecovery => Step::SinglePlaneMask,
            Step::SinglePlaneMask => Step::TriplanarField,
            Step::TriplanarField => Step::TriplanarField,
        }
    }

    /// The preceding step, saturating at the first.
    pub fn prev(self) -> Step {
        match self {
            Step::LocalPoint => Step::LocalPoint,
            Step::WorldMapping => Step::LocalPoint,
            Step::InverseRecovery => Step::WorldMapping,
            Step::SinglePlaneMask => Step::InverseRecovery,
            Step::TriplanarField => Step::SinglePlaneMask,
        }
    }

    /// Marker visibility and hologram mode for this step.
    ///
    /// Steps 1–3 progressively reveal the three point markers; steps 4 and 5
    /// hide them and switch the box to the hologram material.
    pub fn view(self) -> StepView {
        let (local, world, recovered, hologram) = match self {
            Step::LocalPoint => (true, false, false, None),
            Step::WorldMapping => (true, true, false, None),
            Step::InverseRecovery => (true, true, true, None),
            Step::SinglePlaneMask => (false, false, false, Some(HologramMode::SinglePlane)),
            Step::TriplanarField => (false, false, false, Some(HologramMode::Triplanar)),
        };
        StepView {
            show_local_marker: local,
            show_world_marker: world,
            show_recovered_marker: recovered,
            hologram,
        }
    }
}

/// All values derived from one set of transform parameters.
///
/// Rebuilt whenever a parameter changes, so the matrices, the world point,
/// and the recovered point always agree with each other.
#[derive(Clone, Copy, Debug)]
pub struct StepSnapshot {
    pub transform: TrsTransform,
    /// Euler angles in degrees, kept for HUD display.
    pub degrees: Vec3,
    pub pair: MatrixPair,
    pub local_point: Vec3,
    pub world_point: Vec3,
    pub recovered_point: Vec3,
}

impl StepSnapshot {
    pub fn new(transform: TrsTransform, degrees: Vec3, local_point: Vec3) -> Self {
        let pair = transform.matrix_pair();
        let world_point = pair.to_world(local_point);
        let recovered_point = pair.to_local(world_point);
        Self {
            transform,
            degrees,
            pair,
            local_point,
            world_point,
            recovered_point,
        }
    }
}

/// Assembles the HUD text for a step from a snapshot.
pub fn hud_text(step: Step, snap: &StepSnapshot) -> String {
    let mut out = String::new();
    let push = |out: &mut String, line: &str| {
        out.push_str(line);
        out.push('\n');
    };

    push(&mut out, step.title());
    push(&mut out, "");
    push(&mut out, &format!("p_local = {}", fmt_vec3(snap.local_point)));

    match step {
        Step::LocalPoint => {
            push(&mut out, "");
            push(&mut out, &format!("t = {}", fmt_vec3(snap.transform.translation)));
            push(
                &mut out,
                &format!(
                    "r_deg = ({:.1}°, {:.1}°, {:.1}°)",
                    snap.degrees.x, snap.degrees.y, snap.degrees.z
                ),
            );
            push(&mut out, &format!("s = {}", fmt_vec3(snap.transform.scale)));
        }
        Step::WorldMapping => {
            push(&mut out, &format!("p_world = {}", fmt_vec3(snap.world_point)));
            push(&mut out, "");
            push(&mut out, &describe_matrix_build(&snap.transform, snap.degrees));
            push(&mut out, "");
            push(&mut out, "// Apply M to p_local");
            push(
                &mut out,
                &describe_point_application(
                    &snap.pair.forward,
                    snap.local_point,
                    ["x_world", "y_world", "z_world", "w'"],
                ),
            );
        }
        Step::InverseRecovery => {
            push(&mut out, &format!("p_world = {}", fmt_vec3(snap.world_point)));
            push(
                &mut out,
                &format!("recovered p_local = {}", fmt_vec3(snap.recovered_point)),
            );
            push(&mut out, "");
            push(&mut out, &describe_inverse_build(&snap.transform));
            push(&mut out, "");
            push(&mut out, "// Apply M⁻¹ to p_world");
            push(
                &mut out,
                &describe_point_application(
                    &snap.pair.inverse,
                    snap.world_point,
                    ["x_local", "y_local", "z_local", "w'"],
                ),
            );
        }
        Step::SinglePlaneMask => {
            push(&mut out, &format!("p_world = {}", fmt_vec3(snap.world_point)));
            push(
                &mut out,
                &format!("recovered p_local = {}", fmt_vec3(snap.recovered_point)),
            );
            push(&mut out, "");
            push(&mut out, "M (still the same local → world):");
            push(&mut out, &fmt_mat4(&snap.pair.forward));
            push(&mut out, "");
            push(
                &mut out,
                "Focus: a single world-plane (XY) dot mask. Cells tile p-space;",
            );
            push(
                &mut out,
                "the offset to the cell center is converted to screen pixels via",
            );
            push(
                &mut out,
                "the inverse Jacobian, so dots stay round and pixel-sized.",
            );
        }
        Step::TriplanarField => {
            push(&mut out, &format!("p_world = {}", fmt_vec3(snap.world_point)));
            push(&mut out, "");
            push(&mut out, "M (local → world):");
            push(&mut out, &fmt_mat4(&snap.pair.forward));
            push(&mut out, "");
            push(
                &mut out,
                "Focus: three masks (XY/XZ/YZ) blended by |normal| weights;",
            );
            push(
                &mut out,
                "YZ dominates when the normal points along X, XZ along Y, XY along Z.",
            );
            push(
                &mut out,
                "Moving the cube changes which part of the world dot field it samples.",
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StepSnapshot {
        let degrees = Vec3::new(0.0, 25.0, 0.0);
        let transform = TrsTransform::new()
            .translation(Vec3::new(0.0, 1.2, 0.0))
            .rotation_degrees(degrees)
            .scale(Vec3::new(1.2, 0.8, 1.6));
        StepSnapshot::new(transform, degrees, Vec3::new(0.3, 0.2, -0.25))
    }

    #[test]
    fn steps_saturate_at_both_ends() {
        assert_eq!(Step::LocalPoint.prev(), Step::LocalPoint);
        assert_eq!(Step::TriplanarField.next(), Step::TriplanarField);
        assert_eq!(Step::LocalPoint.next(), Step::WorldMapping);
        assert_eq!(Step::SinglePlaneMask.prev(), Step::InverseRecovery);
    }

    #[test]
    fn all_steps_ordered_by_number() {
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.number(), i + 1);
        }
    }

    #[test]
    fn markers_reveal_progressively_then_give_way_to_hologram() {
        let v = Step::LocalPoint.view();
        assert!(v.show_local_marker && !v.show_world_marker && !v.show_recovered_marker);
        assert_eq!(v.hologram, None);

        let v = Step::InverseRecovery.view();
        assert!(v.show_local_marker && v.show_world_marker && v.show_recovered_marker);

        let v = Step::SinglePlaneMask.view();
        assert!(!v.show_local_marker);
        assert_eq!(v.hologram, Some(HologramMode::SinglePlane));

        assert_eq!(Step::TriplanarField.view().hologram, Some(HologramMode::Triplanar));
    }

    #[test]
    fn snapshot_round_trips_its_own_point() {
        let snap = snapshot();
        assert!((snap.recovered_point - snap.local_point).length() < 1e-5);
    }

    #[test]
    fn hud_text_grows_with_the_derivation() {
        let snap = snapshot();
        let step1 = hud_text(Step::LocalPoint, &snap);
        assert!(step1.contains("p_local = (0.300, 0.200, -0.250)"));
        assert!(!step1.contains("p_world"));

        let step2 = hud_text(Step::WorldMapping, &snap);
        assert!(step2.contains("// Step 1: Rotation matrix R"));
        assert!(step2.contains("x_world ="));

        let step3 = hud_text(Step::InverseRecovery, &snap);
        assert!(step3.contains("recovered p_local ="));
        assert!(step3.contains("// Analytic inverse for TRS"));
        assert!(step3.contains("x_local ="));

        let step5 = hud_text(Step::TriplanarField, &snap);
        assert!(step5.contains("M (local → world):"));
    }
}
