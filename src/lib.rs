//! # holodot
//!
//! **An interactive, step-by-step visual explainer for the TRS transform
//! pipeline and a procedural hologram dot shader.**
//!
//! A box sits in a 3D scene with a point marked in its local space. Five
//! steps walk through what a `translation * rotation * scale` matrix does
//! to that point, how the closed-form inverse undoes it, and how the same
//! inverse-mapping idea makes a screen-space dot pattern stick to a surface:
//!
//! 1. The point in local space, before any transform.
//! 2. Composing `M = T·R·S` from quaternion components and mapping the
//!    point to world space.
//! 3. The analytic inverse `S⁻¹·Rᵀ` and recovering the local point.
//! 4. A single-plane dot mask: cells tile world space, but the dot radius
//!    is measured in screen pixels via the inverse Jacobian.
//! 5. The full triplanar dot field, blended by surface normal.
//!
//! Every intermediate quantity the shader math uses (quaternion products,
//! matrix rows, cofactor solves) is computed on the CPU in plain Rust and
//! printed as the derivation, so nothing on screen is a black box. The math
//! modules ([`transform`], [`dot_mask`], [`triplanar`]) are pure and usable
//! without a window.
//!
//! ## Quick Start
//!
//! ```no_run
//! use holodot::AppConfig;
//!
//! fn main() {
//!     holodot::run(AppConfig::new().title("TRS walkthrough"));
//! }
//! ```

mod app;
mod camera;
pub mod dot_mask;
mod gpu;
mod hologram_pass;
mod input;
mod mesh;
pub mod narrative;
mod steps;
pub mod transform;
pub mod triplanar;

pub use app::{AppConfig, ExplainerParams, run};
pub use camera::{Camera, OrbitCamera, OrbitMode};
pub use dot_mask::{DET_EPSILON, ScreenJacobian, dot_mask};
pub use gpu::GpuContext;
pub use hologram_pass::{
    CameraUniforms, HologramDraw, HologramPass, HologramSettings, HologramUniforms, MarkerDraw,
    ModelUniforms,
};
pub use input::Input;
pub use mesh::{Mesh, RawGeometry, Vertex3d};
pub use narrative::{
    describe_inverse_build, describe_matrix_build, describe_point_application, fmt_mat4, fmt_vec3,
};
pub use steps::{HologramMode, Step, StepSnapshot, StepView, hud_text};
pub use transform::{
    MIN_SCALE, MatrixPair, RotationTerms, TrsTransform, euler_xyz_degrees,
};
pub use triplanar::{
    SurfaceDerivatives, TRIPLANAR_PERIOD, WEIGHT_FLOOR, plane_weights, triplanar_mask,
};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
