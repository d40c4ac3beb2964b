//! Viewer camera: a plain perspective camera plus an orbit controller.
//!
//! The walkthrough always looks at the scene from an orbit around the demo
//! box; free flight would only distract from the math. [`OrbitCamera`] owns
//! the spherical coordinates and produces a [`Camera`] each frame.

use glam::{Mat4, Vec3};
use winit::event::MouseButton;

use crate::input::Input;

/// A perspective camera described by position and orientation vectors.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Normalized view direction.
    pub forward: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 4.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_3,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Right-handed look-at view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    /// Right-handed perspective projection for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

/// How the orbit controller moves.
#[derive(Clone, Copy, Debug)]
pub enum OrbitMode {
    /// Mouse drag to rotate, scroll wheel to zoom.
    Interactive,
    /// Slow constant rotation around the target, ignoring the mouse.
    AutoRotate {
        /// Radians per second, positive is counterclockwise from above.
        speed: f32,
    },
}

impl Default for OrbitMode {
    fn default() -> Self {
        Self::Interactive
    }
}

/// Orbits a [`Camera`] around a target point.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from the target.
    pub distance: f32,
    /// Horizontal angle in radians.
    pub azimuth: f32,
    /// Vertical angle in radians, clamped short of the poles.
    pub elevation: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub mode: OrbitMode,
    /// Radians per pixel of mouse drag.
    pub sensitivity: f32,
    /// Distance change per scroll line.
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 4.0,
            azimuth: 0.6,
            elevation: 0.35,
            fov: std::f32::consts::FRAC_PI_3,
            mode: OrbitMode::Interactive,
            sensitivity: 0.005,
            zoom_sensitivity: 0.4,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: impl Into<Vec3>) -> Self {
        self.target = target.into();
        self
    }

    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self
    }

    pub fn mode(mut self, mode: OrbitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Field of view in degrees.
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn azimuth(mut self, azimuth: f32) -> Self {
        self.azimuth = azimuth;
        self
    }

    pub fn elevation(mut self, elevation: f32) -> Self {
        self.elevation = clamp_elevation(elevation);
        self
    }

    /// Advance the controller one frame.
    pub fn update(&mut self, input: &Input, dt: f32) {
        match self.mode {
            OrbitMode::Interactive => {
                if input.mouse_down(MouseButton::Left) {
                    let delta = input.mouse_delta();
                    self.azimuth -= delta.x * self.sensitivity;
                    self.elevation = clamp_elevation(self.elevation + delta.y * self.sensitivity);
                }

                let scroll = input.scroll_delta();
                if scroll.y.abs() > 0.0 {
                    self.distance = (self.distance - scroll.y * self.zoom_sensitivity)
                        .clamp(self.min_distance, self.max_distance);
                }
            }
            OrbitMode::AutoRotate { speed } => {
                self.azimuth += speed * dt;
            }
        }
    }

    /// The camera for the current orbit state.
    pub fn camera(&self) -> Camera {
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );
        let position = self.target + offset;

        Camera {
            position,
            forward: (self.target - position).normalize_or(Vec3::NEG_Z),
            up: Vec3::Y,
            fov: self.fov,
            near: 0.05,
            far: 100.0,
        }
    }
}

fn clamp_elevation(elevation: f32) -> f32 {
    elevation.clamp(
        -std::f32::consts::FRAC_PI_2 + 0.01,
        std::f32::consts::FRAC_PI_2 - 0.01,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_camera_looks_at_target() {
        let orbit = OrbitCamera::new()
            .target(Vec3::new(0.0, 1.0, 0.0))
            .distance(3.0)
            .azimuth(1.1)
            .elevation(0.4);
        let cam = orbit.camera();

        let to_target = (orbit.target - cam.position).normalize();
        assert!((cam.forward - to_target).length() < 1e-6);
        assert!(((cam.position - orbit.target).length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn elevation_stays_off_the_poles() {
        let orbit = OrbitCamera::new().elevation(10.0);
        assert!(orbit.elevation < std::f32::consts::FRAC_PI_2);

        let orbit = OrbitCamera::new().elevation(-10.0);
        assert!(orbit.elevation > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn auto_rotate_advances_azimuth_with_time() {
        let mut orbit = OrbitCamera::new().mode(OrbitMode::AutoRotate { speed: 0.5 });
        let start = orbit.azimuth;
        orbit.update(&Input::new(), 2.0);
        assert!((orbit.azimuth - start - 1.0).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_moves_the_eye_to_the_origin() {
        let cam = OrbitCamera::new().distance(5.0).camera();
        let eye_in_view = cam.view_matrix().transform_point3(cam.position);
        assert!(eye_in_view.length() < 1e-5);
    }
}
