//! The interactive walkthrough application.
//!
//! Owns the winit event loop, the scene (demo box plus point markers), the
//! current [`Step`], and the editable transform parameters. Every parameter
//! change rebuilds a [`StepSnapshot`] and reprints the derivation to stdout,
//! so the numbers on screen and the numbers in the text always come from the
//! same matrices.
//!
//! # Controls
//!
//! - Left / Right arrows: previous / next step (1 to 5 jump directly)
//! - T / R / S / P: choose what to edit (translation, rotation, scale, point)
//! - X / Y / Z: choose the axis, Up / Down: nudge the value
//! - \[ / \]: dot radius in pixels, , / .: dot spacing
//! - A: toggle camera auto-rotate, mouse drag / scroll: orbit and zoom

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::camera::{OrbitCamera, OrbitMode};
use crate::gpu::GpuContext;
use crate::hologram_pass::{HologramDraw, HologramPass, HologramSettings, MarkerDraw};
use crate::input::Input;
use crate::mesh::Mesh;
use crate::steps::{Step, StepSnapshot, hud_text};
use crate::transform::{TrsTransform, euler_xyz_degrees};

const TRANSLATE_STEP: f32 = 0.1;
const ROTATE_STEP_DEG: f32 = 5.0;
const SCALE_STEP: f32 = 0.1;
const POINT_STEP: f32 = 0.05;

const BOX_COLOR: Vec4 = Vec4::new(0.55, 0.6, 0.7, 1.0);
const LOCAL_MARKER_COLOR: Vec4 = Vec4::new(0.95, 0.95, 0.95, 1.0);
const WORLD_MARKER_COLOR: Vec4 = Vec4::new(1.0, 0.85, 0.25, 1.0);
const RECOVERED_MARKER_COLOR: Vec4 = Vec4::new(0.5, 1.0, 0.75, 1.0);

/// Window configuration.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "holodot".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// The editable scene parameters.
#[derive(Clone, Copy, Debug)]
pub struct ExplainerParams {
    pub translation: Vec3,
    /// Euler XYZ angles in degrees.
    pub rotation_deg: Vec3,
    pub scale: Vec3,
    /// The tracked point, in the box's local space.
    pub local_point: Vec3,
    pub hologram: HologramSettings,
}

impl Default for ExplainerParams {
    fn default() -> Self {
        Self {
            translation: Vec3::new(0.0, 1.2, 0.0),
            rotation_deg: Vec3::new(0.0, 25.0, 0.0),
            scale: Vec3::new(1.2, 0.8, 1.6),
            local_point: Vec3::new(0.3, 0.2, -0.25),
            hologram: HologramSettings::default(),
        }
    }
}

impl ExplainerParams {
    fn transform(&self) -> TrsTransform {
        TrsTransform::new()
            .translation(self.translation)
            .rotation(euler_xyz_degrees(self.rotation_deg))
            .scale(self.scale)
    }

    fn snapshot(&self) -> StepSnapshot {
        StepSnapshot::new(self.transform(), self.rotation_deg, self.local_point)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditTarget {
    Translation,
    Rotation,
    Scale,
    LocalPoint,
}

impl EditTarget {
    fn label(self) -> &'static str {
        match self {
            EditTarget::Translation => "translation",
            EditTarget::Rotation => "rotation (degrees)",
            EditTarget::Scale => "scale",
            EditTarget::LocalPoint => "local point",
        }
    }

    fn step(self) -> f32 {
        match self {
            EditTarget::Translation => TRANSLATE_STEP,
            EditTarget::Rotation => ROTATE_STEP_DEG,
            EditTarget::Scale => SCALE_STEP,
            EditTarget::LocalPoint => POINT_STEP,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Runs the walkthrough until the window is closed.
pub fn run(config: AppConfig) {
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ExplainerApp::Pending { config };
    event_loop.run_app(&mut app).unwrap();
}

enum ExplainerApp {
    Pending {
        config: AppConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        pass: HologramPass,
        box_mesh: Mesh,
        marker_mesh: Mesh,
        orbit: OrbitCamera,
        input: Input,
        params: ExplainerParams,
        step: Step,
        snapshot: StepSnapshot,
        edit: EditTarget,
        axis: Axis,
        last_frame: Instant,
    },
}

impl ApplicationHandler for ExplainerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let ExplainerApp::Pending { config } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            let gpu = GpuContext::new(window.clone());
            let pass = HologramPass::new(&gpu);
            let box_mesh = Mesh::cube(&gpu);
            let marker_mesh = Mesh::sphere(&gpu, 24, 12);

            let params = ExplainerParams::default();
            let snapshot = params.snapshot();
            let step = Step::LocalPoint;
            print_hud(step, &snapshot, EditTarget::Translation, Axis::Y);

            let orbit = OrbitCamera::new()
                .target(Vec3::new(0.0, 0.8, 0.0))
                .distance(4.5)
                .fov(55.0);

            *self = ExplainerApp::Running {
                window,
                gpu,
                pass,
                box_mesh,
                marker_mesh,
                orbit,
                input: Input::new(),
                params,
                step,
                snapshot,
                edit: EditTarget::Translation,
                axis: Axis::Y,
                last_frame: Instant::now(),
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ExplainerApp::Running {
            window,
            gpu,
            pass,
            box_mesh,
            marker_mesh,
            orbit,
            input,
            params,
            step,
            snapshot,
            edit,
            axis,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                let changed = apply_key_edits(input, params, step, edit, axis, orbit);
                if changed {
                    *snapshot = params.snapshot();
                    print_hud(*step, snapshot, *edit, *axis);
                }

                orbit.update(input, dt);
                let camera = orbit.camera();

                let output = match gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.resize(gpu.width(), gpu.height());
                        input.begin_frame();
                        window.request_redraw();
                        return;
                    }
                    Err(e) => {
                        eprintln!("surface error: {e}");
                        event_loop.exit();
                        return;
                    }
                };
                let target = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let view = step.view();
                let box_model = snapshot.pair.forward;
                let mut markers = Vec::new();
                let mut hologram = None;

                if let Some(mode) = view.hologram {
                    let mut settings = params.hologram;
                    settings.mode = mode;
                    hologram = Some(HologramDraw {
                        mesh: box_mesh,
                        model: box_model,
                        settings,
                    });
                } else {
                    markers.push(MarkerDraw {
                        mesh: box_mesh,
                        model: box_model,
                        color: BOX_COLOR,
                    });
                }

                if view.show_local_marker {
                    markers.push(marker(marker_mesh, snapshot.local_point, 0.06, LOCAL_MARKER_COLOR));
                }
                if view.show_world_marker {
                    markers.push(marker(marker_mesh, snapshot.world_point, 0.06, WORLD_MARKER_COLOR));
                }
                // Slightly larger than the local marker it should coincide
                // with, so the recovery is visible as a mint shell.
                if view.show_recovered_marker {
                    markers.push(marker(
                        marker_mesh,
                        snapshot.recovered_point,
                        0.085,
                        RECOVERED_MARKER_COLOR,
                    ));
                }

                pass.render(gpu, &target, &camera, &markers, hologram.as_ref());
                output.present();

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn marker(mesh: &Mesh, position: Vec3, radius: f32, color: Vec4) -> MarkerDraw<'_> {
    MarkerDraw {
        mesh,
        // Sphere mesh has radius 0.5, so the scale is the diameter.
        model: Mat4::from_scale_rotation_translation(
            Vec3::splat(radius * 2.0),
            Quat::IDENTITY,
            position,
        ),
        color,
    }
}

/// Applies this frame's key presses. Returns true if the snapshot needs a
/// rebuild (parameters or step changed).
fn apply_key_edits(
    input: &Input,
    params: &mut ExplainerParams,
    step: &mut Step,
    edit: &mut EditTarget,
    axis: &mut Axis,
    orbit: &mut OrbitCamera,
) -> bool {
    let mut changed = false;

    if input.key_pressed(KeyCode::ArrowRight) {
        *step = step.next();
        changed = true;
    }
    if input.key_pressed(KeyCode::ArrowLeft) {
        *step = step.prev();
        changed = true;
    }
    for (key, jump) in [
        (KeyCode::Digit1, Step::LocalPoint),
        (KeyCode::Digit2, Step::WorldMapping),
        (KeyCode::Digit3, Step::InverseRecovery),
        (KeyCode::Digit4, Step::SinglePlaneMask),
        (KeyCode::Digit5, Step::TriplanarField),
    ] {
        if input.key_pressed(key) && *step != jump {
            *step = jump;
            changed = true;
        }
    }

    for (key, target) in [
        (KeyCode::KeyT, EditTarget::Translation),
        (KeyCode::KeyR, EditTarget::Rotation),
        (KeyCode::KeyS, EditTarget::Scale),
        (KeyCode::KeyP, EditTarget::LocalPoint),
    ] {
        if input.key_pressed(key) {
            *edit = target;
            changed = true;
        }
    }
    for (key, a) in [
        (KeyCode::KeyX, Axis::X),
        (KeyCode::KeyY, Axis::Y),
        (KeyCode::KeyZ, Axis::Z),
    ] {
        if input.key_pressed(key) {
            *axis = a;
            changed = true;
        }
    }

    let mut nudge = 0.0;
    if input.key_pressed(KeyCode::ArrowUp) {
        nudge += edit.step();
    }
    if input.key_pressed(KeyCode::ArrowDown) {
        nudge -= edit.step();
    }
    if nudge != 0.0 {
        let delta = axis.unit() * nudge;
        match edit {
            EditTarget::Translation => params.translation += delta,
            EditTarget::Rotation => params.rotation_deg += delta,
            // No clamp here: driving a scale axis through zero demonstrates
            // the degenerate-scale guard in the inverse.
            EditTarget::Scale => params.scale += delta,
            EditTarget::LocalPoint => params.local_point += delta,
        }
        changed = true;
    }

    if input.key_pressed(KeyCode::BracketRight) {
        params.hologram.radius_px += 0.5;
        changed = true;
    }
    if input.key_pressed(KeyCode::BracketLeft) {
        params.hologram.radius_px = (params.hologram.radius_px - 0.5).max(0.0);
        changed = true;
    }
    if input.key_pressed(KeyCode::Period) {
        params.hologram.spacing += 0.01;
        changed = true;
    }
    if input.key_pressed(KeyCode::Comma) {
        params.hologram.spacing = (params.hologram.spacing - 0.01).max(0.01);
        changed = true;
    }

    if input.key_pressed(KeyCode::KeyA) {
        orbit.mode = match orbit.mode {
            OrbitMode::Interactive => OrbitMode::AutoRotate { speed: 0.3 },
            OrbitMode::AutoRotate { .. } => OrbitMode::Interactive,
        };
    }

    changed
}

fn print_hud(step: Step, snapshot: &StepSnapshot, edit: EditTarget, axis: Axis) {
    println!("\n================================================================");
    println!("{}", hud_text(step, snapshot));
    println!(
        "[editing {} along {}; T/R/S/P target, X/Y/Z axis, Up/Down nudge, \u{2190}/\u{2192} step]",
        edit.label(),
        axis.label()
    );
}
