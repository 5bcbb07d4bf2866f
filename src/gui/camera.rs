use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_STEP: f32 = 1.2;

// An arcball-style camera that always looks at the sun. Dragging and scrolling don't
// move the camera directly; they queue up a rotation or zoom, and each frame we apply a
// fraction of whatever is still queued. That gives the camera a bit of glide after
// you let go of the mouse.
//
// y is up, to match the orbital plane being xz.
pub struct OrbitCamera {
    // -- position --
    theta: f32,  // azimuthal angle, measured from +z towards +x
    phi: f32,    // polar angle, measured from +y
    radius: f32, // distance from origin
    // -- pending motion --
    pending_theta: f32,
    pending_phi: f32,
    pending_zoom: f32, // log of the zoom factor still to apply
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    theta_step: f32,
    phi_step: f32,
    scroll_ratio: f32,
    phi_limit: f32,
    radius_limits: (f32, f32),
    damping: f32,
}

impl OrbitCamera {
    pub fn new(eye: Point3<f32>, width: u32, height: u32) -> Self {
        let radius = eye.coords.norm();
        let phi = if radius > 0.0 {
            (eye.y / radius).acos()
        } else {
            PI / 2.0
        };

        OrbitCamera {
            theta: eye.x.atan2(eye.z),
            phi,
            radius,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_zoom: 0.0,
            width,
            height,
            fovy: 75.0f32.to_radians(),
            znear: 0.1,
            zfar: 200.0,
            last_cursor_pos: Vector2::zeros(),
            theta_step: 0.005,
            phi_step: 0.005,
            scroll_ratio: 1.1,
            phi_limit: 0.001,
            radius_limits: (1.0, 200.0),
            damping: 0.05,
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, self.znear, self.zfar)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Framebuffer size in physical pixels. The view forwards resizes here.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Queues a rotation, applied gradually by `step_damping`.
    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.pending_theta += dtheta;
        self.pending_phi += dphi;
    }

    /// Queues a zoom by `factor`; bigger than one moves away.
    pub fn zoom(&mut self, factor: f32) {
        self.pending_zoom += factor.ln();
    }

    /// Applies one frame's worth of the queued motion.
    pub fn step_damping(&mut self) {
        let dtheta = self.pending_theta * self.damping;
        let dphi = self.pending_phi * self.damping;
        let dzoom = self.pending_zoom * self.damping;
        self.pending_theta -= dtheta;
        self.pending_phi -= dphi;
        self.pending_zoom -= dzoom;

        self.theta = (self.theta + dtheta) % (2.0 * PI);
        self.phi = nalgebra::clamp(self.phi + dphi, self.phi_limit, PI - self.phi_limit);
        self.radius = nalgebra::clamp(
            self.radius * dzoom.exp(),
            self.radius_limits.0,
            self.radius_limits.1,
        );
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Drag right == scene turns right, so the camera swings left
                    let dpos = curr_pos - self.last_cursor_pos;
                    self.rotate(-dpos.x * self.theta_step, -dpos.y * self.phi_step);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                self.rotate(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                self.rotate(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                self.rotate(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                self.rotate(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_STEP),
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        Point3::new(
            self.radius * self.phi.sin() * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.cos(),
        )
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {
        self.step_damping();
    }

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_eye() {
        let camera = OrbitCamera::new(Point3::new(0.0, 0.0, 50.0), 800, 600);
        approx::assert_relative_eq!(camera.eye(), Point3::new(0.0, 0.0, 50.0), epsilon = 1e-4);
        approx::assert_relative_eq!(camera.aspect(), 800.0 / 600.0);
        assert_eq!(camera.clip_planes(), (0.1, 200.0));
    }

    #[test]
    fn test_viewport_sets_aspect() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 50.0), 1280, 720);
        let eye = camera.eye();

        camera.set_viewport(800, 600);
        approx::assert_relative_eq!(camera.aspect(), 800.0 / 600.0);
        approx::assert_relative_eq!(camera.eye(), eye);

        // A minimized window reports zero height
        camera.set_viewport(800, 0);
        assert!(camera.aspect().is_finite());
    }

    #[test]
    fn test_damped_rotation_converges() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 50.0), 800, 600);
        camera.rotate(0.5, 0.0);

        // Only part of the motion happens on the first frame
        camera.step_damping();
        approx::assert_relative_eq!(camera.theta, 0.025, epsilon = 1e-6);

        for _ in 0..1000 {
            camera.step_damping();
        }
        approx::assert_relative_eq!(camera.theta, 0.5, epsilon = 1e-4);
        approx::assert_relative_eq!(camera.distance(), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zoom_limits() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 50.0), 800, 600);
        camera.zoom(1000.0);
        for _ in 0..1000 {
            camera.step_damping();
        }
        approx::assert_relative_eq!(camera.distance(), 200.0);

        camera.zoom(1e-6);
        for _ in 0..1000 {
            camera.step_damping();
        }
        approx::assert_relative_eq!(camera.distance(), 1.0);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 50.0), 800, 600);
        camera.rotate(0.0, -10.0);
        for _ in 0..1000 {
            camera.step_damping();
        }
        // Never flips over the pole
        assert!(camera.eye().y > 0.0);
        assert!(camera.eye().x.abs() + camera.eye().z.abs() > 0.0);
    }
}
