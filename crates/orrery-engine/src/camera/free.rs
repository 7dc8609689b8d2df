use glam::{Mat4, Quat, Vec3, Vec4Swizzles};

use crate::coords::{Vec2, Viewport};
use crate::input::{InputFrame, InputState, Key, MouseButton};

/// World units per second for keyboard fly movement.
const MOVE_SPEED: f32 = 5.4;
/// Radians per logical pixel of drag.
const ORBIT_SENSITIVITY: f32 = 0.003;
/// Pan distance per logical pixel, relative to the distance to the target.
const PAN_SENSITIVITY: f32 = 0.0015;
/// World units per wheel line.
const ZOOM_STEP: f32 = 1.0;
/// Closest the camera gets to its target when zooming.
const MIN_DISTANCE: f32 = 0.001;
/// Keeps the view direction this many radians away from `up`.
const PITCH_MARGIN: f32 = 0.01;

/// A point projected into the viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projected {
    /// Position in logical pixels, origin top-left.
    pub screen: Vec2,
    /// Distance along the view direction; larger is farther.
    pub depth: f32,
}

/// Perspective camera with free-look controls.
///
/// Controls:
/// - mouse wheel zooms toward the target
/// - right or middle drag orbits around the target
/// - shift + drag pans target and position together
/// - `W`/`S` forward/back, `A`/`D` strafe, `E`/`Q` up/down
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FreeCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl FreeCamera {
    pub fn new(position: Vec3, target: Vec3, up: Vec3, fovy: f32) -> Self {
        Self {
            position,
            target,
            up,
            fovy,
            znear: 0.01,
            zfar: 1000.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Unit vector from position toward target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Projects a world point; `None` when it lies behind the camera.
    pub fn project(&self, point: Vec3, viewport: Viewport) -> Option<Projected> {
        let clip = self.view_projection(viewport.aspect()) * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(Projected {
            screen: ndc_to_screen(ndc.x, ndc.y, viewport),
            depth: clip.w,
        })
    }

    /// Screen position of a world point, in logical pixels.
    ///
    /// Points behind the camera are divided through like any other and land
    /// mirrored; points on the camera plane map off screen.
    pub fn world_to_screen(&self, point: Vec3, viewport: Viewport) -> Vec2 {
        let clip = self.view_projection(viewport.aspect()) * point.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return Vec2::new(f32::MAX, f32::MAX);
        }
        let ndc = clip.xyz() / clip.w;
        ndc_to_screen(ndc.x, ndc.y, viewport)
    }

    /// Applies one frame of user input.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        if frame.scroll_delta.y != 0.0 {
            self.zoom(frame.scroll_delta.y * ZOOM_STEP);
        }

        let dragging = input.button_down(MouseButton::Right) || input.button_down(MouseButton::Middle);
        let drag = frame.pointer_delta;
        if dragging && (drag.x != 0.0 || drag.y != 0.0) {
            if input.modifiers.shift {
                self.pan(drag.x, drag.y);
            } else {
                self.orbit(-drag.x * ORBIT_SENSITIVITY, -drag.y * ORBIT_SENSITIVITY);
            }
        }

        let axis = |pos: Key, neg: Key| input.key_down(pos) as i32 as f32 - input.key_down(neg) as i32 as f32;
        let step = MOVE_SPEED * dt;
        let offset = self.forward() * axis(Key::W, Key::S) * step
            + self.right() * axis(Key::D, Key::A) * step
            + self.up.normalize_or_zero() * axis(Key::E, Key::Q) * step;
        self.position += offset;
        self.target += offset;
    }

    /// Moves the position toward the target by `amount` world units.
    pub fn zoom(&mut self, amount: f32) {
        let back = -self.forward();
        if back == Vec3::ZERO {
            return;
        }
        let distance = (self.distance() - amount).max(MIN_DISTANCE);
        self.position = self.target + back * distance;
    }

    /// Rotates the position around the target by `yaw` about `up` and `pitch`
    /// about the camera right axis, both in radians.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let up = self.up.normalize_or_zero();
        let offset = self.position - self.target;
        if up == Vec3::ZERO || offset == Vec3::ZERO {
            return;
        }

        let offset = Quat::from_axis_angle(up, yaw) * offset;

        // Clamp so the view never flips over the up axis.
        let angle = offset.angle_between(up);
        let pitch = pitch.clamp(angle - (std::f32::consts::PI - PITCH_MARGIN), angle - PITCH_MARGIN);
        let right = up.cross(offset).normalize_or_zero();
        let offset = if right == Vec3::ZERO { offset } else { Quat::from_axis_angle(right, -pitch) * offset };

        self.position = self.target + offset;
    }

    /// Slides target and position across the view plane by a pixel drag.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right();
        let cam_up = right.cross(self.forward());
        let scale = PAN_SENSITIVITY * self.distance();
        let offset = (-right * dx + cam_up * dy) * scale;
        self.position += offset;
        self.target += offset;
    }
}

fn ndc_to_screen(x: f32, y: f32, viewport: Viewport) -> Vec2 {
    Vec2::new((x + 1.0) * 0.5 * viewport.width, (1.0 - y) * 0.5 * viewport.height)
}
