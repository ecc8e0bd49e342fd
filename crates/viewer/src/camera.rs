//! Yaw/pitch camera for looking around the inside of a panorama sphere.

/// Degrees of rotation per pixel of pointer drag.
pub const DRAG_SENSITIVITY_DEG_PER_PX: f64 = 0.1;

/// Degrees of rotation per arrow-key press.
pub const KEY_ROTATION_STEP_DEG: f64 = 5.0;

/// Pitch limit in either direction. Looking straight up or down is the
/// furthest the camera may tilt.
pub const MAX_PITCH_DEG: f64 = 90.0;

/// Default vertical field of view.
pub const DEFAULT_FOV_DEG: f64 = 75.0;

/// A camera at the sphere centre, oriented by yaw and pitch in degrees.
///
/// Yaw wraps into `[0, 360)`; pitch is clamped to
/// `[-MAX_PITCH_DEG, MAX_PITCH_DEG]` on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    yaw_deg: f64,
    pitch_deg: f64,
    fov_deg: f64,
    aspect: f64,
}

impl OrbitCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            fov_deg: DEFAULT_FOV_DEG,
            aspect: 1.0,
        };
        camera.set_viewport(width, height);
        camera
    }

    pub fn yaw(&self) -> f64 {
        self.yaw_deg
    }

    pub fn pitch(&self) -> f64 {
        self.pitch_deg
    }

    pub fn fov(&self) -> f64 {
        self.fov_deg
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Set an absolute orientation. Non-finite values are ignored.
    pub fn set_orientation(&mut self, yaw_deg: f64, pitch_deg: f64) {
        if yaw_deg.is_finite() {
            self.yaw_deg = yaw_deg.rem_euclid(360.0);
        }
        if pitch_deg.is_finite() {
            self.pitch_deg = pitch_deg.clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);
        }
    }

    /// Rotate relative to the current orientation.
    pub fn rotate_by(&mut self, delta_yaw_deg: f64, delta_pitch_deg: f64) {
        self.set_orientation(
            self.yaw_deg + delta_yaw_deg,
            self.pitch_deg + delta_pitch_deg,
        );
    }

    /// Update the aspect ratio for a new viewport size. A zero-sized
    /// viewport keeps the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = f64::from(width) / f64::from(height);
        }
    }

    /// Unit vector the camera looks along (y up).
    pub fn look_direction(&self) -> [f64; 3] {
        let phi = (90.0 - self.pitch_deg).to_radians();
        let theta = self.yaw_deg.to_radians();
        [
            phi.sin() * theta.cos(),
            phi.cos(),
            phi.sin() * theta.sin(),
        ]
    }
}
