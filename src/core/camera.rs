use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::config::Config;
use crate::util::wrap_angle;

/// Orthonormal view frame derived from the camera's spherical angles.
///
/// `toward` points from the orbit center to the camera; a point's depth
/// along the view axis is `-dot(p, toward)`, so nearer surfaces compare
/// smaller.
#[derive(Debug, Clone, Copy)]
pub struct Basis {
    pub right: Vec3,
    pub up: Vec3,
    pub toward: Vec3,
}

/// Orbit camera around the origin.
///
/// Azimuth wraps into (-PI, PI], altitude clamps to the poles, zoom clamps
/// to its configured bounds. All mutation goes through the rotate/zoom
/// operations so those invariants hold unconditionally.
#[derive(Debug, Clone)]
pub struct Camera {
    azimuth: f32,  // rad
    altitude: f32, // rad
    zoom: f32,     // 1.0 == unit cube fills the logical viewport height

    angle_step: f32, // deg, per key press
    zoom_step: f32,
    zoom_min: f32,
    zoom_max: f32,
}

impl Camera {
    pub fn new(config: &Config) -> Self {
        Self::with_view(
            config,
            config.azimuth_start,
            config.altitude_start,
            config.zoom_start,
        )
    }

    /// Camera at an explicit initial view. Angles in degrees, as supplied
    /// by the CLI; the usual wrap/clamp rules apply to them too.
    pub fn with_view(config: &Config, azimuth_deg: f32, altitude_deg: f32, zoom: f32) -> Self {
        Self {
            azimuth: wrap_angle(azimuth_deg.to_radians()),
            altitude: altitude_deg.to_radians().clamp(-FRAC_PI_2, FRAC_PI_2),
            zoom: zoom.clamp(config.zoom_min, config.zoom_max),
            angle_step: config.angle_step,
            zoom_step: config.zoom_step,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn altitude(&self) -> f32 {
        self.altitude
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotate_left(&mut self, degrees: f32) {
        self.azimuth = wrap_angle(self.azimuth + degrees.to_radians());
    }

    pub fn rotate_right(&mut self, degrees: f32) {
        self.azimuth = wrap_angle(self.azimuth - degrees.to_radians());
    }

    pub fn rotate_up(&mut self, degrees: f32) {
        self.altitude = (self.altitude + degrees.to_radians()).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn rotate_down(&mut self, degrees: f32) {
        self.altitude = (self.altitude - degrees.to_radians()).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn zoom_in(&mut self, step: f32) {
        self.zoom = (self.zoom + step).clamp(self.zoom_min, self.zoom_max);
    }

    pub fn zoom_out(&mut self, step: f32) {
        self.zoom = (self.zoom - step).clamp(self.zoom_min, self.zoom_max);
    }

    // Key-press granularity, using the configured default steps.

    pub fn step_left(&mut self) {
        self.rotate_left(self.angle_step);
    }

    pub fn step_right(&mut self) {
        self.rotate_right(self.angle_step);
    }

    pub fn step_up(&mut self) {
        self.rotate_up(self.angle_step);
    }

    pub fn step_down(&mut self) {
        self.rotate_down(self.angle_step);
    }

    pub fn step_in(&mut self) {
        self.zoom_in(self.zoom_step);
    }

    pub fn step_out(&mut self) {
        self.zoom_out(self.zoom_step);
    }

    /// View frame from the spherical angles.
    ///
    /// The analytic forms keep `right` well-defined at the poles, where
    /// `cross(world_up, toward)` would vanish.
    pub fn basis(&self) -> Basis {
        let (sa, ca) = self.azimuth.sin_cos();
        let (sl, cl) = self.altitude.sin_cos();

        let toward = Vec3::new(cl * sa, sl, cl * ca);
        let right = Vec3::new(ca, 0.0, -sa);
        let up = Vec3::new(-sl * sa, cl, -sl * ca);

        Basis { right, up, toward }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-5;

    fn cam() -> Camera {
        Camera::new(&Config::default())
    }

    #[test]
    fn left_then_right_round_trips_azimuth() {
        for start in [-170.0_f32, -45.0, 0.0, 30.0, 179.0] {
            for d in [0.0_f32, 5.0, 90.0, 361.0, 1234.5] {
                let mut c = Camera::with_view(&Config::default(), start, 0.0, 1.0);
                let before = c.azimuth();
                c.rotate_left(d);
                c.rotate_right(d);
                assert!(
                    (c.azimuth() - before).abs() < EPS,
                    "start {start} step {d}: {} vs {}",
                    c.azimuth(),
                    before
                );
            }
        }
    }

    #[test]
    fn azimuth_wraps_into_canonical_range() {
        let mut c = cam();
        c.rotate_left(720.0 + 10.0);
        assert!((c.azimuth() - 10.0_f32.to_radians()).abs() < EPS);
        c.rotate_right(20.0);
        assert!((c.azimuth() + 10.0_f32.to_radians()).abs() < EPS);
    }

    #[test]
    fn altitude_clamps_at_the_poles() {
        let mut c = cam();
        c.rotate_up(1000.0);
        assert_eq!(c.altitude(), FRAC_PI_2);
        // Further rotation in the same direction is a no-op.
        c.rotate_up(5.0);
        assert_eq!(c.altitude(), FRAC_PI_2);

        c.rotate_down(10_000.0);
        assert_eq!(c.altitude(), -FRAC_PI_2);
    }

    #[test]
    fn zoom_clamps_both_ways() {
        let cfg = Config::default();
        let mut c = cam();
        c.zoom_in(100.0);
        assert_eq!(c.zoom(), cfg.zoom_max);
        c.zoom_out(f32::MAX);
        assert_eq!(c.zoom(), cfg.zoom_min);
        c.zoom_in(-100.0);
        assert_eq!(c.zoom(), cfg.zoom_min);
    }

    #[test]
    fn initial_view_is_wrapped_and_clamped() {
        let c = Camera::with_view(&Config::default(), 540.0, 200.0, 99.0);
        assert!((c.azimuth() - PI).abs() < EPS);
        assert_eq!(c.altitude(), FRAC_PI_2);
        assert_eq!(c.zoom(), Config::default().zoom_max);
    }

    #[test]
    fn basis_is_orthonormal_everywhere() {
        for az in [-150.0_f32, -30.0, 0.0, 60.0, 179.0] {
            for alt in [-90.0_f32, -45.0, 0.0, 45.0, 90.0] {
                let c = Camera::with_view(&Config::default(), az, alt, 1.0);
                let b = c.basis();
                assert!((b.right.length() - 1.0).abs() < EPS);
                assert!((b.up.length() - 1.0).abs() < EPS);
                assert!((b.toward.length() - 1.0).abs() < EPS);
                assert!(b.right.dot(b.up).abs() < EPS);
                assert!(b.right.dot(b.toward).abs() < EPS);
                assert!(b.up.dot(b.toward).abs() < EPS);
                // Right-handed: right x up == toward.
                assert!((b.right.cross(b.up) - b.toward).length() < 1e-4);
            }
        }
    }

    #[test]
    fn default_view_looks_down_positive_z() {
        let b = cam().basis();
        assert!((b.toward - Vec3::Z).length() < EPS);
        assert!((b.up - Vec3::Y).length() < EPS);
        assert!((b.right - Vec3::X).length() < EPS);
    }
}
