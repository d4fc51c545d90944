use glam::Vec3;

use super::camera::Basis;

/// Directional light, described by a unit vector pointing from the scene
/// toward the light source.
///
/// The same descriptor serves both lighting modes: in static mode the
/// vector is taken as world space and never changes; in camera-relative
/// mode it is taken as camera space and rotated through the view basis
/// every frame, so the lamp stays fixed to the viewer's head.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub direction: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
        }
    }

    /// Light shining from straight behind the default camera.
    pub fn toward_viewer() -> Self {
        Self::new(Vec3::Z)
    }

    /// World-space toward-light vector for this frame.
    pub fn world_direction(&self, basis: &Basis, static_light: bool) -> Vec3 {
        if static_light {
            self.direction
        } else {
            basis.right * self.direction.x
                + basis.up * self.direction.y
                + basis.toward * self.direction.z
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::toward_viewer()
    }
}
