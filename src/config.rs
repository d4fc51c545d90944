use std::time::Duration;

/// Every tunable the renderer, camera and frame loop consume, as data.
///
/// Keeping these out of the modules that use them lets tests run the
/// pipeline with small ramps and odd zoom bounds.
#[derive(Debug, Clone)]
pub struct Config {
    /// Luminance ramp, darkest glyph first.
    pub ramp: Vec<char>,
    /// Height of a terminal cell relative to its width.
    pub char_aspect: f32,

    /// Camera rotation per key press, degrees.
    pub angle_step: f32,
    pub zoom_start: f32,
    pub zoom_step: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub azimuth_start: f32,
    pub altitude_start: f32,

    /// Frame deadline; the loop never renders faster than this.
    pub frame_duration: Duration,
    /// Default animation speeds, degrees per second.
    pub animation_step_azimuth: f32,
    pub animation_step_altitude: f32,

    /// Vertical extent of the logical viewport; the horizontal extent is
    /// derived from the terminal size and `char_aspect`.
    pub logical_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ramp: " .:-=+*#%@".chars().collect(),
            char_aspect: 2.0,
            angle_step: 5.0,
            zoom_start: 1.0,
            zoom_step: 0.1,
            zoom_min: 0.10,
            zoom_max: 5.00,
            azimuth_start: 0.0,
            altitude_start: 0.0,
            frame_duration: Duration::from_secs_f32(1.0 / 60.0),
            animation_step_azimuth: 30.0,
            animation_step_altitude: 30.0,
            logical_height: 2.0,
        }
    }
}

impl Config {
    /// Logical width for a terminal of `cols` x `rows` cells, corrected so
    /// square logical extents cover square screen areas.
    pub fn logical_width(&self, cols: u16, rows: u16) -> f32 {
        let rows = rows.max(1) as f32;
        self.logical_height * cols as f32 / (rows * self.char_aspect)
    }
}
