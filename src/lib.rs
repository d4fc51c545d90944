use std::time::Instant;

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod terminal;
pub mod util;

pub use crate::core::{Camera, Light, Object};
pub use config::Config;
pub use pipeline::{Buffer, Renderer};

/// Per-frame wall-clock bookkeeping for the render loop.
///
/// `tick()` returns the seconds elapsed since the previous tick, which
/// drives frame-rate independent animation; `fps()` is the derived rate
/// shown in the HUD.
pub struct Metrics {
    last_frame: Instant,
    dt: f32,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.dt
    }

    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 {
            1.0 / self.dt
        } else {
            0.0
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tick_measures_elapsed_time() {
        let mut m = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        let dt = m.tick();
        assert!(dt >= 0.010);
        assert!(m.fps() > 0.0);
        assert!(m.fps() <= 100.0);
    }

    #[test]
    fn fps_is_zero_before_the_first_tick() {
        assert_eq!(Metrics::new().fps(), 0.0);
    }
}
