use std::io::{self, Stdout, Write};
use std::panic;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
    QueueableCommand,
};
use log::error;

use crate::core::{Camera, Material};
use crate::util::unsigned_zero;

/// Upper bound on simultaneously registered color pairs; materials beyond
/// it fall back to uncolored glyphs.
pub const MAX_PAIRS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Transparent,
}

impl Theme {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            "transparent" => Some(Theme::Transparent),
            _ => None,
        }
    }

    fn background(self) -> Option<Color> {
        match self {
            Theme::Dark => Some(Color::Black),
            Theme::Light => Some(Color::White),
            Theme::Transparent => None, // keep the terminal's own background
        }
    }

    fn hud(self) -> Color {
        match self {
            Theme::Light => Color::Black,
            Theme::Dark | Theme::Transparent => Color::White,
        }
    }
}

/// Bounded color table built once at startup when color is requested.
///
/// Index i colors faces of material i; the renderer treats the index as
/// opaque and emission degrades gracefully past the end of the table.
pub struct Palette {
    pub colors: Vec<Color>,
    pub hud: Color,
    pub background: Option<Color>,
}

impl Palette {
    pub fn build(materials: &[Material], theme: Theme) -> Self {
        let colors = materials
            .iter()
            .take(MAX_PAIRS)
            .map(|m| {
                let d = m.diffuse.clamp(glam::Vec3::ZERO, glam::Vec3::ONE) * 255.0;
                Color::Rgb {
                    r: d.x as u8,
                    g: d.y as u8,
                    b: d.z as u8,
                }
            })
            .collect();
        Self {
            colors,
            hud: theme.hud(),
            background: theme.background(),
        }
    }
}

/// One input observation per frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyCode),
    Resize(u16, u16),
}

/// Raw-mode terminal session. Construction switches the terminal over;
/// Drop (and a panic hook) switch it back.
pub struct Terminal {
    out: Stdout,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        // Restore the terminal before any panic report hits the screen.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = Self::restore();
            error!("panic: {panic_info:?}");
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { out })
    }

    fn restore() -> io::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), ResetColor, Show, terminal::LeaveAlternateScreen)
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    /// Applies the theme background across the whole screen.
    pub fn apply_theme(&mut self, palette: &Palette) -> Result<()> {
        if let Some(bg) = palette.background {
            execute!(self.out, SetBackgroundColor(bg), Clear(ClearType::All))?;
        }
        Ok(())
    }

    /// Waits up to `timeout` for one input event. Key releases and other
    /// noise are swallowed so the frame loop sees at most presses and
    /// resizes.
    pub fn poll(&self, timeout: Duration) -> Result<Option<Input>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(Input::Key(key.code))),
            Event::Resize(cols, rows) => Ok(Some(Input::Resize(cols, rows))),
            _ => Ok(None),
        }
    }

    pub fn draw(&mut self, buffer: &crate::pipeline::Buffer, palette: Option<&Palette>) -> Result<()> {
        buffer.emit(&mut self.out, palette.map(|p| p.colors.as_slice()))?;
        Ok(())
    }

    /// Four-line overlay in the top-left corner; degrees at this boundary.
    pub fn draw_hud(&mut self, camera: &Camera, fps: f32, palette: Option<&Palette>) -> Result<()> {
        if let Some(p) = palette {
            self.out.queue(SetForegroundColor(p.hud))?;
        }
        let lines = [
            format!("framerate {:6.0} fps", fps),
            format!("zoom      {:6.1} x", camera.zoom()),
            format!(
                "azimuth   {:6.1} deg",
                unsigned_zero(camera.azimuth().to_degrees())
            ),
            format!(
                "altitude  {:6.1} deg",
                unsigned_zero(camera.altitude().to_degrees())
            ),
        ];
        for (row, line) in lines.iter().enumerate() {
            self.out.queue(MoveTo(0, row as u16))?;
            self.out.queue(Print(line))?;
        }
        if palette.is_some() {
            // Foreground only; the theme background must survive.
            self.out.queue(SetForegroundColor(Color::Reset))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = Self::restore();
    }
}
