use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, SetForegroundColor},
    QueueableCommand,
};
use glam::Vec2;
use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;

pub const BACKGROUND: char = ' ';

/// One character cell: the glyph on display and, when color is enabled,
/// an opaque palette index supplied by the terminal driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub pair: Option<u16>,
}

impl Cell {
    fn reset(&mut self) {
        self.glyph = BACKGROUND;
        self.pair = None;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: BACKGROUND,
            pair: None,
        }
    }
}

/// Character grid plus a parallel depth grid.
///
/// The buffer owns the mapping between the renderer's logical plane (real
/// axes centered on the origin, aspect-corrected) and integer cell
/// indices; the renderer never sees terminal cell geometry. Rebuilt on
/// terminal resize, cleared before every rendered frame.
pub struct Buffer {
    width: usize,
    height: usize,
    logical_w: f32,
    logical_h: f32,
    cells: Vec<Cell>,
    depth: Vec<f32>,
}

impl Buffer {
    pub fn new(width: usize, height: usize, logical_w: f32, logical_h: f32) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            logical_w,
            logical_h,
            cells: vec![Cell::default(); size],
            depth: vec![f32::INFINITY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Background glyph and infinitely-far depth everywhere.
    pub fn clear(&mut self) {
        self.cells.par_chunks_mut(1024).for_each(|chunk| {
            for cell in chunk {
                cell.reset();
            }
        });
        self.depth.par_chunks_mut(1024).for_each(|chunk| {
            for d in chunk {
                *d = f32::INFINITY;
            }
        });
    }

    /// Logical point to fractional cell coordinates. Logical +y is up;
    /// row 0 is the top of the screen.
    pub fn to_cell(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x / self.logical_w + 0.5) * self.width as f32,
            (0.5 - p.y / self.logical_h) * self.height as f32,
        )
    }

    /// Depth-tested write. Out-of-range cells are silently clipped;
    /// strictly nearer depth wins, exact ties keep the first writer.
    pub fn plot(&mut self, col: i32, row: i32, depth: f32, glyph: char, pair: Option<u16>) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return;
        }
        let index = col + row * self.width;
        if depth < self.depth[index] {
            self.cells[index] = Cell { glyph, pair };
            self.depth[index] = depth;
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.width && row < self.height {
            self.cells.get(col + row * self.width)
        } else {
            None
        }
    }

    pub fn depth_at(&self, col: usize, row: usize) -> Option<f32> {
        if col < self.width && row < self.height {
            self.depth.get(col + row * self.width).copied()
        } else {
            None
        }
    }

    /// Writes the whole grid in one pass, coalescing runs of cells that
    /// share a palette index to minimize color changes. Pair indices with
    /// no palette entry (or no palette at all) print as plain glyphs.
    pub fn emit(&self, out: &mut impl Write, palette: Option<&[Color]>) -> io::Result<()> {
        let mut run = String::with_capacity(self.width);
        let mut active: Option<Color> = None;

        for row in 0..self.height {
            out.queue(MoveTo(0, row as u16))?;
            let mut col = 0;
            while col < self.width {
                let start = col + row * self.width;
                let pair = self.cells[start].pair;

                run.clear();
                while col < self.width && self.cells[col + row * self.width].pair == pair {
                    run.push(self.cells[col + row * self.width].glyph);
                    col += 1;
                }

                let color = pair.and_then(|p| palette.and_then(|pal| pal.get(p as usize)).copied());
                if color != active {
                    // Reset only the foreground so a theme background set
                    // by the driver survives the frame.
                    out.queue(SetForegroundColor(color.unwrap_or(Color::Reset)))?;
                    active = color;
                }
                out.queue(Print(run.as_str()))?;
            }
        }

        if active.is_some() {
            out.queue(SetForegroundColor(Color::Reset))?;
        }
        out.flush()
    }
}
