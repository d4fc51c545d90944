use glam::{Vec2, Vec3};

use crate::config::Config;
use crate::core::{Camera, Light, Object};
use crate::pipeline::Buffer;

/// The rendering pipeline: transform, cull, shade, rasterize, quantize.
///
/// Owns nothing but the luminance ramp; everything else arrives per frame
/// and only the buffer is written.
pub struct Renderer {
    ramp: Vec<char>,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        let mut ramp = config.ramp.clone();
        if ramp.is_empty() {
            ramp.push(crate::pipeline::BACKGROUND);
        }
        Self { ramp }
    }

    /// Renders one frame of `object` into `buffer`.
    ///
    /// Orthographic projection through the camera basis, zoom as a linear
    /// scale on the projected extent. Faces whose normals point away from
    /// the camera are culled; the depth test resolves the rest.
    pub fn render(
        &self,
        buffer: &mut Buffer,
        object: &Object,
        camera: &Camera,
        light: &Light,
        static_light: bool,
        color_enabled: bool,
    ) {
        let basis = camera.basis();
        let zoom = camera.zoom();
        let light_dir = light.world_direction(&basis, static_light);

        for face in &object.faces {
            // Degenerate faces carry a zero normal and contribute nothing.
            if face.normal == Vec3::ZERO {
                continue;
            }
            // Backface test: camera-space z-sign of the face normal.
            if face.normal.dot(basis.toward) <= 0.0 {
                continue;
            }

            let luminance = face.normal.dot(light_dir).clamp(0.0, 1.0);
            let glyph = self.glyph_for(luminance);
            let pair = if color_enabled {
                face.material.and_then(|m| u16::try_from(m).ok())
            } else {
                None
            };

            let mut cells = [Vec2::ZERO; 3];
            let mut depths = [0.0f32; 3];
            for (i, &vi) in face.indices.iter().enumerate() {
                let p = object.vertices[vi].pos;
                let logical = Vec2::new(p.dot(basis.right), p.dot(basis.up)) * zoom;
                cells[i] = buffer.to_cell(logical);
                depths[i] = -p.dot(basis.toward);
            }

            fill_triangle(buffer, cells, depths, glyph, pair);
        }
    }

    /// Quantizes a luminance in [0, 1] onto the ramp, darkest glyph first.
    /// Monotonic: brighter luminance never picks an earlier glyph.
    pub fn glyph_for(&self, luminance: f32) -> char {
        let last = self.ramp.len() - 1;
        let index = (luminance.clamp(0.0, 1.0) * last as f32).round() as usize;
        self.ramp[index.min(last)]
    }
}

/// Scan-converts one triangle given in fractional cell coordinates,
/// interpolating depth at every covered cell center. Coverage is clipped
/// to the grid by iterating the clamped bounding box; the buffer's plot
/// clips anything that still lands outside.
fn fill_triangle(
    buffer: &mut Buffer,
    verts: [Vec2; 3],
    depths: [f32; 3],
    glyph: char,
    pair: Option<u16>,
) {
    let min = verts[0].min(verts[1]).min(verts[2]);
    let max = verts[0].max(verts[1]).max(verts[2]);

    let col_min = (min.x.floor() as i32).max(0);
    let row_min = (min.y.floor() as i32).max(0);
    let col_max = (max.x.ceil() as i32).min(buffer.width() as i32 - 1);
    let row_max = (max.y.ceil() as i32).min(buffer.height() as i32 - 1);
    if col_min > col_max || row_min > row_max {
        return;
    }

    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let p = Vec2::new(col as f32 + 0.5, row as f32 + 0.5);
            let Some((w0, w1, w2)) = barycentric(p, verts[0], verts[1], verts[2]) else {
                return; // zero-area projection
            };
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                let depth = w0 * depths[0] + w1 * depths[1] + w2 * depths[2];
                buffer.plot(col, row, depth, glyph, pair);
            }
        }
    }
}

fn barycentric(p: Vec2, v0: Vec2, v1: Vec2, v2: Vec2) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
    if denom.abs() < 1e-10 {
        return None;
    }
    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;
    Some((w0, w1, w2))
}
