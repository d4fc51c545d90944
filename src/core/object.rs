use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use log::{info, warn};

/// Surface description referenced by faces through an index.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    /// Diffuse color, components in [0, 1].
    pub diffuse: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub pos: Vec3,
}

/// One triangle: vertex indices in winding order, the unit normal that
/// winding implies, and an optional material.
#[derive(Debug, Clone)]
pub struct Face {
    pub indices: [usize; 3],
    pub normal: Vec3,
    pub material: Option<usize>,
}

/// A triangle mesh with its materials.
///
/// Loaded once at startup, shaped by the geometric operations below, then
/// read-only for the rest of the program.
#[derive(Debug, Clone)]
pub struct Object {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub materials: Vec<Material>,
}

fn face_normal(vertices: &[Vertex], indices: [usize; 3]) -> Vec3 {
    let v0 = vertices[indices[0]].pos;
    let v1 = vertices[indices[1]].pos;
    let v2 = vertices[indices[2]].pos;
    // Zero for degenerate triangles; those never shade or rasterize.
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

impl Object {
    /// Builds an object from raw parts, deriving every face normal from
    /// its winding order. Panics on out-of-range indices; the loader
    /// validates before calling.
    pub fn new(
        vertices: Vec<Vertex>,
        faces: Vec<(usize, usize, usize, Option<usize>)>,
        materials: Vec<Material>,
    ) -> Self {
        let faces = faces
            .into_iter()
            .map(|(a, b, c, material)| {
                let indices = [a, b, c];
                Face {
                    indices,
                    normal: face_normal(&vertices, indices),
                    material,
                }
            })
            .collect();
        Self {
            vertices,
            faces,
            materials,
        }
    }

    /// Loads a Wavefront OBJ (with MTL materials when present), forcing
    /// triangulation. Fails on unreadable files, empty geometry, or
    /// out-of-range indices so the renderer never has to check.
    pub fn load(path: &Path) -> Result<Self> {
        let (models, materials_result) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .with_context(|| format!("failed to load {}", path.display()))?;

        let materials: Vec<Material> = match materials_result {
            Ok(mats) => mats
                .into_iter()
                .map(|m| Material {
                    name: m.name,
                    diffuse: m.diffuse.map_or(Vec3::ONE, Vec3::from_array),
                })
                .collect(),
            Err(e) => {
                warn!("material library for {} not usable: {e}", path.display());
                Vec::new()
            }
        };

        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for model in models {
            let mesh = model.mesh;
            let base = vertices.len();

            for pos in mesh.positions.chunks_exact(3) {
                vertices.push(Vertex {
                    pos: Vec3::new(pos[0], pos[1], pos[2]),
                });
            }

            let material = match mesh.material_id {
                Some(id) if id < materials.len() => Some(id),
                Some(id) => {
                    warn!("model {} references missing material {id}", model.name);
                    None
                }
                None => None,
            };

            for tri in mesh.indices.chunks_exact(3) {
                let idx = [
                    base + tri[0] as usize,
                    base + tri[1] as usize,
                    base + tri[2] as usize,
                ];
                if idx.iter().any(|&i| i >= vertices.len()) {
                    bail!(
                        "{}: face references vertex out of range in model {}",
                        path.display(),
                        model.name
                    );
                }
                faces.push((idx[0], idx[1], idx[2], material));
            }
        }

        if vertices.is_empty() || faces.is_empty() {
            bail!("{}: no renderable geometry", path.display());
        }

        let obj = Self::new(vertices, faces, materials);
        info!(
            "loaded {}: {} vertices, {} faces, {} materials",
            path.display(),
            obj.vertices.len(),
            obj.faces.len(),
            obj.materials.len()
        );
        Ok(obj)
    }

    fn recompute_normals(&mut self) {
        for face in &mut self.faces {
            face.normal = face_normal(&self.vertices, face.indices);
        }
    }

    /// Recenter on the bounding-box center and rescale uniformly so the
    /// longest bounding-box axis has length exactly 1.
    pub fn normalize(&mut self) {
        let Some(first) = self.vertices.first() else {
            return;
        };
        let mut min = first.pos;
        let mut max = first.pos;
        for v in &self.vertices {
            min = min.min(v.pos);
            max = max.max(v.pos);
        }

        let center = (min + max) * 0.5;
        let longest = (max - min).max_element();
        let scale = if longest > 0.0 { 1.0 / longest } else { 1.0 };

        for v in &mut self.vertices {
            v.pos = (v.pos - center) * scale;
        }
    }

    /// Uniform scale about the origin. Normals are unaffected.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            v.pos *= factor;
        }
    }

    /// Mirror along the X axis. Mirroring flips the winding orientation,
    /// so the recomputed normals point inward until `flip_faces` is also
    /// applied; an odd number of inversions needs that compensation.
    pub fn invert_x(&mut self) {
        for v in &mut self.vertices {
            v.pos.x = -v.pos.x;
        }
        self.recompute_normals();
    }

    /// Mirror along the Y axis. Same winding caveat as `invert_x`.
    pub fn invert_y(&mut self) {
        for v in &mut self.vertices {
            v.pos.y = -v.pos.y;
        }
        self.recompute_normals();
    }

    /// Mirror along the Z axis. Same winding caveat as `invert_x`.
    pub fn invert_z(&mut self) {
        for v in &mut self.vertices {
            v.pos.z = -v.pos.z;
        }
        self.recompute_normals();
    }

    /// Reverse the winding order of every face, flipping its normal.
    pub fn flip_faces(&mut self) {
        for face in &mut self.faces {
            face.indices.swap(0, 2);
            face.normal = -face.normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    /// Axis-aligned cuboid with outward-facing (counter-clockwise) winding.
    fn cuboid(extent: Vec3) -> Object {
        let h = extent * 0.5;
        let corners = [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let vertices = corners.iter().map(|&pos| Vertex { pos }).collect();
        let quads: [[usize; 4]; 6] = [
            [5, 4, 7, 6], // +z
            [0, 1, 2, 3], // -z
            [1, 5, 6, 2], // +x
            [4, 0, 3, 7], // -x
            [3, 2, 6, 7], // +y
            [4, 5, 1, 0], // -y
        ];
        let mut faces = Vec::new();
        for q in quads {
            faces.push((q[0], q[1], q[2], Some(0)));
            faces.push((q[0], q[2], q[3], Some(0)));
        }
        Object::new(
            vertices,
            faces,
            vec![Material {
                name: "gray".into(),
                diffuse: Vec3::splat(0.8),
            }],
        )
    }

    fn unit_cube() -> Object {
        cuboid(Vec3::ONE)
    }

    fn bounding_box(obj: &Object) -> (Vec3, Vec3) {
        let mut min = obj.vertices[0].pos;
        let mut max = obj.vertices[0].pos;
        for v in &obj.vertices {
            min = min.min(v.pos);
            max = max.max(v.pos);
        }
        (min, max)
    }

    #[test]
    fn cube_normals_face_outward() {
        let cube = unit_cube();
        for face in &cube.faces {
            let centroid = face
                .indices
                .iter()
                .map(|&i| cube.vertices[i].pos)
                .sum::<Vec3>()
                / 3.0;
            // For a convex solid centered at the origin, outward normals
            // agree with the centroid direction.
            assert!(
                face.normal.dot(centroid) > 0.0,
                "inward normal {:?} at {:?}",
                face.normal,
                centroid
            );
            assert!((face.normal.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn normalize_fits_the_unit_cube() {
        let mut obj = cuboid(Vec3::new(4.0, 2.0, 1.0));
        obj.scale(3.7);
        for v in &mut obj.vertices {
            v.pos += Vec3::new(10.0, -4.0, 2.5);
        }

        obj.normalize();

        let (min, max) = bounding_box(&obj);
        let extent = max - min;
        assert!((extent.max_element() - 1.0).abs() < EPS);
        assert!(((min + max) * 0.5).length() < EPS);
    }

    #[test]
    fn normalize_handles_a_degenerate_mesh() {
        let mut obj = Object::new(
            vec![Vertex { pos: Vec3::ONE }; 3],
            vec![(0, 1, 2, None)],
            Vec::new(),
        );
        obj.normalize();
        assert!(obj.vertices[0].pos.length() < EPS);
    }

    #[test]
    fn scale_is_uniform() {
        let mut obj = unit_cube();
        obj.scale(3.0);
        let (min, max) = bounding_box(&obj);
        assert!(((max - min) - Vec3::splat(3.0)).length() < EPS);
    }

    #[test]
    fn invert_twice_is_identity() {
        let original = unit_cube();
        let inversions: [fn(&mut Object); 3] =
            [Object::invert_x, Object::invert_y, Object::invert_z];
        for invert in inversions {
            let mut obj = original.clone();
            invert(&mut obj);
            invert(&mut obj);
            for (a, b) in obj.vertices.iter().zip(&original.vertices) {
                assert!((a.pos - b.pos).length() < EPS);
            }
            for (a, b) in obj.faces.iter().zip(&original.faces) {
                assert!((a.normal - b.normal).length() < EPS);
            }
        }
    }

    #[test]
    fn invert_then_flip_restores_outward_normals() {
        let mut obj = unit_cube();
        obj.invert_x();
        // Mirrored winding: normals now point inward.
        for face in &obj.faces {
            let centroid = face
                .indices
                .iter()
                .map(|&i| obj.vertices[i].pos)
                .sum::<Vec3>()
                / 3.0;
            assert!(face.normal.dot(centroid) < 0.0);
        }
        obj.flip_faces();
        for face in &obj.faces {
            let centroid = face
                .indices
                .iter()
                .map(|&i| obj.vertices[i].pos)
                .sum::<Vec3>()
                / 3.0;
            assert!(face.normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn flip_twice_is_identity() {
        let original = unit_cube();
        let mut obj = original.clone();
        obj.flip_faces();
        obj.flip_faces();
        for (a, b) in obj.faces.iter().zip(&original.faces) {
            assert_eq!(a.indices, b.indices);
            assert!((a.normal - b.normal).length() < EPS);
        }
    }

    #[test]
    fn degenerate_face_gets_a_zero_normal() {
        let obj = Object::new(
            vec![
                Vertex { pos: Vec3::ZERO },
                Vertex { pos: Vec3::X },
                Vertex { pos: Vec3::X * 2.0 },
            ],
            vec![(0, 1, 2, None)],
            Vec::new(),
        );
        assert_eq!(obj.faces[0].normal, Vec3::ZERO);
    }

    #[test]
    fn load_rejects_missing_files() {
        assert!(Object::load(Path::new("/no/such/model.obj")).is_err());
    }
}
