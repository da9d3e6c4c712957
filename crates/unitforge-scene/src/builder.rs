//! Mesh building
//!
//! Merges the host's per-face corner attributes into a dense per-vertex
//! buffer. Shared vertices are written in face order and the last face
//! processed wins; vertices are never split per unique corner attribute
//! combination. This is intentionally lossy and order-dependent for
//! output compatibility with the engine's existing pipeline.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use tracing::debug;

use unitforge_core::ExportOptions;

use crate::document::{Face, Geometry};
use crate::mesh::{Material, MeshData, Vertex, DEFAULT_SHADER, MAX_LAYERS};
use crate::{tangent, weights};

/// Build a normalized mesh from host geometry.
///
/// Returns `None` when the geometry has no faces; the caller downgrades
/// such an object to an empty node. Malformed faces (fewer than three
/// corners, or corners referencing missing vertices) are skipped without
/// aborting the export.
pub fn build_mesh(geometry: &Geometry, options: &ExportOptions) -> Option<MeshData> {
    if geometry.faces.is_empty() {
        return None;
    }

    let mut mesh = MeshData {
        materials: build_materials(geometry),
        vertices: geometry
            .positions
            .iter()
            .map(|&p| Vertex::new(Vec3::from_array(p)))
            .collect(),
        ..Default::default()
    };
    mesh.attributes.position = true;
    if options.export_normals {
        mesh.attributes.normal = true;
    }

    let mut skipped = 0usize;
    for face in &geometry.faces {
        let corners: SmallVec<[usize; 4]> = face.corners.iter().map(|&i| i as usize).collect();
        if corners.len() < 3 || corners.iter().any(|&i| i >= mesh.vertices.len()) {
            skipped += 1;
            continue;
        }

        // Flat shading: every corner takes this face's normal, and a later
        // face sharing the vertex overwrites it.
        if options.export_normals {
            let normal = face_normal(&corners, &mesh.vertices);
            for &corner in &corners {
                mesh.vertices[corner].normal = normal;
            }
        }

        if options.export_colors {
            merge_colors(&mut mesh, face, &corners);
        }
        if options.export_texcoords {
            merge_texcoords(&mut mesh, face, &corners);
        }

        emit_triangles(&mut mesh.indices, &corners);
    }
    if skipped > 0 {
        debug!(faces = skipped, "skipped malformed faces");
    }

    for (index, def) in geometry.weights.iter().enumerate() {
        if index >= mesh.vertices.len() {
            break;
        }
        if !def.bones.is_empty() && !def.weights.is_empty() {
            mesh.vertices[index].bones = Some(weights::normalize(
                &def.bones,
                &def.weights,
                options.max_bone_influences,
            ));
        }
    }

    if options.export_tangents {
        tangent::compute(&mut mesh);
    }

    Some(mesh)
}

fn build_materials(geometry: &Geometry) -> Vec<Material> {
    geometry
        .materials
        .iter()
        .map(|def| Material {
            name: def.name.clone(),
            shader: def
                .shader
                .clone()
                .unwrap_or_else(|| DEFAULT_SHADER.to_string()),
            textures: def.textures.clone(),
        })
        .collect()
}

/// Polygon normal via Newell's method; robust for quads that are not
/// perfectly planar.
fn face_normal(corners: &[usize], vertices: &[Vertex]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, &corner) in corners.iter().enumerate() {
        let current = vertices[corner].position;
        let next = vertices[corners[(i + 1) % corners.len()]].position;
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.normalize_or_zero()
}

fn merge_colors(mesh: &mut MeshData, face: &Face, corners: &[usize]) {
    for (layer, corner_colors) in face.colors.iter().enumerate() {
        if layer >= MAX_LAYERS || corner_colors.len() < corners.len() {
            debug!(layer, "skipping malformed color layer");
            continue;
        }
        mesh.attributes.color[layer] = true;
        for (&corner, &color) in corners.iter().zip(corner_colors.iter()) {
            mesh.vertices[corner].color[layer] = Vec3::from_array(color);
        }
    }
}

fn merge_texcoords(mesh: &mut MeshData, face: &Face, corners: &[usize]) {
    for layer in &face.uvs {
        if layer.slot >= MAX_LAYERS || layer.corners.len() < corners.len() {
            debug!(slot = layer.slot, "skipping malformed UV layer");
            continue;
        }
        mesh.attributes.texcoord[layer.slot] = true;
        for (&corner, &uv) in corners.iter().zip(layer.corners.iter()) {
            mesh.vertices[corner].texcoord[layer.slot] = Vec2::from_array(uv);
        }
    }
}

/// Triangulation contract: a triangle is emitted as (0,1,2); a quad splits
/// along the (0,2) diagonal into (0,1,2) and (0,2,3). Corner order is
/// preserved, so both triangles lie on the same normal side as the source
/// polygon. Larger polygons fan around corner 0 under the same rule.
fn emit_triangles(indices: &mut Vec<u32>, corners: &[usize]) {
    for i in 1..corners.len() - 1 {
        indices.push(corners[0] as u32);
        indices.push(corners[i] as u32);
        indices.push(corners[i + 1] as u32);
    }
}
