//! Tangent-space derivation
//!
//! Per-triangle accumulation of tangent and bitangent directions from
//! positions, UV slot 0 and normals (Lengyel's method), followed by a
//! per-vertex Gram-Schmidt orthogonalization against the normal. The
//! bitangent collapses to a ±1 handedness sign; the full vector is
//! reconstructed at serialization time as `sign * (normal × tangent)`.

use glam::Vec3;
use tracing::debug;

use crate::mesh::MeshData;

/// UV-area determinant below this is treated as degenerate
const DEGENERATE_UV_EPSILON: f32 = 1e-12;

/// Compute per-vertex tangents and handedness signs for `mesh`.
///
/// Requires populated normals and UV slot 0; a no-op otherwise (the
/// tangent/bitangent attribute flags stay unset).
pub fn compute(mesh: &mut MeshData) {
    if !mesh.attributes.texcoord[0] || !mesh.attributes.normal {
        debug!("skipping tangent generation: no UV slot 0 or no normals");
        return;
    }

    mesh.attributes.tangent = true;
    mesh.attributes.bitangent = true;

    let mut tangent_sum = vec![Vec3::ZERO; mesh.vertices.len()];
    let mut bitangent_sum = vec![Vec3::ZERO; mesh.vertices.len()];

    let mut degenerate = 0usize;
    for triangle in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        let (v0, v1, v2) = (&mesh.vertices[i0], &mesh.vertices[i1], &mesh.vertices[i2]);

        let e1 = v1.position - v0.position;
        let e2 = v2.position - v0.position;
        let duv1 = v1.texcoord[0] - v0.texcoord[0];
        let duv2 = v2.texcoord[0] - v0.texcoord[0];

        // 2x2 system: e1 = duv1.x*T + duv1.y*B, e2 = duv2.x*T + duv2.y*B.
        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < DEGENERATE_UV_EPSILON {
            // Zero UV area; accumulating would inject NaN.
            degenerate += 1;
            continue;
        }
        let r = 1.0 / det;
        let mut tangent = (e1 * duv2.y - e2 * duv1.y) * r;
        let mut bitangent = (e2 * duv1.x - e1 * duv2.x) * r;

        // Keep the triangle's basis on the same side as its surface.
        if e2.cross(e1).dot(bitangent.cross(tangent)) < 0.0 {
            tangent = -tangent;
            bitangent = -bitangent;
        }

        for &index in &[i0, i1, i2] {
            tangent_sum[index] += tangent;
            bitangent_sum[index] += bitangent;
        }
    }

    if degenerate > 0 {
        debug!(triangles = degenerate, "skipped degenerate UV triangles");
    }

    for (vertex, (tangent, bitangent)) in mesh
        .vertices
        .iter_mut()
        .zip(tangent_sum.into_iter().zip(bitangent_sum))
    {
        let normal = vertex.normal;
        // Gram-Schmidt against the normal.
        let orthogonal = tangent - normal * tangent.dot(normal);
        vertex.tangent = orthogonal.normalize_or_zero();
        vertex.bitangent_sign = if normal.cross(vertex.tangent).dot(bitangent) >= 0.0 {
            1.0
        } else {
            -1.0
        };
    }
}
