//! Smooth per-vertex normals for the displaced terrain.

use crate::error::{TerrainError, TerrainResult};

/// Epsilon for near-zero length checks (appropriate for f32 precision)
const NORMAL_EPSILON: f32 = 1e-6;

/// Compute area-weighted vertex normals.
///
/// Each face contributes its raw cross product `(v2 - v1) x (v3 - v1)`, so
/// larger triangles pull harder on the shared vertex. The per-vertex sum is
/// divided by the incident face count and then normalized. A sum that
/// cancels out becomes the zero vector instead of NaN.
pub fn compute_normals(
    vertices: &[[f32; 3]],
    faces: &[[u32; 3]],
) -> TerrainResult<Vec<[f32; 3]>> {
    let vertex_count = vertices.len();
    let mut sums = vec![[0.0f32; 3]; vertex_count];
    let mut incident = vec![0u32; vertex_count];

    for (face_idx, face) in faces.iter().enumerate() {
        for &index in face {
            if index as usize >= vertex_count {
                return Err(TerrainError::FaceIndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }

        let normal = face_normal(
            vertices[face[0] as usize],
            vertices[face[1] as usize],
            vertices[face[2] as usize],
        );

        for &index in face {
            let acc = &mut sums[index as usize];
            acc[0] += normal[0];
            acc[1] += normal[1];
            acc[2] += normal[2];
            incident[index as usize] += 1;
        }
    }

    sums.iter()
        .zip(&incident)
        .enumerate()
        .map(|(vertex_idx, (sum, &count))| {
            if count == 0 {
                return Err(TerrainError::DegenerateVertex(vertex_idx));
            }
            let count = count as f32;
            Ok(normalize([sum[0] / count, sum[1] / count, sum[2] / count]))
        })
        .collect()
}

/// Unnormalized face normal; its length is twice the triangle area.
pub fn face_normal(v1: [f32; 3], v2: [f32; 3], v3: [f32; 3]) -> [f32; 3] {
    let edge1 = [v2[0] - v1[0], v2[1] - v1[1], v2[2] - v1[2]];
    let edge2 = [v3[0] - v1[0], v3[1] - v1[1], v3[2] - v1[2]];
    cross(edge1, edge2)
}

// Vector math helpers
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len > NORMAL_EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}
