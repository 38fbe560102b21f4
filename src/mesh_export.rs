//! GPU-side preparation for a generated terrain.
//!
//! The generator emits faces in row-major cell order. Renderers that upload
//! the index buffer once can reorder triangles for the post-transform vertex
//! cache with meshopt; the triangle set and winding are unchanged.

use crate::debug_log::debug_log;
use crate::terrain::TerrainMesh;

/// Index buffer reordered for vertex cache locality.
pub fn optimized_index_buffer(mesh: &TerrainMesh) -> Vec<u32> {
    let indices = mesh.index_buffer();
    if indices.is_empty() {
        return indices;
    }

    let optimized = meshopt::optimize_vertex_cache(&indices, mesh.vertex_count());

    if cfg!(debug_assertions) {
        debug_log(&format!(
            "[optimized_index_buffer] Reordered {} tris over {} verts",
            optimized.len() / 3,
            mesh.vertex_count()
        ));
    }

    optimized
}

/// Replace `mesh.faces` with the cache-optimized order.
pub fn optimize_face_order(mesh: &mut TerrainMesh) {
    let optimized = optimized_index_buffer(mesh);
    mesh.faces = optimized
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect();
}
