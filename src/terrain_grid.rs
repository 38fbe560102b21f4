//! Flat terrain lattice: vertex positions, triangle faces, and the
//! `(row, col)` addressing used by every pass that touches the buffers.
//!
//! Vertices are stored row-major. Row `r` runs along +Y, column `c` along +X.

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};

/// Largest resolution whose vertex indices all fit in a `u32` face index:
/// `(n + 1)^2 - 1 <= u32::MAX`.
pub const MAX_RESOLUTION: u32 = 65_535;

/// Rectangular XY domain covered by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl GridBounds {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(-1.0, 1.0, -1.0, 1.0)
    }
}

/// `(row, col) -> index` accessor for an (n+1)x(n+1) lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lattice {
    /// Subdivisions per side
    resolution: u32,
}

impl Lattice {
    pub fn new(resolution: u32) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Vertices per row (n + 1)
    pub fn side(&self) -> usize {
        self.resolution as usize + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.side() * self.side()
    }

    pub fn face_count(&self) -> usize {
        2 * self.resolution as usize * self.resolution as usize
    }

    pub fn index(&self, row: u32, col: u32) -> usize {
        debug_assert!(row <= self.resolution && col <= self.resolution);
        row as usize * self.side() + col as usize
    }

    /// Signed bounds test for neighbours that may lie past the edge.
    pub fn contains(&self, row: i64, col: i64) -> bool {
        let n = self.resolution as i64;
        (0..=n).contains(&row) && (0..=n).contains(&col)
    }

    /// Index for a signed coordinate, or `None` when it falls outside the lattice.
    pub fn checked_index(&self, row: i64, col: i64) -> Option<usize> {
        if self.contains(row, col) {
            Some(self.index(row as u32, col as u32))
        } else {
            None
        }
    }
}

/// Vertex and face buffers for one terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainGrid {
    pub lattice: Lattice,
    pub bounds: GridBounds,
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl TerrainGrid {
    pub fn resolution(&self) -> u32 {
        self.lattice.resolution()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn height(&self, row: u32, col: u32) -> f32 {
        self.vertices[self.lattice.index(row, col)][2]
    }
}

/// Build a flat (z = 0) grid with `resolution` steps per side.
///
/// Each cell `(row, col)` is split along its top-right/bottom-left diagonal:
/// `[tl, tr, bl]` and `[tr, br, bl]`. With increasing X and Y this winding
/// gives +Z face normals.
pub fn build_grid(resolution: u32, bounds: GridBounds) -> TerrainResult<TerrainGrid> {
    if !(1..=MAX_RESOLUTION).contains(&resolution) {
        return Err(TerrainError::InvalidGridSize(resolution));
    }

    let lattice = Lattice::new(resolution);
    let n = resolution as usize;
    let side = lattice.side();
    let delta_x = (bounds.max_x - bounds.min_x) / resolution as f32;
    let delta_y = (bounds.max_y - bounds.min_y) / resolution as f32;

    let mut vertices = Vec::with_capacity(lattice.vertex_count());
    for row in 0..side {
        for col in 0..side {
            vertices.push([
                bounds.min_x + delta_x * col as f32,
                bounds.min_y + delta_y * row as f32,
                0.0,
            ]);
        }
    }

    let mut faces = Vec::with_capacity(lattice.face_count());
    for row in 0..n {
        for col in 0..n {
            let top_left = (row * side + col) as u32;
            let top_right = top_left + 1;
            let bottom_left = top_left + side as u32;
            let bottom_right = bottom_left + 1;

            faces.push([top_left, top_right, bottom_left]);
            faces.push([top_right, bottom_right, bottom_left]);
        }
    }

    Ok(TerrainGrid {
        lattice,
        bounds,
        vertices,
        faces,
    })
}
