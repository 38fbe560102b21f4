//! Diamond-square terrain generation.
//!
//! Builds a regular grid, displaces it with a breadth-first diamond-square
//! pass, and derives per-vertex normals and elevation-band colors ready for
//! a renderer to upload.

pub mod color_map;
pub mod debug_log;
pub mod diamond_square;
pub mod error;
pub mod height_source;
pub mod mesh_export;
pub mod normals;
pub mod terrain;
pub mod terrain_grid;
pub mod terrain_worker;
pub mod work_queue;

pub use color_map::{classify, ElevationBand};
pub use diamond_square::{synthesize, synthesize_with, SynthesisParams};
pub use error::{TerrainError, TerrainResult};
pub use height_source::{HeightSource, SeededHeights};
pub use normals::compute_normals;
pub use terrain::{
    generate_from_config, generate_seeded, generate_terrain, TerrainConfig, TerrainMesh,
};
pub use terrain_grid::{build_grid, GridBounds, Lattice, TerrainGrid};
pub use terrain_worker::{generate_batch, TerrainWorkerPool};
