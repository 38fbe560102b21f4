//! Terrain pipeline: grid -> diamond-square heights -> normals -> colors.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color_map::{band_histogram, color_vertices};
use crate::debug_log::{compute_height_stats, compute_normal_stats, debug_log};
use crate::diamond_square::{
    is_valid_resolution, synthesize_with, SynthesisParams, DEFAULT_INITIAL_SCALE,
    DEFAULT_SCALE_FACTOR,
};
use crate::error::{TerrainError, TerrainResult};
use crate::height_source::{HeightSource, SeededHeights};
use crate::normals::compute_normals;
use crate::terrain_grid::{build_grid, GridBounds};

/// Default subdivisions per side.
pub const DEFAULT_RESOLUTION: u32 = 64;

/// Generation settings. Missing TOML keys fall back to `Default`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Subdivisions per side; must be a power of two
    pub resolution: u32,
    /// Divisor for the corner seeds
    pub initial_scale: f32,
    /// Per-level growth of the displacement divisor (> 1 smooths finer levels)
    pub scale_factor: f32,
    /// Kept last so it serializes as a trailing `[bounds]` table
    pub bounds: GridBounds,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            initial_scale: DEFAULT_INITIAL_SCALE,
            scale_factor: DEFAULT_SCALE_FACTOR,
            bounds: GridBounds::default(),
        }
    }
}

impl TerrainConfig {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_bounds(mut self, bounds: GridBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn synthesis_params(&self) -> SynthesisParams {
        SynthesisParams {
            initial_scale: self.initial_scale,
            scale_factor: self.scale_factor,
        }
    }

    pub fn validate(&self) -> TerrainResult<()> {
        if !is_valid_resolution(self.resolution) {
            return Err(TerrainError::InvalidGridSize(self.resolution));
        }
        self.synthesis_params().validate()
    }

    pub fn from_toml_str(contents: &str) -> TerrainResult<Self> {
        let config: TerrainConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> TerrainResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            debug_log(&format!(
                "[TerrainConfig] Failed to load config: {}, using defaults",
                e
            ));
            Self::default()
        })
    }
}

/// Everything a renderer needs to draw one terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    pub resolution: u32,
    pub bounds: GridBounds,
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub max_height: f32,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Flat `x, y, z` floats for a position buffer upload.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices.iter().flatten().copied().collect()
    }

    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flatten().copied().collect()
    }

    pub fn color_buffer(&self) -> Vec<f32> {
        self.colors.iter().flatten().copied().collect()
    }

    pub fn index_buffer(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}

/// Generate a terrain with default synthesis parameters.
pub fn generate_terrain<R>(
    resolution: u32,
    bounds: GridBounds,
    rng: &mut R,
) -> TerrainResult<TerrainMesh>
where
    R: HeightSource + ?Sized,
{
    let config = TerrainConfig::default()
        .with_resolution(resolution)
        .with_bounds(bounds);
    generate_from_config(&config, rng)
}

pub fn generate_from_config<R>(config: &TerrainConfig, rng: &mut R) -> TerrainResult<TerrainMesh>
where
    R: HeightSource + ?Sized,
{
    config.validate()?;

    let mut grid = build_grid(config.resolution, config.bounds)?;
    let max_height = synthesize_with(&mut grid, rng, config.synthesis_params())?;
    let normals = compute_normals(&grid.vertices, &grid.faces)?;
    let colors = color_vertices(&grid.vertices, max_height);

    debug_log(&format!(
        "[generate_terrain] n={}: verts={}, tris={}, max_height={:.4}",
        config.resolution,
        grid.vertex_count(),
        grid.triangle_count(),
        max_height
    ));

    if cfg!(debug_assertions) {
        let heights = compute_height_stats(&grid.vertices);
        let normal_stats = compute_normal_stats(&normals);
        let bands = band_histogram(&grid.vertices, max_height);
        debug_log(&format!(
            "[generate_terrain]   heights: min={:.4}, mean={:.4}; normals: min_len={:.3}, max_len={:.3}, degenerate={}; bands: peak={}, rock={}, grass={}",
            heights.min,
            heights.mean,
            normal_stats.min_len,
            normal_stats.max_len,
            normal_stats.degenerate_count,
            bands.peak,
            bands.rock,
            bands.grass
        ));
    }

    Ok(TerrainMesh {
        resolution: config.resolution,
        bounds: config.bounds,
        vertices: grid.vertices,
        faces: grid.faces,
        normals,
        colors,
        max_height,
    })
}

/// Generate from a seed using the crate's ChaCha8 height source.
pub fn generate_seeded(config: &TerrainConfig, seed: u64) -> TerrainResult<TerrainMesh> {
    let mut rng = SeededHeights::from_seed_u64(seed);
    generate_from_config(config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_map::classify;

    fn bits3(values: &[[f32; 3]]) -> Vec<[u32; 3]> {
        values
            .iter()
            .map(|v| [v[0].to_bits(), v[1].to_bits(), v[2].to_bits()])
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = TerrainConfig::default();
        assert_eq!(config.resolution, 64);
        assert_eq!(config.scale_factor, 2.0);
        assert_eq!(config.initial_scale, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = TerrainConfig::default().with_resolution(128);
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("resolution = 128"));
        assert!(toml_str.contains("scale_factor"));

        let parsed = TerrainConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TerrainConfig::from_toml_str("resolution = 16\n").unwrap();
        assert_eq!(config.resolution, 16);
        assert_eq!(config.bounds, GridBounds::default());
        assert_eq!(config.scale_factor, DEFAULT_SCALE_FACTOR);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        assert!(matches!(
            TerrainConfig::from_toml_str("resolution = 12\n"),
            Err(TerrainError::InvalidGridSize(12))
        ));
        assert!(matches!(
            TerrainConfig::from_toml_str("scale_factor = 1.0\n"),
            Err(TerrainError::InvalidConfig(_))
        ));
        assert!(matches!(
            TerrainConfig::from_toml_str("initial_scale = 0.0\n"),
            Err(TerrainError::InvalidConfig(_))
        ));
        assert!(matches!(
            TerrainConfig::from_toml_str("resolution = 65536\n"),
            Err(TerrainError::InvalidGridSize(65536))
        ));
        assert!(matches!(
            TerrainConfig::from_toml_str("resolution = \"big\"\n"),
            Err(TerrainError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.toml");
        std::fs::write(
            &path,
            "resolution = 8\n\n[bounds]\nmin_x = 0.0\nmax_x = 4.0\nmin_y = 0.0\nmax_y = 2.0\n",
        )
        .unwrap();

        let config = TerrainConfig::load(&path).unwrap();
        assert_eq!(config.resolution, 8);
        assert_eq!(config.bounds, GridBounds::new(0.0, 4.0, 0.0, 2.0));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TerrainConfig::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config, TerrainConfig::default());
    }

    #[test]
    fn test_generate_terrain_shapes() {
        let mut rng = SeededHeights::from_seed_u64(11);
        let mesh = generate_terrain(16, GridBounds::default(), &mut rng).unwrap();

        assert_eq!(mesh.vertex_count(), 17 * 17);
        assert_eq!(mesh.triangle_count(), 2 * 16 * 16);
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert_eq!(mesh.colors.len(), mesh.vertex_count());

        let scanned = mesh
            .vertices
            .iter()
            .map(|v| v[2])
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(mesh.max_height, scanned);
    }

    #[test]
    fn test_colors_follow_heights() {
        let mesh = generate_seeded(&TerrainConfig::default().with_resolution(8), 5).unwrap();
        for (v, c) in mesh.vertices.iter().zip(&mesh.colors) {
            assert_eq!(*c, classify(v[2], mesh.max_height));
        }
    }

    #[test]
    fn test_same_seed_bit_identical() {
        let config = TerrainConfig::default().with_resolution(32);
        let a = generate_seeded(&config, 2024).unwrap();
        let b = generate_seeded(&config, 2024).unwrap();

        assert_eq!(bits3(&a.vertices), bits3(&b.vertices));
        assert_eq!(bits3(&a.normals), bits3(&b.normals));
        assert_eq!(a.colors, b.colors);
        assert_eq!(a.max_height.to_bits(), b.max_height.to_bits());
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = TerrainConfig::default().with_resolution(8);
        let a = generate_seeded(&config, 1).unwrap();
        let b = generate_seeded(&config, 2).unwrap();
        assert_ne!(a.vertices, b.vertices);
    }

    #[test]
    fn test_invalid_resolution_fails_fast() {
        let mut draws = 0usize;
        let mut rng = || {
            draws += 1;
            0.5f32
        };
        let result = generate_terrain(6, GridBounds::default(), &mut rng);
        assert!(matches!(result, Err(TerrainError::InvalidGridSize(6))));
        assert_eq!(draws, 0);

        let result = generate_terrain(0, GridBounds::default(), &mut || 0.5f32);
        assert!(matches!(result, Err(TerrainError::InvalidGridSize(0))));
    }

    #[test]
    fn test_flat_buffers() {
        let mut rng = || 0.5f32;
        let mesh = generate_terrain(2, GridBounds::default(), &mut rng).unwrap();

        let positions = mesh.position_buffer();
        assert_eq!(positions.len(), 9 * 3);
        assert_eq!(&positions[0..3], &[-1.0, -1.0, 0.5]);

        assert_eq!(mesh.normal_buffer().len(), 9 * 3);
        assert_eq!(mesh.color_buffer().len(), 9 * 4);

        let indices = mesh.index_buffer();
        assert_eq!(indices.len(), 8 * 3);
        assert_eq!(&indices[0..6], &[0, 1, 3, 1, 4, 3]);
    }
}
