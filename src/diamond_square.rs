//! Diamond-square height synthesis over a `TerrainGrid`.
//!
//! Subsquares are processed breadth-first from a `WorkQueue`. Each item runs
//! the diamond step (center from its four diagonal corners) and then the
//! square step (edge midpoints from their in-bounds axis neighbours).
//! Displacement shrinks by `scale_factor` at every level.

use crate::error::{TerrainError, TerrainResult};
use crate::height_source::HeightSource;
use crate::terrain_grid::{Lattice, TerrainGrid, MAX_RESOLUTION};
use crate::work_queue::{WorkItem, WorkQueue};

/// Default divisor applied to the corner seeds.
pub const DEFAULT_INITIAL_SCALE: f32 = 1.0;
/// Default growth of the displacement divisor per subdivision level.
pub const DEFAULT_SCALE_FACTOR: f32 = 2.0;

/// Sign draws above this value displace upward, the rest downward.
const SIGN_THRESHOLD: f32 = 0.5;

/// Tunables for one synthesis run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynthesisParams {
    pub initial_scale: f32,
    pub scale_factor: f32,
}

impl SynthesisParams {
    /// Corner seeds are divided by `initial_scale`, and each level must
    /// shrink the displacement, so `scale_factor` has to exceed 1.
    pub fn validate(&self) -> TerrainResult<()> {
        if self.initial_scale.is_nan() || self.initial_scale <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "initial_scale must be positive, got {}",
                self.initial_scale
            )));
        }
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "scale_factor must be greater than 1, got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            initial_scale: DEFAULT_INITIAL_SCALE,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

/// Resolutions the recursion can halve down to 1.
pub fn is_valid_resolution(resolution: u32) -> bool {
    resolution.is_power_of_two() && resolution <= MAX_RESOLUTION
}

/// Height buffer view that tracks which vertices have been written and the
/// running maximum.
struct HeightWriter<'a> {
    lattice: Lattice,
    vertices: &'a mut [[f32; 3]],
    assigned: Vec<bool>,
    max_height: f32,
}

impl<'a> HeightWriter<'a> {
    fn new(lattice: Lattice, vertices: &'a mut [[f32; 3]]) -> Self {
        let assigned = vec![false; vertices.len()];
        Self {
            lattice,
            vertices,
            assigned,
            max_height: f32::NEG_INFINITY,
        }
    }

    fn get(&self, row: u32, col: u32) -> f32 {
        self.vertices[self.lattice.index(row, col)][2]
    }

    fn is_assigned(&self, row: u32, col: u32) -> bool {
        self.assigned[self.lattice.index(row, col)]
    }

    fn write(&mut self, row: u32, col: u32, height: f32) {
        let index = self.lattice.index(row, col);
        self.vertices[index][2] = height;
        self.assigned[index] = true;
        if height > self.max_height {
            self.max_height = height;
        }
    }

    /// Mean of the axis neighbours at `distance` that are inside the lattice
    /// and already hold a height.
    fn average_axis_neighbors(&self, row: u32, col: u32, distance: u32) -> TerrainResult<f32> {
        let (r, c, d) = (row as i64, col as i64, distance as i64);
        let mut sum = 0.0;
        let mut count = 0u32;

        for (nr, nc) in [(r - d, c), (r + d, c), (r, c + d), (r, c - d)] {
            if let Some(index) = self.lattice.checked_index(nr, nc) {
                if self.assigned[index] {
                    sum += self.vertices[index][2];
                    count += 1;
                }
            }
        }

        // The subsquare center is always written before its midpoints.
        if count == 0 {
            return Err(TerrainError::UnseededMidpoint { row, col });
        }
        Ok(sum / count as f32)
    }
}

/// Displace `grid` in place with default parameters. Returns the maximum
/// height written.
pub fn synthesize<R>(grid: &mut TerrainGrid, rng: &mut R) -> TerrainResult<f32>
where
    R: HeightSource + ?Sized,
{
    synthesize_with(grid, rng, SynthesisParams::default())
}

pub fn synthesize_with<R>(
    grid: &mut TerrainGrid,
    rng: &mut R,
    params: SynthesisParams,
) -> TerrainResult<f32>
where
    R: HeightSource + ?Sized,
{
    let lattice = grid.lattice;
    let n = lattice.resolution();
    if !is_valid_resolution(n) {
        return Err(TerrainError::InvalidGridSize(n));
    }
    if grid.vertices.len() != lattice.vertex_count() {
        return Err(TerrainError::MismatchedGrid {
            expected: lattice.vertex_count(),
            actual: grid.vertices.len(),
        });
    }
    params.validate()?;

    let mut heights = HeightWriter::new(lattice, &mut grid.vertices);
    let scale = params.initial_scale;

    for (row, col) in [(0, 0), (0, n), (n, 0), (n, n)] {
        heights.write(row, col, rng.next_unit() / scale);
    }

    if n < 2 {
        return Ok(heights.max_height);
    }

    let half = n / 2;
    let finest_level = (half as usize) * (half as usize);
    let mut queue = WorkQueue::with_capacity(finest_level);
    queue.enqueue(WorkItem::new(half, half, half, scale * params.scale_factor));

    while !queue.is_empty() {
        let item = queue.dequeue()?;

        diamond_step(&mut heights, &item, rng);
        square_step(&mut heights, &item, rng)?;

        if item.half_size >= 2 {
            let quarter = item.half_size / 2;
            let inverse_scale = item.inverse_scale * params.scale_factor;
            let (row, col) = (item.center_row, item.center_col);

            queue.enqueue(WorkItem::new(row - quarter, col - quarter, quarter, inverse_scale));
            queue.enqueue(WorkItem::new(row - quarter, col + quarter, quarter, inverse_scale));
            queue.enqueue(WorkItem::new(row + quarter, col - quarter, quarter, inverse_scale));
            queue.enqueue(WorkItem::new(row + quarter, col + quarter, quarter, inverse_scale));
        }
    }

    Ok(heights.max_height)
}

/// Center height from the four diagonal corners. All four are written by
/// the parent level (or the corner seeds), so no bounds test is needed.
fn diamond_step<R>(heights: &mut HeightWriter<'_>, item: &WorkItem, rng: &mut R)
where
    R: HeightSource + ?Sized,
{
    let (row, col, h) = (item.center_row, item.center_col, item.half_size);
    let average = (heights.get(row - h, col - h)
        + heights.get(row - h, col + h)
        + heights.get(row + h, col - h)
        + heights.get(row + h, col + h))
        / 4.0;

    heights.write(row, col, average + rng.next_unit() / item.inverse_scale);
}

/// North, south, east, west midpoints. A midpoint shared with an earlier
/// subsquare keeps its existing height and consumes no draws.
fn square_step<R>(
    heights: &mut HeightWriter<'_>,
    item: &WorkItem,
    rng: &mut R,
) -> TerrainResult<()>
where
    R: HeightSource + ?Sized,
{
    let (row, col, h) = (item.center_row, item.center_col, item.half_size);
    let midpoints = [(row - h, col), (row + h, col), (row, col + h), (row, col - h)];

    for (mid_row, mid_col) in midpoints {
        if heights.is_assigned(mid_row, mid_col) {
            continue;
        }

        let average = heights.average_axis_neighbors(mid_row, mid_col, h)?;
        let sign = if rng.next_unit() > SIGN_THRESHOLD {
            1.0
        } else {
            -1.0
        };
        let displacement = sign * rng.next_unit() / item.inverse_scale;

        heights.write(mid_row, mid_col, average + displacement);
    }
    Ok(())
}
