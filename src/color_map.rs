//! Elevation band coloring.
//!
//! Bands are relative to the terrain's maximum height and checked from the
//! top down; the first match wins.

/// Fraction of the max height at or above which a vertex is snow.
pub const PEAK_THRESHOLD: f32 = 0.9;
/// Fraction of the max height at or above which a vertex is bare rock.
pub const ROCK_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElevationBand {
    Peak,
    Rock,
    Grass,
}

impl ElevationBand {
    pub fn color(self) -> [f32; 4] {
        match self {
            ElevationBand::Peak => [1.0, 1.0, 1.0, 1.0], // White
            ElevationBand::Rock => [0.25, 0.25, 0.2, 1.0], // Brown
            ElevationBand::Grass => [0.1328125, 0.6, 0.2, 1.0], // Green
        }
    }
}

/// Band for height `z` given the terrain maximum.
///
/// A non-positive `max_height` is not special-cased: every `z >= 0` then
/// lands in `Peak`.
pub fn classify_band(z: f32, max_height: f32) -> ElevationBand {
    if z >= PEAK_THRESHOLD * max_height {
        ElevationBand::Peak
    } else if z >= ROCK_THRESHOLD * max_height {
        ElevationBand::Rock
    } else {
        ElevationBand::Grass
    }
}

pub fn classify(z: f32, max_height: f32) -> [f32; 4] {
    classify_band(z, max_height).color()
}

/// RGBA per vertex, in vertex order.
pub fn color_vertices(vertices: &[[f32; 3]], max_height: f32) -> Vec<[f32; 4]> {
    vertices.iter().map(|v| classify(v[2], max_height)).collect()
}

/// Vertex counts per elevation band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BandHistogram {
    pub peak: usize,
    pub rock: usize,
    pub grass: usize,
}

impl BandHistogram {
    pub fn total(&self) -> usize {
        self.peak + self.rock + self.grass
    }
}

pub fn band_histogram(vertices: &[[f32; 3]], max_height: f32) -> BandHistogram {
    let mut histogram = BandHistogram::default();
    for v in vertices {
        match classify_band(v[2], max_height) {
            ElevationBand::Peak => histogram.peak += 1,
            ElevationBand::Rock => histogram.rock += 1,
            ElevationBand::Grass => histogram.grass += 1,
        }
    }
    histogram
}
