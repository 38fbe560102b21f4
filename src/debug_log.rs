//! Debug logging infrastructure for terrain generation
//!
//! Writes to `debug_terrain.log` in the working directory once
//! `init_debug_log()` has been called; until then `debug_log` is a no-op.
//! The log file is recreated on each `init_debug_log()` call.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::normals::length;

lazy_static::lazy_static! {
    static ref DEBUG_LOG: Mutex<Option<File>> = Mutex::new(None);
}

/// Default log file name used by `init_debug_log`.
pub const DEBUG_LOG_FILE: &str = "debug_terrain.log";

/// Log a debug message to the terrain debug log file
pub fn debug_log(msg: &str) {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }
    }
}

/// Initialize the debug log file (overwrites any existing log)
pub fn init_debug_log() {
    init_debug_log_at(DEBUG_LOG_FILE);
}

pub fn init_debug_log_at<P: AsRef<Path>>(path: P) {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        *guard = File::create(path).ok();
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "=== FRACTAL TERRAIN DEBUG LOG ===");
            let _ = writeln!(file, "Timestamp: {:?}", std::time::SystemTime::now());
            let _ = writeln!(file);
        }
    }
}

/// Stop writing and release the log file.
pub fn close_debug_log() {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        *guard = None;
    }
}

/// Statistics about normals in a mesh
#[derive(Debug)]
pub struct NormalStats {
    pub min_len: f32,
    pub max_len: f32,
    pub degenerate_count: usize,
}

/// Compute statistics about normal vectors
/// A normal is considered degenerate if its length is not close to 1.0
/// (this includes the zero vector emitted for cancelled-out sums)
pub fn compute_normal_stats(normals: &[[f32; 3]]) -> NormalStats {
    let mut min_len = f32::MAX;
    let mut max_len = f32::MIN;
    let mut degenerate_count = 0;

    for n in normals {
        let len = length(*n);
        min_len = min_len.min(len);
        max_len = max_len.max(len);

        if len < 0.99 || len > 1.01 || len.is_nan() {
            degenerate_count += 1;
        }
    }

    if normals.is_empty() {
        min_len = 0.0;
        max_len = 0.0;
    }

    NormalStats {
        min_len,
        max_len,
        degenerate_count,
    }
}

/// Height distribution of a vertex buffer
#[derive(Debug, PartialEq)]
pub struct HeightStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

pub fn compute_height_stats(vertices: &[[f32; 3]]) -> HeightStats {
    if vertices.is_empty() {
        return HeightStats {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
        };
    }

    let mut min = f32::MAX;
    let mut max = f32::MIN;
    let mut sum = 0.0f64;
    for v in vertices {
        min = min.min(v[2]);
        max = max.max(v[2]);
        sum += v[2] as f64;
    }

    HeightStats {
        min,
        max,
        mean: (sum / vertices.len() as f64) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_stats_flags_zero_and_long_vectors() {
        let normals = vec![[0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
        let stats = compute_normal_stats(&normals);
        assert_eq!(stats.degenerate_count, 2);
        assert_eq!(stats.min_len, 0.0);
        assert_eq!(stats.max_len, 2.0);
    }

    #[test]
    fn test_normal_stats_empty() {
        let stats = compute_normal_stats(&[]);
        assert_eq!(stats.degenerate_count, 0);
        assert_eq!(stats.min_len, 0.0);
        assert_eq!(stats.max_len, 0.0);
    }

    #[test]
    fn test_height_stats() {
        let vertices = vec![[0.0, 0.0, -1.0], [0.0, 0.0, 3.0], [0.0, 0.0, 1.0]];
        let stats = compute_height_stats(&vertices);
        assert_eq!(
            stats,
            HeightStats {
                min: -1.0,
                max: 3.0,
                mean: 1.0
            }
        );
    }

    #[test]
    fn test_log_written_after_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.log");

        init_debug_log_at(&path);
        debug_log("[test_log_written_after_init] hello");
        close_debug_log();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("=== FRACTAL TERRAIN DEBUG LOG ==="));
        assert!(contents.contains("hello"));
    }
}
