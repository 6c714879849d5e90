//! Error kinds for stock construction and debug sampling.
//!
//! Cutting operations never fail on geometry: motions, tools, and cells
//! outside the grid are silently clipped. Bad input at construction fails
//! fast, and construction is atomic (no partial state on failure).

use thiserror::Error;

/// Errors from stock simulation operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MillError {
  /// Stock bounds are inverted or non-finite.
  #[error("invalid stock bounds: min {min:?} must be <= max {max:?} and finite")]
  InvalidBounds { min: [f32; 3], max: [f32; 3] },

  /// Voxel edge length is non-positive, non-finite, or yields a zero-cell grid.
  #[error("invalid resolution: voxel edge {0} mm")]
  InvalidResolution(f32),

  /// Cutter with non-positive diameter, length, or corner radius.
  #[error("invalid tool: {0}")]
  InvalidTool(String),

  /// Requested grid allocation exceeds the caller-configured cell cap.
  #[error("grid of {cells} cells exceeds the configured cap of {cap}")]
  ResolutionTooFine { cells: u64, cap: u64 },

  /// Debug-mode sampling outside the grid.
  #[error("grid index ({0}, {1}, {2}) out of bounds")]
  OutOfBounds(usize, usize, usize),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MillError>;
