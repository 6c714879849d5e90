//! millvox - Voxel and SDF stock simulation for subtractive CNC milling
//!
//! This crate is the material-representation and cutting core of a milling
//! simulator: a dense uniform grid over a rectangular stock (boolean
//! occupancy or a signed-distance field), swept-volume subtraction kernels
//! that model 3-axis and 5-axis tool motion, and surface extraction to a
//! watertight triangle mesh.
//!
//! # Features
//!
//! - **Two stock representations**: [`VoxelGrid`] (boolean occupancy) and
//!   [`SdfGrid`] (signed distances, negative inside material), behind one
//!   [`Stock`] trait
//! - **Swept cuts**: linear, 5-axis (position lerp + axis slerp), and
//!   XY-arc motion discretized at sub-voxel steps
//! - **Two extractors**: marching cubes (triangle soup) and dual
//!   contouring (QEF vertices, smoother at equal resolution)
//! - **Command protocol**: rapid/linear/arc toolpath commands executed by
//!   a [`Simulator`] aggregate
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use millvox::{extract, Aabb, ExtractMethod, Stock, Tool, VoxelGrid};
//!
//! // 100 mm stock cube at 0.5 mm resolution
//! let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(100.0));
//! let mut grid = VoxelGrid::new(bounds, 0.5)?;
//!
//! // Sweep a 6 mm flat mill across the top face
//! let tool = Tool::flat(6.0, 30.0);
//! grid.cut_linear(&tool, Vec3::new(-10.0, 50.0, 95.0), Vec3::new(110.0, 50.0, 95.0))?;
//!
//! // Export-ready triangle mesh
//! let mesh = extract(&grid, ExtractMethod::MarchingCubes);
//! println!("{} triangles", mesh.triangle_count());
//! ```

pub mod commands;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod mesh;
pub mod metrics;
pub mod sdf_grid;
pub mod stock;
pub mod sweep;
pub mod tool;
pub mod voxel_grid;

// Re-export commonly used items
pub use commands::{
  MachineState, Simulator, ToolpathCommand, DEFAULT_ORIENTATION_STEPS, DEFAULT_RESOLUTION,
  DEFAULT_STOCK_SIZE, DEFAULT_TOOL_AXIS,
};
pub use error::{MillError, Result};
pub use extract::{extract, ExtractMethod};
pub use geometry::{Aabb, GridDims};
pub use mesh::Mesh;
pub use sdf_grid::SdfGrid;
pub use stock::Stock;
pub use tool::{slerp_axis, Tool, ToolPose};
pub use voxel_grid::VoxelGrid;
