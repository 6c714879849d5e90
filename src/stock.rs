//! Common surface over the two stock representations.
//!
//! The cutting engine and the extractors are written once against this
//! trait. A voxel grid exposes its occupancy as pseudo-distances of
//! `±h/2`, which makes marching-cubes interpolation land on edge midpoints
//! identically and lets dual contouring degrade to centroid placement on
//! boolean data.

use glam::Vec3;

use crate::error::Result;
use crate::geometry::GridDims;
use crate::sweep;
use crate::tool::{Tool, ToolPose};

/// A dense, exclusively-owned block of stock material.
pub trait Stock {
  /// Grid dimensions and index mapping.
  fn dims(&self) -> &GridDims;

  /// Scalar sample at the center of cell `(i, j, k)`; negative means
  /// material. Indices outside the grid read as air (`+h/2`), giving the
  /// extractors a closed one-cell apron.
  fn sample(&self, i: i64, j: i64, k: i64) -> f32;

  /// True until the first cut modifies the grid. Pristine stock extracts
  /// as the analytic stock box.
  fn is_pristine(&self) -> bool;

  /// Number of cells still holding material.
  fn count_material(&self) -> u64;

  /// Restore the grid to full stock.
  fn reset(&mut self);

  /// Clear every cell whose center lies within `radius` of `center`
  /// (closed: a center exactly on the surface is removed).
  fn remove_sphere(&mut self, center: Vec3, radius: f32);

  /// Clear every cell whose center projects onto segment `ab` with
  /// parameter in `[0, 1]` at perpendicular distance `<= radius`. Flat
  /// caps; compose with `remove_sphere` at the endpoints for round caps.
  fn remove_cylinder(&mut self, a: Vec3, b: Vec3, radius: f32);

  /// Subtract one static cutter pose.
  fn stamp(&mut self, tool: &Tool, pose: &ToolPose);

  /// 3-axis linear cut from `a` to `b` with the tool axis fixed at
  /// `(0, 0, 1)`.
  fn cut_linear(&mut self, tool: &Tool, a: Vec3, b: Vec3) -> Result<()>
  where
    Self: Sized,
  {
    sweep::linear(self, tool, a, b, Vec3::Z, Vec3::Z, None)
  }

  /// 5-axis linear cut: position lerps `a -> b` while the tool axis slerps
  /// `axis_a -> axis_b`. `steps` of `None` derives sub-voxel stepping from
  /// the motion length.
  fn cut_linear_oriented(
    &mut self,
    tool: &Tool,
    a: Vec3,
    b: Vec3,
    axis_a: Vec3,
    axis_b: Vec3,
    steps: Option<usize>,
  ) -> Result<()>
  where
    Self: Sized,
  {
    sweep::linear(self, tool, a, b, axis_a, axis_b, steps)
  }

  /// Circular-interpolation cut: XY arc about `center` from `a` to `b`
  /// with linear Z, tool axis fixed at `(0, 0, 1)`.
  fn cut_arc(&mut self, tool: &Tool, a: Vec3, b: Vec3, center: Vec3, clockwise: bool) -> Result<()>
  where
    Self: Sized,
  {
    sweep::arc(self, tool, a, b, center, clockwise)
  }
}
