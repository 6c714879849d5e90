//! Swept-volume engine.
//!
//! Translates a motion segment into repeated point-sample CSG subtractions
//! on the active grid:
//!
//! 1. Bound the sweep by the union of the cutter AABB at the start and end
//!    pose, expanded by one voxel.
//! 2. Clip against the grid bounds; a sweep that misses the stock entirely
//!    returns without touching a cell.
//! 3. Discretize into `max(1, ceil(|motion| / (h * STEP_FRACTION)))`
//!    sub-poses so consecutive stamps overlap at sub-voxel spacing.
//! 4. Stamp each pose through the grid's own subtraction kernel.
//!
//! The engine never fails on out-of-bounds motion (it clips); it fails
//! with `InvalidTool` before the first stamp if the cutter dimensions are
//! bad.

use glam::Vec3;

use crate::error::Result;
use crate::geometry::clip_segment;
use crate::stock::Stock;
use crate::tool::{slerp_axis, Tool, ToolPose};

/// Fraction of a voxel edge advanced per sub-pose.
pub const STEP_FRACTION: f32 = 0.5;

/// Motions shorter than this stamp once instead of sweeping.
const ZERO_MOTION: f32 = 1.0e-6;

/// Default sub-pose count for a motion of length `motion` on a grid with
/// voxel edge `h`.
#[inline]
pub fn default_steps(motion: f32, h: f32) -> usize {
  ((motion / (h * STEP_FRACTION)).ceil() as usize).max(1)
}

/// Linear sweep with optional simultaneous axis reorientation.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "sweep::linear")
)]
pub fn linear<S: Stock + ?Sized>(
  stock: &mut S,
  tool: &Tool,
  a: Vec3,
  b: Vec3,
  axis_a: Vec3,
  axis_b: Vec3,
  steps: Option<usize>,
) -> Result<()> {
  tool.validate()?;

  let h = stock.dims().h();
  let axis_a = axis_a.try_normalize().unwrap_or(Vec3::Z);
  let axis_b = axis_b.try_normalize().unwrap_or(Vec3::Z);

  let start = ToolPose::new(a, axis_a);
  let end = ToolPose::new(b, axis_b);
  let swept = start
    .world_aabb(tool)
    .union(&end.world_aabb(tool))
    .expanded(h);
  if !swept.overlaps(&stock.dims().bounds()) {
    return Ok(());
  }

  let motion = (b - a).length();
  if motion < ZERO_MOTION && axis_a.dot(axis_b) > 1.0 - 1.0e-6 {
    // Static stamp: no translation and no reorientation.
    stock.stamp(tool, &start);
    return Ok(());
  }

  // Slab-clip the tip path against the grid grown by the cutter's reach:
  // poses outside this interval cannot touch a cell, so a motion much
  // longer than the stock still costs only the in-grid portion.
  let r = tool.radius();
  let reach = (2.0 * r * r + tool.length() * tool.length()).sqrt() + h;
  let Some((t_enter, t_exit)) = clip_segment(a, b, &stock.dims().bounds().expanded(reach)) else {
    return Ok(());
  };

  let steps = steps.unwrap_or_else(|| default_steps(motion, h)).max(1);
  for s in 0..=steps {
    let t = s as f32 / steps as f32;
    if t < t_enter || t > t_exit {
      continue;
    }
    let p = a.lerp(b, t);
    let axis = slerp_axis(axis_a, axis_b, t);
    stock.stamp(tool, &ToolPose::new(p, axis));
  }
  Ok(())
}

/// Circular-interpolation sweep: XY arc about `center`, linear Z, tool
/// axis fixed at `(0, 0, 1)`.
///
/// The arc radius is taken from the start point; `center.z` is ignored.
/// Step count follows the same sub-voxel rule as `linear`, applied to the
/// arc length.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "sweep::arc"))]
pub fn arc<S: Stock + ?Sized>(
  stock: &mut S,
  tool: &Tool,
  a: Vec3,
  b: Vec3,
  center: Vec3,
  clockwise: bool,
) -> Result<()> {
  tool.validate()?;

  let radius = (a.truncate() - center.truncate()).length();
  if radius < ZERO_MOTION {
    return linear(stock, tool, a, b, Vec3::Z, Vec3::Z, None);
  }

  let start_angle = (a.y - center.y).atan2(a.x - center.x);
  let end_angle = (b.y - center.y).atan2(b.x - center.x);
  let mut span = end_angle - start_angle;
  if clockwise {
    if span > 0.0 {
      span -= 2.0 * std::f32::consts::PI;
    }
  } else if span < 0.0 {
    span += 2.0 * std::f32::consts::PI;
  }

  let h = stock.dims().h();
  let arc_length = radius * span.abs();
  let steps = default_steps(arc_length, h);
  for s in 0..=steps {
    let t = s as f32 / steps as f32;
    let angle = start_angle + span * t;
    let p = Vec3::new(
      center.x + radius * angle.cos(),
      center.y + radius * angle.sin(),
      a.z + (b.z - a.z) * t,
    );
    stock.stamp(tool, &ToolPose::new(p, Vec3::Z));
  }
  Ok(())
}

#[cfg(test)]
#[path = "sweep_test.rs"]
mod sweep_test;
