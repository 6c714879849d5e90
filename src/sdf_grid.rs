//! Dense signed-distance stock.
//!
//! Scalar field sampled at **cell centers**, negative inside material and
//! positive outside. Construction writes the exact signed distance of the
//! stock box, so the initial zero level set coincides with the stock walls.
//!
//! Cuts combine via local CSG subtraction: `d' = max(d, -d_tool(p))`,
//! applied only inside the cutter's world AABB expanded by one voxel (the
//! narrow band). Outside that band the field is left unchanged: values
//! away from prior cuts are already >= 0 in removed air and <= 0 in stock,
//! and only the zero-crossing neighborhood matters to extraction. The
//! field is never re-tightened into a globally exact distance.
//!
//! Per-cell values only ever increase, which makes cuts idempotent and the
//! material census monotone.

use glam::Vec3;
use rayon::prelude::*;

use crate::error::{MillError, Result};
use crate::geometry::{Aabb, CellRange, GridDims};
use crate::stock::Stock;
use crate::tool::{Tool, ToolPose};

/// Dense signed-distance grid over the stock volume.
#[derive(Clone, Debug)]
pub struct SdfGrid {
  dims: GridDims,
  field: Vec<f32>,
  modified: bool,
}

impl SdfGrid {
  /// Allocate a grid over `bounds` with voxel edge `h`, initialized to the
  /// stock-box signed distance.
  pub fn new(bounds: Aabb, h: f32) -> Result<Self> {
    Self::build(bounds, h, None)
  }

  /// Like `new`, but fails with `ResolutionTooFine` if the grid would
  /// exceed `max_cells`.
  pub fn with_cell_cap(bounds: Aabb, h: f32, max_cells: u64) -> Result<Self> {
    Self::build(bounds, h, Some(max_cells))
  }

  fn build(bounds: Aabb, h: f32, max_cells: Option<u64>) -> Result<Self> {
    let dims = GridDims::new(bounds, h)?;
    let cells = dims.cell_count();
    if let Some(cap) = max_cells {
      if cells > cap {
        return Err(MillError::ResolutionTooFine { cells, cap });
      }
    }

    let mut grid = Self {
      dims,
      field: vec![0.0; cells as usize],
      modified: false,
    };
    grid.fill_stock_distance();
    Ok(grid)
  }

  /// Write the exact stock-box signed distance into every cell.
  fn fill_stock_distance(&mut self) {
    let dims = self.dims;
    let (_, ny, nz) = dims.counts();
    let center = dims.bounds().center();
    let half = dims.bounds().size() * 0.5;

    self
      .field
      .par_chunks_mut(ny * nz)
      .enumerate()
      .for_each(|(i, slab)| {
        for j in 0..ny {
          for k in 0..nz {
            let p = dims.cell_center(i as i64, j as i64, k as i64);
            slab[j * nz + k] = box_distance(p, center, half);
          }
        }
      });
  }

  #[inline]
  pub fn dims(&self) -> &GridDims {
    &self.dims
  }

  /// Field value at cell `(i, j, k)`; `OutOfBounds` for indices off the
  /// grid (debug sampling; the cutting kernels clip instead).
  pub fn value(&self, i: usize, j: usize, k: usize) -> Result<f32> {
    let (nx, ny, nz) = self.dims.counts();
    if i >= nx || j >= ny || k >= nz {
      return Err(MillError::OutOfBounds(i, j, k));
    }
    Ok(self.field[self.dims.linear_index(i, j, k)])
  }

  /// Apply `d' = max(d, -tool_distance(p))` over a clipped cell range.
  ///
  /// Parallel over x-slabs: each worker owns a disjoint contiguous slab,
  /// so no locking is needed and the result is independent of scheduling.
  fn subtract_field<F>(&mut self, range: CellRange, tool_distance: F)
  where
    F: Fn(Vec3) -> f32 + Sync,
  {
    let dims = self.dims;
    let (_, ny, nz) = dims.counts();

    let changed = self
      .field
      .par_chunks_mut(ny * nz)
      .enumerate()
      .skip(range.i0)
      .take(range.i1 - range.i0 + 1)
      .map(|(i, slab)| {
        let mut changed = false;
        for j in range.j0..=range.j1 {
          for k in range.k0..=range.k1 {
            let p = dims.cell_center(i as i64, j as i64, k as i64);
            let carved = -tool_distance(p);
            let cell = &mut slab[j * nz + k];
            if carved > *cell {
              *cell = carved;
              changed = true;
            }
          }
        }
        changed
      })
      .reduce(|| false, |a, b| a | b);

    self.modified |= changed;
  }

  /// Subtract a sphere of `radius` at `center`.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "sdf::remove_sphere")
  )]
  pub fn remove_sphere(&mut self, center: Vec3, radius: f32) {
    if !(radius > 0.0) {
      return;
    }
    let aabb = Aabb::from_center_size(center, Vec3::splat(radius * 2.0)).expanded(self.dims.h());
    let Some(range) = self.dims.clip_to_cells(&aabb) else {
      return;
    };
    self.subtract_field(range, |p| (p - center).length() - radius);
  }

  /// Subtract a flat-capped cylinder of `radius` along segment `ab`.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "sdf::remove_cylinder")
  )]
  pub fn remove_cylinder(&mut self, a: Vec3, b: Vec3, radius: f32) {
    if !(radius > 0.0) {
      return;
    }
    let axis = b - a;
    let len = axis.length();
    if len < 1.0e-6 {
      self.remove_sphere(a, radius);
      return;
    }
    let dir = axis / len;

    let aabb = Aabb::new(a.min(b), a.max(b)).expanded(radius + self.dims.h());
    let Some(range) = self.dims.clip_to_cells(&aabb) else {
      return;
    };
    self.subtract_field(range, move |p| {
      let rel = p - a;
      let s = rel.dot(dir);
      let dr = (rel - dir * s).length() - radius;
      let dz = (-s).max(s - len);
      dr.max(dz).min(0.0) + glam::Vec2::new(dr.max(0.0), dz.max(0.0)).length()
    });
  }

  /// Subtract the cutter at one pose over its narrow band.
  fn stamp_tool(&mut self, tool: &Tool, pose: &ToolPose) {
    let aabb = pose.world_aabb(tool).expanded(self.dims.h());
    let Some(range) = self.dims.clip_to_cells(&aabb) else {
      return;
    };
    let tool = *tool;
    let pose = *pose;
    self.subtract_field(range, move |p| tool.signed_distance(pose.to_local(p)));
  }
}

/// Exact signed distance from `p` to the box `(center ± half)`.
#[inline]
fn box_distance(p: Vec3, center: Vec3, half: Vec3) -> f32 {
  let q = (p - center).abs() - half;
  q.max(Vec3::ZERO).length() + q.x.max(q.y).max(q.z).min(0.0)
}

impl Stock for SdfGrid {
  #[inline]
  fn dims(&self) -> &GridDims {
    &self.dims
  }

  #[inline]
  fn sample(&self, i: i64, j: i64, k: i64) -> f32 {
    if self.dims.in_bounds(i, j, k) {
      self.field[self.dims.linear_index(i as usize, j as usize, k as usize)]
    } else {
      self.dims.h() * 0.5
    }
  }

  #[inline]
  fn is_pristine(&self) -> bool {
    !self.modified
  }

  /// Cells still inside material (`d < 0`).
  fn count_material(&self) -> u64 {
    self.field.par_iter().filter(|&&d| d < 0.0).count() as u64
  }

  fn reset(&mut self) {
    self.fill_stock_distance();
    self.modified = false;
  }

  fn remove_sphere(&mut self, center: Vec3, radius: f32) {
    SdfGrid::remove_sphere(self, center, radius)
  }

  fn remove_cylinder(&mut self, a: Vec3, b: Vec3, radius: f32) {
    SdfGrid::remove_cylinder(self, a, b, radius)
  }

  fn stamp(&mut self, tool: &Tool, pose: &ToolPose) {
    self.stamp_tool(tool, pose)
  }
}

#[cfg(test)]
#[path = "sdf_grid_test.rs"]
mod sdf_grid_test;
