//! Dense boolean-occupancy stock.
//!
//! Each cell is material-present (`true`) or removed (`false`); the grid is
//! created full and only the cutting kernels mutate it. Cell membership is
//! decided by **voxel center** inclusion, closed at the boundary (a center
//! exactly on the cutter surface is removed), and every kernel iterates
//! only the cells inside the cutter AABB clipped to the grid. Removing an
//! already-empty cell is a no-op, which keeps the material count
//! monotonically non-increasing and cuts idempotent.

use glam::Vec3;

use crate::error::{MillError, Result};
use crate::geometry::{Aabb, GridDims};
use crate::stock::Stock;
use crate::tool::{Tool, ToolPose};

/// Dense occupancy grid over the stock volume.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
  dims: GridDims,
  cells: Vec<bool>,
  material: u64,
}

impl VoxelGrid {
  /// Allocate a full grid over `bounds` with voxel edge `h`.
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
    Ok(Self {
      dims,
      cells: vec![true; cells as usize],
      material: cells,
    })
  }

  #[inline]
  pub fn dims(&self) -> &GridDims {
    &self.dims
  }

  /// Occupancy of cell `(i, j, k)`; out-of-range indices read as removed.
  #[inline]
  pub fn is_material(&self, i: usize, j: usize, k: usize) -> bool {
    let (nx, ny, nz) = self.dims.counts();
    if i >= nx || j >= ny || k >= nz {
      return false;
    }
    self.cells[self.dims.linear_index(i, j, k)]
  }

  #[inline]
  fn clear_cell(&mut self, idx: usize) {
    if self.cells[idx] {
      self.cells[idx] = false;
      self.material -= 1;
    }
  }

  /// Clear cells whose centers lie within `radius` of `center`.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "voxel::remove_sphere")
  )]
  pub fn remove_sphere(&mut self, center: Vec3, radius: f32) {
    if !(radius > 0.0) {
      return;
    }
    let aabb = Aabb::from_center_size(center, Vec3::splat(radius * 2.0));
    let Some(range) = self.dims.clip_to_cells(&aabb) else {
      return;
    };

    let r_sq = radius * radius;
    for i in range.i0..=range.i1 {
      for j in range.j0..=range.j1 {
        for k in range.k0..=range.k1 {
          let p = self.dims.cell_center(i as i64, j as i64, k as i64);
          if (p - center).length_squared() <= r_sq {
            self.clear_cell(self.dims.linear_index(i, j, k));
          }
        }
      }
    }
  }

  /// Clear cells within `radius` of segment `ab` (flat caps: the
  /// projection parameter must fall in `[0, 1]`).
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "voxel::remove_cylinder")
  )]
  pub fn remove_cylinder(&mut self, a: Vec3, b: Vec3, radius: f32) {
    if !(radius > 0.0) {
      return;
    }
    let axis = b - a;
    let len_sq = axis.length_squared();
    if len_sq < 1.0e-12 {
      // Degenerate segment: collapse to a sphere stamp.
      self.remove_sphere(a, radius);
      return;
    }

    let aabb = Aabb::new(a.min(b), a.max(b)).expanded(radius);
    let Some(range) = self.dims.clip_to_cells(&aabb) else {
      return;
    };

    let r_sq = radius * radius;
    for i in range.i0..=range.i1 {
      for j in range.j0..=range.j1 {
        for k in range.k0..=range.k1 {
          let p = self.dims.cell_center(i as i64, j as i64, k as i64);
          let t = (p - a).dot(axis) / len_sq;
          if !(0.0..=1.0).contains(&t) {
            continue;
          }
          let closest = a + axis * t;
          if (p - closest).length_squared() <= r_sq {
            self.clear_cell(self.dims.linear_index(i, j, k));
          }
        }
      }
    }
  }

  /// Clear cells inside the cutter at one pose.
  fn stamp_tool(&mut self, tool: &Tool, pose: &ToolPose) {
    let Some(range) = self.dims.clip_to_cells(&pose.world_aabb(tool)) else {
      return;
    };

    for i in range.i0..=range.i1 {
      for j in range.j0..=range.j1 {
        for k in range.k0..=range.k1 {
          let p = self.dims.cell_center(i as i64, j as i64, k as i64);
          if tool.signed_distance(pose.to_local(p)) <= 0.0 {
            self.clear_cell(self.dims.linear_index(i, j, k));
          }
        }
      }
    }
  }
}

impl Stock for VoxelGrid {
  #[inline]
  fn dims(&self) -> &GridDims {
    &self.dims
  }

  #[inline]
  fn sample(&self, i: i64, j: i64, k: i64) -> f32 {
    let half = self.dims.h() * 0.5;
    if self.dims.in_bounds(i, j, k)
      && self.cells[self.dims.linear_index(i as usize, j as usize, k as usize)]
    {
      -half
    } else {
      half
    }
  }

  #[inline]
  fn is_pristine(&self) -> bool {
    self.material == self.dims.cell_count()
  }

  #[inline]
  fn count_material(&self) -> u64 {
    self.material
  }

  fn reset(&mut self) {
    self.cells.fill(true);
    self.material = self.dims.cell_count();
  }

  fn remove_sphere(&mut self, center: Vec3, radius: f32) {
    VoxelGrid::remove_sphere(self, center, radius)
  }

  fn remove_cylinder(&mut self, a: Vec3, b: Vec3, radius: f32) {
    VoxelGrid::remove_cylinder(self, a, b, radius)
  }

  fn stamp(&mut self, tool: &Tool, pose: &ToolPose) {
    self.stamp_tool(tool, pose)
  }
}

#[cfg(test)]
#[path = "voxel_grid_test.rs"]
mod voxel_grid_test;
