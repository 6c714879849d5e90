//! Geometry primitives shared by the grids, the sweep engine, and the
//! extractors.
//!
//! World units are millimeters throughout. The grid is isotropic: cubic
//! cells of edge length `h`, dimensioned as `n = ceil(size / h)` per axis.
//! Because of the ceil, the *effective* grid bound may exceed the configured
//! stock bound by less than one voxel; `GridDims` stores the effective bound
//! and every consumer uses it consistently.
//!
//! # Coordinate System
//!
//! ```text
//!         +Z (tool axis default)
//!          │
//!          │
//!          │
//!          └───────── +X
//!         /
//!        /
//!       +Y
//! ```

use glam::Vec3;

use crate::error::{MillError, Result};

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb {
  /// Create an AABB from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create an AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::INFINITY),
      max: Vec3::splat(f32::NEG_INFINITY),
    }
  }

  /// Create an AABB centered on `center` with total extent `size`.
  pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
    let half = size * 0.5;
    Self {
      min: center - half,
      max: center + half,
    }
  }

  /// Check if the AABB is valid (min <= max on all axes).
  #[inline]
  pub fn is_valid(&self) -> bool {
    self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Check if the AABB contains a point (boundary inclusive).
  #[inline]
  pub fn contains(&self, p: Vec3) -> bool {
    p.x >= self.min.x
      && p.x <= self.max.x
      && p.y >= self.min.y
      && p.y <= self.max.y
      && p.z >= self.min.z
      && p.z <= self.max.z
  }

  /// Check if this AABB overlaps another (boundary touching counts).
  #[inline]
  pub fn overlaps(&self, other: &Aabb) -> bool {
    self.min.x <= other.max.x
      && self.max.x >= other.min.x
      && self.min.y <= other.max.y
      && self.max.y >= other.min.y
      && self.min.z <= other.max.z
      && self.max.z >= other.min.z
  }

  /// Intersection of two AABBs, `None` if they are disjoint.
  pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
    let min = self.min.max(other.min);
    let max = self.max.min(other.max);
    if min.x <= max.x && min.y <= max.y && min.z <= max.z {
      Some(Aabb { min, max })
    } else {
      None
    }
  }

  /// Smallest AABB containing both inputs.
  pub fn union(&self, other: &Aabb) -> Aabb {
    Aabb {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Grow the AABB by `margin` on every side.
  pub fn expanded(&self, margin: f32) -> Aabb {
    Aabb {
      min: self.min - Vec3::splat(margin),
      max: self.max + Vec3::splat(margin),
    }
  }

  /// Expand the AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, p: Vec3) {
    self.min = self.min.min(p);
    self.max = self.max.max(p);
  }
}

/// Clip the segment `a..b` against an AABB with the slab method.
///
/// Returns the parameter interval `[t_enter, t_exit] ⊆ [0, 1]` of the
/// portion inside the box, or `None` when the segment misses it entirely.
/// Degenerate (zero-length) segments report `(0, 1)` if `a` is inside.
pub fn clip_segment(a: Vec3, b: Vec3, aabb: &Aabb) -> Option<(f32, f32)> {
  let d = b - a;
  let mut t0 = 0.0f32;
  let mut t1 = 1.0f32;

  for axis in 0..3 {
    let (origin, dir, lo, hi) = (a[axis], d[axis], aabb.min[axis], aabb.max[axis]);
    if dir.abs() < f32::EPSILON {
      if origin < lo || origin > hi {
        return None;
      }
      continue;
    }
    let inv = 1.0 / dir;
    let mut near = (lo - origin) * inv;
    let mut far = (hi - origin) * inv;
    if near > far {
      std::mem::swap(&mut near, &mut far);
    }
    t0 = t0.max(near);
    t1 = t1.min(far);
    if t0 > t1 {
      return None;
    }
  }

  Some((t0, t1))
}

/// Inclusive cell index ranges produced by clipping a world AABB to a grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRange {
  pub i0: usize,
  pub i1: usize,
  pub j0: usize,
  pub j1: usize,
  pub k0: usize,
  pub k1: usize,
}

/// Dimensions and index<->world mapping of a dense isotropic grid.
///
/// Linear layout is x-major with z innermost: `(i * ny + j) * nz + k`.
/// Sequential k-columns are contiguous in memory, so inner loops iterate k.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridDims {
  bounds: Aabb,
  h: f32,
  nx: usize,
  ny: usize,
  nz: usize,
}

impl GridDims {
  /// Dimension a grid over `bounds` with voxel edge `h`.
  ///
  /// Fails with `InvalidBounds` for inverted or non-finite bounds and with
  /// `InvalidResolution` if `h <= 0` or any axis yields zero cells. The
  /// stored bound is the effective one (`min + n·h` per axis).
  pub fn new(bounds: Aabb, h: f32) -> Result<Self> {
    if !bounds.min.is_finite() || !bounds.max.is_finite() || !bounds.is_valid() {
      return Err(MillError::InvalidBounds {
        min: bounds.min.to_array(),
        max: bounds.max.to_array(),
      });
    }
    if !(h > 0.0) || !h.is_finite() {
      return Err(MillError::InvalidResolution(h));
    }

    let size = bounds.size();
    let nx = (size.x / h).ceil() as usize;
    let ny = (size.y / h).ceil() as usize;
    let nz = (size.z / h).ceil() as usize;
    if nx == 0 || ny == 0 || nz == 0 {
      return Err(MillError::InvalidResolution(h));
    }

    let effective_max = bounds.min + Vec3::new(nx as f32, ny as f32, nz as f32) * h;
    Ok(Self {
      bounds: Aabb::new(bounds.min, effective_max),
      h,
      nx,
      ny,
      nz,
    })
  }

  /// Effective grid bounds (`max` may exceed the configured stock bound by
  /// less than one voxel).
  #[inline]
  pub fn bounds(&self) -> Aabb {
    self.bounds
  }

  /// Voxel edge length in millimeters.
  #[inline]
  pub fn h(&self) -> f32 {
    self.h
  }

  /// Cell counts per axis.
  #[inline]
  pub fn counts(&self) -> (usize, usize, usize) {
    (self.nx, self.ny, self.nz)
  }

  /// Total number of cells.
  #[inline]
  pub fn cell_count(&self) -> u64 {
    self.nx as u64 * self.ny as u64 * self.nz as u64
  }

  /// World position of the center of cell `(i, j, k)`.
  ///
  /// Also valid for virtual indices outside `[0, n)`; extraction uses the
  /// one-cell apron around the grid.
  #[inline]
  pub fn cell_center(&self, i: i64, j: i64, k: i64) -> Vec3 {
    self.bounds.min
      + Vec3::new(
        (i as f32 + 0.5) * self.h,
        (j as f32 + 0.5) * self.h,
        (k as f32 + 0.5) * self.h,
      )
  }

  /// Index of the cell containing `p`, clamped to `[0, n-1]` per axis.
  #[inline]
  pub fn world_to_index(&self, p: Vec3) -> (usize, usize, usize) {
    let rel = (p - self.bounds.min) / self.h;
    (
      (rel.x.floor() as i64).clamp(0, self.nx as i64 - 1) as usize,
      (rel.y.floor() as i64).clamp(0, self.ny as i64 - 1) as usize,
      (rel.z.floor() as i64).clamp(0, self.nz as i64 - 1) as usize,
    )
  }

  /// Linear index of cell `(i, j, k)`.
  #[inline]
  pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
    (i * self.ny + j) * self.nz + k
  }

  /// True if `(i, j, k)` addresses a cell of this grid.
  #[inline]
  pub fn in_bounds(&self, i: i64, j: i64, k: i64) -> bool {
    (0..self.nx as i64).contains(&i)
      && (0..self.ny as i64).contains(&j)
      && (0..self.nz as i64).contains(&k)
  }

  /// Inclusive index ranges of cells whose *centers* can lie inside `aabb`,
  /// clipped to the grid. `None` when no cell center is covered.
  pub fn clip_to_cells(&self, aabb: &Aabb) -> Option<CellRange> {
    let lo = (aabb.min - self.bounds.min) / self.h - Vec3::splat(0.5);
    let hi = (aabb.max - self.bounds.min) / self.h - Vec3::splat(0.5);

    let clamp_axis = |l: f32, u: f32, n: usize| -> Option<(usize, usize)> {
      let a = (l.ceil() as i64).max(0);
      let b = (u.floor() as i64).min(n as i64 - 1);
      if a > b {
        None
      } else {
        Some((a as usize, b as usize))
      }
    };

    let (i0, i1) = clamp_axis(lo.x, hi.x, self.nx)?;
    let (j0, j1) = clamp_axis(lo.y, hi.y, self.ny)?;
    let (k0, k1) = clamp_axis(lo.z, hi.z, self.nz)?;
    Some(CellRange {
      i0,
      i1,
      j0,
      j1,
      k0,
      k1,
    })
  }
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;
