//! Marching-cubes extraction.
//!
//! Classic per-cube triangulation from the 256-entry tables: build the
//! 8-bit air mask from corner signs, look up the triangle list, and place
//! vertices on sign-changing edges at the interpolated zero crossing
//! `t = s0 / (s0 - s1)`. Boolean occupancy samples arrive as `±h/2`
//! pseudo-distances, so the crossing degenerates to the edge midpoint and
//! the output is reproducible without a real distance field.
//!
//! Output is triangle soup (three fresh vertices per triangle, vertex
//! normal = face normal). Slabs of cubes along x are processed in
//! parallel and concatenated in ascending order, so the triangle list is
//! deterministic.

use glam::{Vec3, Vec3A};
use rayon::prelude::*;

use super::cube_samples;
use super::mc_tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};
use crate::geometry::GridDims;
use crate::mesh::Mesh;
use crate::stock::Stock;

/// March every cube of the extended lattice and emit triangles.
pub(super) fn generate<S: Stock + Sync>(stock: &S) -> Mesh {
  let (nx, _, _) = stock.dims().counts();

  let slabs: Vec<Vec<[Vec3; 3]>> = (-1..nx as i64)
    .into_par_iter()
    .map(|i| march_slab(stock, i))
    .collect();

  let triangle_count = slabs.iter().map(Vec::len).sum();
  let mut mesh = Mesh::with_capacity(triangle_count);
  for slab in slabs {
    for [a, b, c] in slab {
      mesh.push_triangle(a, b, c);
    }
  }
  mesh
}

/// March the x-slab of cubes at base index `i`.
fn march_slab<S: Stock + ?Sized>(stock: &S, i: i64) -> Vec<[Vec3; 3]> {
  let dims = *stock.dims();
  let (_, ny, nz) = dims.counts();
  let mut triangles = Vec::new();

  for j in -1..ny as i64 {
    for k in -1..nz as i64 {
      let (samples, mask) = cube_samples(stock, i, j, k);
      if mask == 0 || mask == 255 {
        continue;
      }

      // Interpolate a vertex on every crossed edge (SIMD lerp).
      let edge_mask = EDGE_TABLE[mask as usize];
      let mut edge_verts = [Vec3::ZERO; 12];
      for (e, &[c0, c1]) in EDGE_CORNERS.iter().enumerate() {
        if edge_mask & (1 << e) == 0 {
          continue;
        }
        let s0 = samples[c0];
        let s1 = samples[c1];
        let t = s0 / (s0 - s1);
        let p0 = Vec3A::from(corner_position(&dims, i, j, k, c0));
        let p1 = Vec3A::from(corner_position(&dims, i, j, k, c1));
        edge_verts[e] = Vec3::from(p0 + (p1 - p0) * t);
      }

      let tri = &TRI_TABLE[mask as usize];
      for chunk in tri.chunks_exact(3) {
        if chunk[0] < 0 {
          break;
        }
        triangles.push([
          edge_verts[chunk[0] as usize],
          edge_verts[chunk[1] as usize],
          edge_verts[chunk[2] as usize],
        ]);
      }
    }
  }

  triangles
}

/// World position of cube corner `c` (the center of the sampled cell).
#[inline]
fn corner_position(dims: &GridDims, i: i64, j: i64, k: i64, c: usize) -> Vec3 {
  let (dx, dy, dz) = CORNER_OFFSETS[c];
  dims.cell_center(i + dx, j + dy, k + dz)
}

#[cfg(test)]
#[path = "marching_cubes_test.rs"]
mod marching_cubes_test;
