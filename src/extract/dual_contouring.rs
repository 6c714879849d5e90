//! Dual-contouring extraction.
//!
//! Two sequential passes over the extended cube lattice:
//!
//! 1. **Vertices**: every cube with a sign change on any of its 12 edges
//!    gets one mesh vertex, placed at the minimizer of the quadratic error
//!    function over the cube's Hermite edge data (crossing position plus
//!    field-gradient normal). The solve is regularized toward the crossing
//!    centroid and falls back to the centroid outright when the normal
//!    system is ill-conditioned (coplanar normals).
//! 2. **Quads**: each sign-changing sample edge connects the vertices of
//!    the four cubes sharing it. Quads split along the shorter diagonal
//!    and wind so normals point from material into air.
//!
//! Runs sequentially: vertex index assignment is order-dependent, and a
//! fixed ascending (i, j, k) order is what makes the output deterministic.

use glam::{Mat3A, Vec3, Vec3A};
use smallvec::SmallVec;

use super::cube_samples;
use super::mc_tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE};
use crate::geometry::GridDims;
use crate::mesh::Mesh;
use crate::stock::Stock;

/// Tikhonov weight pulling the QEF minimizer toward the mass point.
const QEF_REGULARIZATION: f32 = 0.05;

/// One edge crossing: interpolated surface point and outward normal.
/// SIMD vectors keep the QEF accumulation loops wide.
struct Hermite {
  position: Vec3A,
  normal: Vec3A,
}

/// Cube-corner index adjacent to corner 0 along each axis.
const AXIS_NEIGHBOR: [usize; 3] = [1, 3, 4];

pub(super) fn generate<S: Stock + ?Sized>(stock: &S) -> Mesh {
  let dims = *stock.dims();
  let (nx, ny, nz) = dims.counts();
  // Cube bases span [-1, n-1] per axis: one apron cube on every side.
  let (ex, ey, ez) = (nx + 1, ny + 1, nz + 1);

  let mut mesh = Mesh::new();
  let mut cube_vertex = vec![-1i32; ex * ey * ez];
  let vertex_slot =
    |ci: i64, cj: i64, ck: i64| (((ci + 1) as usize * ey) + (cj + 1) as usize) * ez + (ck + 1) as usize;

  // Pass 1: place one vertex in every sign-changing cube.
  for ci in -1..nx as i64 {
    for cj in -1..ny as i64 {
      for ck in -1..nz as i64 {
        let (samples, mask) = cube_samples(stock, ci, cj, ck);
        if mask == 0 || mask == 255 {
          continue;
        }

        let crossings = collect_crossings(stock, &dims, ci, cj, ck, &samples, mask);
        debug_assert!(!crossings.is_empty());

        let lo = Vec3A::from(dims.cell_center(ci, cj, ck));
        let hi = Vec3A::from(dims.cell_center(ci + 1, cj + 1, ck + 1));
        let position = qef_minimize(&crossings, lo, hi);
        let normal = crossings
          .iter()
          .fold(Vec3A::ZERO, |acc, c| acc + c.normal)
          .try_normalize()
          .unwrap_or(Vec3A::Z);

        let index = mesh.push_vertex(Vec3::from(position), Vec3::from(normal)) as i32;
        cube_vertex[vertex_slot(ci, cj, ck)] = index;
      }
    }
  }

  // Pass 2: connect the four cubes around every sign-changing edge.
  for ci in -1..nx as i64 {
    for cj in -1..ny as i64 {
      for ck in -1..nz as i64 {
        let s0 = stock.sample(ci, cj, ck);

        for axis in 0..3 {
          let (dx, dy, dz) = CORNER_OFFSETS[AXIS_NEIGHBOR[axis]];
          let s1 = stock.sample(ci + dx, cj + dy, ck + dz);
          if (s0 >= 0.0) == (s1 >= 0.0) {
            continue;
          }

          // The quad looks backwards along the two perpendicular axes, so
          // the cubes at -1 there would fall off the lattice.
          let u = (axis + 1) % 3;
          let v = (axis + 2) % 3;
          let pos = [ci, cj, ck];
          if pos[u] == -1 || pos[v] == -1 {
            continue;
          }

          let mut pos_b = pos;
          pos_b[u] -= 1;
          pos_b[v] -= 1;
          let mut pos_c = pos;
          pos_c[u] -= 1;
          let mut pos_d = pos;
          pos_d[v] -= 1;

          let v_a = cube_vertex[vertex_slot(pos[0], pos[1], pos[2])];
          let v_b = cube_vertex[vertex_slot(pos_b[0], pos_b[1], pos_b[2])];
          let v_c = cube_vertex[vertex_slot(pos_c[0], pos_c[1], pos_c[2])];
          let v_d = cube_vertex[vertex_slot(pos_d[0], pos_d[1], pos_d[2])];
          if v_a < 0 || v_b < 0 || v_c < 0 || v_d < 0 {
            continue;
          }

          emit_quad(&mut mesh, [v_a as u32, v_b as u32, v_c as u32, v_d as u32], s0 < 0.0);
        }
      }
    }
  }

  mesh
}

/// Hermite data for every sign-changing edge of one cube.
fn collect_crossings<S: Stock + ?Sized>(
  stock: &S,
  dims: &GridDims,
  ci: i64,
  cj: i64,
  ck: i64,
  samples: &[f32; 8],
  mask: u8,
) -> SmallVec<[Hermite; 12]> {
  let mut crossings = SmallVec::new();
  let edge_mask = EDGE_TABLE[mask as usize];

  for (e, &[c0, c1]) in EDGE_CORNERS.iter().enumerate() {
    if edge_mask & (1 << e) == 0 {
      continue;
    }
    let s0 = samples[c0];
    let s1 = samples[c1];
    let t = s0 / (s0 - s1);

    let (ax, ay, az) = CORNER_OFFSETS[c0];
    let (bx, by, bz) = CORNER_OFFSETS[c1];
    let p0 = Vec3A::from(dims.cell_center(ci + ax, cj + ay, ck + az));
    let p1 = Vec3A::from(dims.cell_center(ci + bx, cj + by, ck + bz));

    let g0 = sample_gradient(stock, ci + ax, cj + ay, ck + az);
    let g1 = sample_gradient(stock, ci + bx, cj + by, ck + bz);

    crossings.push(Hermite {
      position: p0 + (p1 - p0) * t,
      normal: (g0 + (g1 - g0) * t).try_normalize().unwrap_or(Vec3A::Z),
    });
  }

  crossings
}

/// Central-difference field gradient at a sample point. Points from
/// material (negative) toward air (positive).
#[inline]
fn sample_gradient<S: Stock + ?Sized>(stock: &S, i: i64, j: i64, k: i64) -> Vec3A {
  Vec3A::new(
    stock.sample(i + 1, j, k) - stock.sample(i - 1, j, k),
    stock.sample(i, j + 1, k) - stock.sample(i, j - 1, k),
    stock.sample(i, j, k + 1) - stock.sample(i, j, k - 1),
  )
}

/// Minimize the QEF `sum((n_i . (x - p_i))^2)` over the cube, regularized
/// toward the crossing centroid; centroid fallback when the normal system
/// is degenerate.
fn qef_minimize(crossings: &[Hermite], lo: Vec3A, hi: Vec3A) -> Vec3A {
  let mass = crossings
    .iter()
    .fold(Vec3A::ZERO, |acc, c| acc + c.position)
    / crossings.len() as f32;

  let mut ata = [[0.0f32; 3]; 3];
  let mut atb = Vec3A::ZERO;
  for c in crossings {
    let n = c.normal;
    let d = n.dot(c.position - mass);
    for row in 0..3 {
      for col in 0..3 {
        ata[row][col] += n[row] * n[col];
      }
    }
    atb += n * d;
  }
  for diag in 0..3 {
    ata[diag][diag] += QEF_REGULARIZATION;
  }

  let m = Mat3A::from_cols(
    Vec3A::new(ata[0][0], ata[1][0], ata[2][0]),
    Vec3A::new(ata[0][1], ata[1][1], ata[2][1]),
    Vec3A::new(ata[0][2], ata[1][2], ata[2][2]),
  );
  let det = m.determinant();
  if det.abs() < 1.0e-8 || !det.is_finite() {
    return mass.clamp(lo, hi);
  }

  (mass + m.inverse() * atb).clamp(lo, hi)
}

/// Split the quad along its shorter diagonal and wind both triangles so
/// the surface normal points from material into air along the crossed
/// edge.
fn emit_quad(mesh: &mut Mesh, [a, b, c, d]: [u32; 4], solid_at_base: bool) {
  let verts = mesh.vertices();
  let pa = verts[a as usize];
  let pb = verts[b as usize];
  let pc = verts[c as usize];
  let pd = verts[d as usize];

  let use_ab = pa.distance_squared(pb) < pc.distance_squared(pd);
  if use_ab {
    if solid_at_base {
      mesh.push_indices(a, b, d);
      mesh.push_indices(a, c, b);
    } else {
      mesh.push_indices(a, b, c);
      mesh.push_indices(a, d, b);
    }
  } else if solid_at_base {
    mesh.push_indices(c, d, a);
    mesh.push_indices(c, b, d);
  } else {
    mesh.push_indices(c, a, d);
    mesh.push_indices(d, b, c);
  }
}

#[cfg(test)]
#[path = "dual_contouring_test.rs"]
mod dual_contouring_test;
