//! Surface extraction: grid -> triangle mesh.
//!
//! Both extractors read cell-center samples through the [`Stock`] trait and
//! never mutate the grid. Cubes span 2×2×2 adjacent samples and are iterated
//! over `[-1, n-1]` per axis; indices outside the grid read as air, so the
//! stock skin is part of the surface and every extracted mesh is closed.
//!
//! A grid that has never been cut short-circuits to the analytic stock box
//! (12 triangles, 2 per face): the discretized surface of pristine stock
//! is exactly its bounding box, so there is nothing to march.
//!
//! Extraction is deterministic: parallel passes partition by x-slab and
//! concatenate results in ascending slab order.

pub mod dual_contouring;
pub mod marching_cubes;
pub mod mc_tables;

use glam::Vec3;

use crate::geometry::GridDims;
use crate::mesh::Mesh;
use crate::stock::Stock;

/// Surface extraction algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractMethod {
  /// Per-cube triangle tables; vertices on sign-changing edges. Triangle
  /// soup output.
  MarchingCubes,
  /// One QEF-placed vertex per sign-changing cube, quads across
  /// sign-changing edges. Shared-vertex output, smoother at equal
  /// resolution.
  DualContouring,
}

/// Extract the surface of `stock` as a triangle mesh.
///
/// Pure function of the grid state: identical inputs produce identical
/// triangle lists. A grid with no surface yields an empty mesh rather than
/// an error.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "extract"))]
pub fn extract<S: Stock + Sync>(stock: &S, method: ExtractMethod) -> Mesh {
  if stock.is_pristine() {
    return stock_box_mesh(stock.dims());
  }
  match method {
    ExtractMethod::MarchingCubes => marching_cubes::generate(stock),
    ExtractMethod::DualContouring => dual_contouring::generate(stock),
  }
}

/// Analytic surface of uncut stock: the effective grid bounds as 12
/// outward-facing triangles.
fn stock_box_mesh(dims: &GridDims) -> Mesh {
  let b = dims.bounds();
  let (lo, hi) = (b.min, b.max);
  let mut mesh = Mesh::with_capacity(12);

  let mut quad = |a: Vec3, b: Vec3, c: Vec3, d: Vec3| {
    mesh.push_triangle(a, b, c);
    mesh.push_triangle(a, c, d);
  };

  // -X / +X
  quad(
    Vec3::new(lo.x, lo.y, lo.z),
    Vec3::new(lo.x, lo.y, hi.z),
    Vec3::new(lo.x, hi.y, hi.z),
    Vec3::new(lo.x, hi.y, lo.z),
  );
  quad(
    Vec3::new(hi.x, lo.y, hi.z),
    Vec3::new(hi.x, lo.y, lo.z),
    Vec3::new(hi.x, hi.y, lo.z),
    Vec3::new(hi.x, hi.y, hi.z),
  );
  // -Y / +Y
  quad(
    Vec3::new(lo.x, lo.y, lo.z),
    Vec3::new(hi.x, lo.y, lo.z),
    Vec3::new(hi.x, lo.y, hi.z),
    Vec3::new(lo.x, lo.y, hi.z),
  );
  quad(
    Vec3::new(lo.x, hi.y, hi.z),
    Vec3::new(hi.x, hi.y, hi.z),
    Vec3::new(hi.x, hi.y, lo.z),
    Vec3::new(lo.x, hi.y, lo.z),
  );
  // -Z / +Z
  quad(
    Vec3::new(hi.x, lo.y, lo.z),
    Vec3::new(lo.x, lo.y, lo.z),
    Vec3::new(lo.x, hi.y, lo.z),
    Vec3::new(hi.x, hi.y, lo.z),
  );
  quad(
    Vec3::new(lo.x, lo.y, hi.z),
    Vec3::new(hi.x, lo.y, hi.z),
    Vec3::new(hi.x, hi.y, hi.z),
    Vec3::new(lo.x, hi.y, hi.z),
  );

  mesh
}

/// Gather the 8 corner samples of the cube at base `(i, j, k)` and build
/// the air mask (bit `c` set when corner `c` samples >= 0).
#[inline]
pub(crate) fn cube_samples<S: Stock + ?Sized>(
  stock: &S,
  i: i64,
  j: i64,
  k: i64,
) -> ([f32; 8], u8) {
  let mut samples = [0.0f32; 8];
  let mut mask = 0u8;
  for (c, &(dx, dy, dz)) in mc_tables::CORNER_OFFSETS.iter().enumerate() {
    let s = stock.sample(i + dx, j + dy, k + dz);
    samples[c] = s;
    if s >= 0.0 {
      mask |= 1 << c;
    }
  }
  (samples, mask)
}
