use glam::Vec3;

use super::*;
use crate::error::MillError;

fn ten_cube() -> VoxelGrid {
  // (-5..5)^3 at h = 1: 1000 cells with centers on the half-integer lattice
  VoxelGrid::new(Aabb::new(Vec3::splat(-5.0), Vec3::splat(5.0)), 1.0).unwrap()
}

#[test]
fn new_grid_is_full() {
  let grid = ten_cube();
  assert_eq!(grid.count_material(), 1000);
  assert!(grid.is_pristine());
  assert!(grid.is_material(0, 0, 0));
  assert!(grid.is_material(9, 9, 9));
}

#[test]
fn construction_rejects_bad_input() {
  let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
  assert!(matches!(
    VoxelGrid::new(bounds, 0.0),
    Err(MillError::InvalidResolution(_))
  ));
  assert!(matches!(
    VoxelGrid::new(
      Aabb { min: Vec3::splat(5.0), max: Vec3::splat(-5.0) },
      1.0
    ),
    Err(MillError::InvalidBounds { .. })
  ));
}

#[test]
fn cell_cap_limits_allocation() {
  let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
  assert!(VoxelGrid::with_cell_cap(bounds, 1.0, 1000).is_ok());
  assert!(matches!(
    VoxelGrid::with_cell_cap(bounds, 0.1, 1000),
    Err(MillError::ResolutionTooFine { cells: 1_000_000, cap: 1000 })
  ));
}

#[test]
fn sphere_removal_counts_centers() {
  let mut grid = ten_cube();
  grid.remove_sphere(Vec3::ZERO, 2.0);

  // Half-integer centers with x^2 + y^2 + z^2 <= 4: the eight
  // (+-0.5, +-0.5, +-0.5) cells plus the 24 with a single +-1.5 component
  assert_eq!(grid.count_material(), 1000 - 32);
  assert!(!grid.is_pristine());

  // (0.5, 0.5, 0.5) removed, (1.5, 1.5, 0.5) kept
  let (i, j, k) = grid.dims().world_to_index(Vec3::splat(0.5));
  assert!(!grid.is_material(i, j, k));
  let (i, j, k) = grid.dims().world_to_index(Vec3::new(1.5, 1.5, 0.5));
  assert!(grid.is_material(i, j, k));
}

#[test]
fn sphere_removal_is_idempotent() {
  let mut grid = ten_cube();
  grid.remove_sphere(Vec3::ZERO, 2.0);
  let after_first = grid.count_material();
  grid.remove_sphere(Vec3::ZERO, 2.0);
  assert_eq!(grid.count_material(), after_first);
}

#[test]
fn removal_outside_grid_is_a_noop() {
  let mut grid = ten_cube();
  grid.remove_sphere(Vec3::splat(50.0), 3.0);
  grid.remove_cylinder(Vec3::new(20.0, 0.0, 0.0), Vec3::new(30.0, 0.0, 0.0), 2.0);
  assert_eq!(grid.count_material(), 1000);
  assert!(grid.is_pristine());
}

#[test]
fn boundary_center_is_removed() {
  // Closed subtraction: a center exactly on the sphere surface is cleared
  let mut grid = ten_cube();
  grid.remove_sphere(Vec3::new(1.5, 0.5, 0.5), 1.0);
  let (i, j, k) = grid.dims().world_to_index(Vec3::new(0.5, 0.5, 0.5));
  assert!(!grid.is_material(i, j, k), "center at distance == r must clear");
}

#[test]
fn cylinder_removal_counts_centers() {
  let bounds = Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0));
  let mut grid = VoxelGrid::new(bounds, 1.0).unwrap();
  assert_eq!(grid.count_material(), 8000);

  grid.remove_cylinder(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 1.0);

  // (y, z) in {+-0.5}^2 passes y^2 + z^2 <= 1; x centers in [-5, 5] are
  // -4.5..4.5 (flat caps exclude centers past the segment ends)
  assert_eq!(grid.count_material(), 8000 - 4 * 10);
}

#[test]
fn cylinder_caps_are_flat() {
  let bounds = Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0));
  let mut grid = VoxelGrid::new(bounds, 1.0).unwrap();
  grid.remove_cylinder(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 1.0);

  // Just past the endpoint: projection parameter > 1
  let (i, j, k) = grid.dims().world_to_index(Vec3::new(5.5, 0.5, 0.5));
  assert!(grid.is_material(i, j, k));
  // Just inside the endpoint
  let (i, j, k) = grid.dims().world_to_index(Vec3::new(4.5, 0.5, 0.5));
  assert!(!grid.is_material(i, j, k));
}

#[test]
fn degenerate_cylinder_stamps_a_sphere() {
  let mut a = ten_cube();
  let mut b = ten_cube();
  a.remove_cylinder(Vec3::ZERO, Vec3::ZERO, 2.0);
  b.remove_sphere(Vec3::ZERO, 2.0);
  assert_eq!(a.count_material(), b.count_material());
}

#[test]
fn material_count_is_monotone() {
  let mut grid = ten_cube();
  let mut previous = grid.count_material();
  for step in 0..5 {
    let center = Vec3::new(step as f32 - 2.0, 0.0, 0.0);
    grid.remove_sphere(center, 1.5);
    let current = grid.count_material();
    assert!(current <= previous, "count grew at step {step}");
    previous = current;
  }
}

#[test]
fn removal_is_local_to_the_cutter_aabb() {
  let mut grid = ten_cube();
  let center = Vec3::new(-3.0, -3.0, -3.0);
  let radius = 1.5;
  grid.remove_sphere(center, radius);

  // Every cell outside the cutter AABB expanded by one voxel is untouched
  let clear_zone = Aabb::from_center_size(center, Vec3::splat(2.0 * radius)).expanded(1.0);
  let (nx, ny, nz) = grid.dims().counts();
  for i in 0..nx {
    for j in 0..ny {
      for k in 0..nz {
        let p = grid.dims().cell_center(i as i64, j as i64, k as i64);
        if !clear_zone.contains(p) {
          assert!(grid.is_material(i, j, k), "cell at {p:?} was touched");
        }
      }
    }
  }
}

#[test]
fn reset_restores_full_stock() {
  let mut grid = ten_cube();
  grid.remove_sphere(Vec3::ZERO, 3.0);
  assert!(grid.count_material() < 1000);

  grid.reset();
  assert_eq!(grid.count_material(), 1000);
  assert!(grid.is_pristine());
}

#[test]
fn occupancy_samples_are_half_voxel_pseudo_distances() {
  let mut grid = ten_cube();
  assert_eq!(grid.sample(0, 0, 0), -0.5);
  // Outside the grid reads as air
  assert_eq!(grid.sample(-1, 0, 0), 0.5);
  assert_eq!(grid.sample(10, 0, 0), 0.5);

  grid.remove_sphere(Vec3::splat(0.5), 0.9);
  let (i, j, k) = grid.dims().world_to_index(Vec3::splat(0.5));
  assert_eq!(grid.sample(i as i64, j as i64, k as i64), 0.5);
}
