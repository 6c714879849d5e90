use glam::Vec3;

use super::*;
use crate::geometry::Aabb;
use crate::sdf_grid::SdfGrid;
use crate::voxel_grid::VoxelGrid;

fn sdf_with_cavity() -> SdfGrid {
  let bounds = Aabb::new(Vec3::splat(-5.0), Vec3::splat(5.0));
  let mut grid = SdfGrid::new(bounds, 0.5).unwrap();
  grid.remove_sphere(Vec3::ZERO, 3.0);
  grid
}

#[test]
fn cavity_mesh_is_closed() {
  let grid = sdf_with_cavity();
  let mesh = generate(&grid);

  assert!(!mesh.is_empty());
  assert!(mesh.is_watertight());
}

#[test]
fn one_vertex_per_surface_cube() {
  // Shared-vertex output: far fewer vertices than triangle corners
  let grid = sdf_with_cavity();
  let mesh = generate(&grid);
  assert!(mesh.vertices().len() < mesh.indices().len() / 2);
}

#[test]
fn qef_vertices_track_the_sphere() {
  let grid = sdf_with_cavity();
  let mesh = generate(&grid);

  let mut cavity = 0;
  for v in mesh.vertices() {
    let d = v.length();
    if d < 4.0 {
      assert!(
        (d - 3.0).abs() < 0.2,
        "cavity vertex {v:?} is {d} from the center"
      );
      cavity += 1;
    }
  }
  assert!(cavity > 50, "expected a contoured cavity, got {cavity}");
}

#[test]
fn vertices_stay_inside_their_cubes() {
  // The QEF solution is clamped, so nothing can leave the stock bounds by
  // more than the one-cube apron
  let grid = sdf_with_cavity();
  let mesh = generate(&grid);
  let allowed = grid.dims().bounds().expanded(grid.dims().h());
  for v in mesh.vertices() {
    assert!(allowed.contains(*v), "vertex {v:?} left its cube");
  }
}

#[test]
fn normals_point_into_the_cavity() {
  let grid = sdf_with_cavity();
  let mesh = generate(&grid);

  for (v, n) in mesh.vertices().iter().zip(mesh.normals()) {
    if v.length() < 4.0 {
      // Gradient normals: from material toward the removed air
      assert!(n.dot(-*v) > 0.0, "vertex {v:?} normal {n:?} points into stock");
    }
  }
}

#[test]
fn triangle_windings_match_gradient_normals() {
  let grid = sdf_with_cavity();
  let mesh = generate(&grid);

  let mut disagreements = 0;
  for t in 0..mesh.triangle_count() {
    let face = mesh.face_normal(t);
    let base = t * 3;
    let avg = (0..3)
      .map(|c| mesh.normals()[mesh.indices()[base + c] as usize])
      .fold(Vec3::ZERO, |acc, n| acc + n);
    if face.dot(avg) <= 0.0 {
      disagreements += 1;
    }
  }
  // A consistent winding convention agrees with the gradient everywhere on
  // a smooth cavity; a flipped one would disagree on essentially every
  // triangle
  assert!(
    disagreements * 100 < mesh.triangle_count(),
    "{disagreements} of {} triangles wind against the field",
    mesh.triangle_count()
  );
}

#[test]
fn boolean_stock_contours_too() {
  // Occupancy data degrades to centroid placement but stays closed
  let bounds = Aabb::new(Vec3::splat(-5.0), Vec3::splat(5.0));
  let mut grid = VoxelGrid::new(bounds, 1.0).unwrap();
  grid.remove_sphere(Vec3::ZERO, 3.0);

  let mesh = generate(&grid);
  assert!(!mesh.is_empty());
  assert!(mesh.is_watertight());
}

#[test]
fn extraction_is_deterministic() {
  let grid = sdf_with_cavity();
  let first = generate(&grid);
  let second = generate(&grid);
  assert_eq!(first.vertices(), second.vertices());
  assert_eq!(first.indices(), second.indices());
}
