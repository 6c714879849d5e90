use approx::assert_relative_eq;
use glam::Vec3;

use super::*;

/// Unit cube as 12 unshared triangles with outward winding.
fn unit_cube_soup() -> Mesh {
  let mut mesh = Mesh::new();
  let lo = Vec3::ZERO;
  let hi = Vec3::ONE;

  let mut quad = |a: Vec3, b: Vec3, c: Vec3, d: Vec3| {
    mesh.push_triangle(a, b, c);
    mesh.push_triangle(a, c, d);
  };

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

#[test]
fn empty_mesh() {
  let mesh = Mesh::new();
  assert!(mesh.is_empty());
  assert_eq!(mesh.triangle_count(), 0);
  assert!(!mesh.bounds().is_valid());
  assert!(!mesh.is_watertight());
}

#[test]
fn push_triangle_assigns_face_normal() {
  let mut mesh = Mesh::new();
  mesh.push_triangle(
    Vec3::ZERO,
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
  );

  assert_eq!(mesh.triangle_count(), 1);
  assert!(mesh.face_normal(0).abs_diff_eq(Vec3::Z, 1e-6));
  for n in mesh.normals() {
    assert!(n.abs_diff_eq(Vec3::Z, 1e-6));
  }
}

#[test]
fn cube_bounds_and_area() {
  let mesh = unit_cube_soup();
  assert_eq!(mesh.triangle_count(), 12);
  assert_eq!(mesh.bounds().min, Vec3::ZERO);
  assert_eq!(mesh.bounds().max, Vec3::ONE);
  assert_relative_eq!(mesh.surface_area(), 6.0, epsilon = 1e-5);
}

#[test]
fn cube_soup_is_watertight() {
  // Soup vertices are welded by position before the edge pairing check
  assert!(unit_cube_soup().is_watertight());
}

#[test]
fn open_mesh_is_not_watertight() {
  let mut mesh = Mesh::new();
  mesh.push_triangle(
    Vec3::ZERO,
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
  );
  assert!(!mesh.is_watertight());
}

#[test]
fn cube_face_normals_point_outward() {
  let mesh = unit_cube_soup();
  let center = Vec3::splat(0.5);
  for t in 0..mesh.triangle_count() {
    let [a, b, c] = mesh.triangle(t);
    let centroid = (a + b + c) / 3.0;
    assert!(
      mesh.face_normal(t).dot(centroid - center) > 0.0,
      "triangle {t} winds inward"
    );
  }
}

#[test]
fn triangle_iteration_matches_indexing() {
  let mesh = unit_cube_soup();
  let collected: Vec<_> = mesh.triangles().collect();
  assert_eq!(collected.len(), mesh.triangle_count());
  assert_eq!(collected[3], mesh.triangle(3));
}
