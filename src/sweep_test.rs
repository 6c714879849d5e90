use glam::Vec3;

use super::*;
use crate::error::MillError;
use crate::geometry::Aabb;
use crate::voxel_grid::VoxelGrid;

fn stock_20mm(h: f32) -> VoxelGrid {
  VoxelGrid::new(Aabb::new(Vec3::ZERO, Vec3::splat(20.0)), h).unwrap()
}

#[test]
fn default_steps_guarantees_sub_voxel_motion() {
  assert_eq!(default_steps(10.0, 1.0), 20);
  assert_eq!(default_steps(0.1, 1.0), 1);
  assert_eq!(default_steps(0.0, 1.0), 1);
  assert_eq!(default_steps(10.0, 0.5), 40);
}

#[test]
fn invalid_tool_fails_before_cutting() {
  let mut grid = stock_20mm(1.0);
  let bad = Tool::flat(0.0, 10.0);
  let result = grid.cut_linear(&bad, Vec3::splat(5.0), Vec3::splat(15.0));
  assert!(matches!(result, Err(MillError::InvalidTool(_))));
  assert_eq!(grid.count_material(), 8000);
}

#[test]
fn motion_outside_the_stock_is_clipped_away() {
  let mut grid = stock_20mm(1.0);
  let tool = Tool::flat(2.0, 10.0);
  grid
    .cut_linear(&tool, Vec3::new(40.0, 40.0, 0.0), Vec3::new(60.0, 40.0, 0.0))
    .unwrap();
  assert_eq!(grid.count_material(), 8000);
  assert!(grid.is_pristine());
}

#[test]
fn zero_length_motion_stamps_once() {
  let bounds = Aabb::new(Vec3::splat(-5.0), Vec3::splat(5.0));
  let mut grid = VoxelGrid::new(bounds, 1.0).unwrap();
  let tool = Tool::flat(2.0, 10.0);

  grid
    .cut_linear(&tool, Vec3::ZERO, Vec3::ZERO)
    .unwrap();

  // Four xy-centers within 1 mm of the axis, five z-layers in [0, 10]
  assert_eq!(grid.count_material(), 1000 - 20);
}

#[test]
fn long_motion_clips_and_terminates() {
  let mut grid = stock_20mm(1.0);
  let tool = Tool::flat(2.0, 10.0);
  grid
    .cut_linear(
      &tool,
      Vec3::new(-100.0, 10.0, 10.0),
      Vec3::new(120.0, 10.0, 10.0),
    )
    .unwrap();
  assert!(grid.count_material() < 8000);
}

#[test]
fn five_axis_cut_removes_material_within_the_swept_bound() {
  let bounds = Aabb::new(Vec3::new(-5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 15.0));
  let mut grid = VoxelGrid::new(bounds, 1.0).unwrap();
  let reference = grid.clone();
  let tool = Tool::flat(2.0, 10.0);

  let a = Vec3::new(0.0, 0.0, 5.0);
  let b = Vec3::new(10.0, 0.0, 5.0);
  grid
    .cut_linear_oriented(&tool, a, b, Vec3::Z, Vec3::X, Some(20))
    .unwrap();

  assert!(grid.count_material() < reference.count_material());

  // Affected cells stay inside the union of the end-pose AABBs plus one
  // voxel
  let swept = ToolPose::new(a, Vec3::Z)
    .world_aabb(&tool)
    .union(&ToolPose::new(b, Vec3::X).world_aabb(&tool))
    .expanded(1.0);
  let (nx, ny, nz) = grid.dims().counts();
  for i in 0..nx {
    for j in 0..ny {
      for k in 0..nz {
        let p = grid.dims().cell_center(i as i64, j as i64, k as i64);
        if !swept.contains(p) {
          assert!(
            grid.is_material(i, j, k) == reference.is_material(i, j, k),
            "cell at {p:?} outside the swept bound changed"
          );
        }
      }
    }
  }
}

#[test]
fn larger_tool_removes_a_superset() {
  let mut grid = stock_20mm(0.5);
  let a = Vec3::new(5.0, 10.0, 10.0);
  let b = Vec3::new(15.0, 10.0, 10.0);

  grid.cut_linear(&Tool::flat(2.0, 10.0), a, b).unwrap();
  let after_small = grid.count_material();

  grid.cut_linear(&Tool::flat(5.0, 10.0), a, b).unwrap();
  let after_large = grid.count_material();
  assert!(after_large < after_small);

  // Every center within 2.4 mm of the path axis (and inside the flute
  // span) is gone after the second pass
  let (nx, ny, nz) = grid.dims().counts();
  for i in 0..nx {
    for j in 0..ny {
      for k in 0..nz {
        let p = grid.dims().cell_center(i as i64, j as i64, k as i64);
        if p.z < 10.2 || p.z > 19.8 {
          continue;
        }
        let t = ((p - a).dot(b - a) / (b - a).length_squared()).clamp(0.0, 1.0);
        let closest = a + (b - a) * t;
        if (p.truncate() - closest.truncate()).length() <= 2.4 {
          assert!(!grid.is_material(i, j, k), "cell at {p:?} survived");
        }
      }
    }
  }
}

#[test]
fn arc_cut_follows_the_circle() {
  let mut grid = stock_20mm(1.0);
  let tool = Tool::flat(2.0, 5.0);

  // CCW quarter arc of radius 4 about (10, 10)
  let a = Vec3::new(14.0, 10.0, 10.0);
  let b = Vec3::new(10.0, 14.0, 10.0);
  let center = Vec3::new(10.0, 10.0, 10.0);
  grid.cut_arc(&tool, a, b, center, false).unwrap();

  assert!(grid.count_material() < 8000);

  // Mid-arc sample point is removed
  let mid = Vec3::new(
    10.0 + 4.0 * (std::f32::consts::FRAC_PI_4).cos(),
    10.0 + 4.0 * (std::f32::consts::FRAC_PI_4).sin(),
    10.5,
  );
  let (i, j, k) = grid.dims().world_to_index(mid);
  assert!(!grid.is_material(i, j, k));

  // The arc center itself stays untouched
  let (i, j, k) = grid.dims().world_to_index(center + Vec3::splat(0.5));
  assert!(grid.is_material(i, j, k));
}

#[test]
fn degenerate_arc_falls_back_to_linear() {
  let mut grid = stock_20mm(1.0);
  let tool = Tool::flat(2.0, 5.0);
  let a = Vec3::new(5.0, 5.0, 10.0);
  let b = Vec3::new(15.0, 5.0, 10.0);
  // Start coincides with the arc center: no circle to follow
  grid.cut_arc(&tool, a, b, a, true).unwrap();
  assert!(grid.count_material() < 8000);
}
