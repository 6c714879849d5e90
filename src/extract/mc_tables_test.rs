use glam::Vec3;

use super::*;

#[test]
fn edges_connect_adjacent_corners() {
  for &[c0, c1] in &EDGE_CORNERS {
    let a = CORNER_OFFSETS[c0];
    let b = CORNER_OFFSETS[c1];
    let diff = (a.0 - b.0).abs() + (a.1 - b.1).abs() + (a.2 - b.2).abs();
    assert_eq!(diff, 1, "edge [{c0}, {c1}] must span exactly one axis");
  }
}

#[test]
fn homogeneous_cases_are_empty() {
  assert_eq!(EDGE_TABLE[0], 0);
  assert_eq!(EDGE_TABLE[255], 0);
  assert_eq!(TRI_TABLE[0][0], -1);
  assert_eq!(TRI_TABLE[255][0], -1);
}

#[test]
fn mixed_cases_produce_geometry() {
  for case in 1..255usize {
    assert_ne!(EDGE_TABLE[case], 0, "case {case} crosses no edge");
    assert_ne!(TRI_TABLE[case][0], -1, "case {case} emits no triangle");
  }
}

#[test]
fn triangles_use_only_crossed_edges() {
  for case in 0..256usize {
    let edge_mask = EDGE_TABLE[case];
    for &edge in TRI_TABLE[case].iter().take_while(|&&e| e >= 0) {
      assert!((0..12).contains(&edge), "case {case} uses edge {edge}");
      assert!(
        edge_mask & (1 << edge) != 0,
        "case {case} places a vertex on uncrossed edge {edge}"
      );
    }
  }
}

#[test]
fn entries_are_triplets_with_trailing_padding() {
  for case in 0..256usize {
    let row = &TRI_TABLE[case];
    let used = row.iter().take_while(|&&e| e >= 0).count();
    assert_eq!(used % 3, 0, "case {case} has a partial triangle");
    assert!(used <= 15, "case {case} exceeds five triangles");
    assert!(
      row[used..].iter().all(|&e| e == -1),
      "case {case} has data after the terminator"
    );
  }
}

#[test]
fn complement_cases_cross_the_same_edges() {
  // Inverting material and air leaves the crossing set unchanged. The
  // triangulations themselves may differ (ambiguous cases resolve toward
  // a fixed diagonal), so only the edge masks are compared.
  for case in 0..256usize {
    assert_eq!(EDGE_TABLE[case], EDGE_TABLE[255 - case]);
  }
}

#[test]
fn single_air_corner_winds_outward() {
  // Case 1: only corner 0 samples air. The lone triangle must face that
  // corner (normals point from material into air).
  let row = &TRI_TABLE[1];
  let midpoint = |edge: i8| {
    let [c0, c1] = EDGE_CORNERS[edge as usize];
    let a = CORNER_OFFSETS[c0];
    let b = CORNER_OFFSETS[c1];
    Vec3::new(
      (a.0 + b.0) as f32 * 0.5,
      (a.1 + b.1) as f32 * 0.5,
      (a.2 + b.2) as f32 * 0.5,
    )
  };

  let (p0, p1, p2) = (midpoint(row[0]), midpoint(row[1]), midpoint(row[2]));
  let normal = (p1 - p0).cross(p2 - p0);
  let toward_air = Vec3::ZERO - Vec3::splat(0.5);
  assert!(
    normal.dot(toward_air) > 0.0,
    "case 1 triangle winds away from the air corner"
  );
  assert_eq!(row[3], -1);
}
