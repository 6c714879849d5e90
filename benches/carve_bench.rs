//! Benchmarks for the cutting kernels and both surface extractors on a
//! 100³-cell stock.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec3;
use millvox::{extract, Aabb, ExtractMethod, SdfGrid, Stock, Tool, VoxelGrid};

/// 50 mm stock cube at 0.5 mm resolution: 100³ cells.
fn stock_bounds() -> Aabb {
  Aabb::new(Vec3::ZERO, Vec3::splat(50.0))
}

fn bench_linear_cut(c: &mut Criterion) {
  let tool = Tool::flat(6.0, 30.0);
  let a = Vec3::new(-5.0, 25.0, 45.0);
  let b = Vec3::new(55.0, 25.0, 45.0);

  let mut group = c.benchmark_group("cut_linear");

  group.bench_function("voxel_100", |bench| {
    bench.iter_batched(
      || VoxelGrid::new(stock_bounds(), 0.5).unwrap(),
      |mut grid| {
        grid.cut_linear(&tool, a, b).unwrap();
        black_box(grid.count_material())
      },
      BatchSize::LargeInput,
    )
  });

  group.bench_function("sdf_100", |bench| {
    bench.iter_batched(
      || SdfGrid::new(stock_bounds(), 0.5).unwrap(),
      |mut grid| {
        grid.cut_linear(&tool, a, b).unwrap();
        black_box(grid.dims().cell_count())
      },
      BatchSize::LargeInput,
    )
  });

  group.finish();
}

fn bench_extract(c: &mut Criterion) {
  let tool = Tool::ball_end(8.0, 30.0);
  let a = Vec3::new(10.0, 25.0, 48.0);
  let b = Vec3::new(40.0, 25.0, 48.0);

  let mut voxel = VoxelGrid::new(stock_bounds(), 0.5).unwrap();
  voxel.cut_linear(&tool, a, b).unwrap();

  let mut sdf = SdfGrid::new(stock_bounds(), 0.5).unwrap();
  sdf.cut_linear(&tool, a, b).unwrap();

  let mut group = c.benchmark_group("extract");

  group.bench_function("marching_cubes_voxel", |bench| {
    bench.iter(|| black_box(extract(&voxel, ExtractMethod::MarchingCubes).triangle_count()))
  });

  group.bench_function("marching_cubes_sdf", |bench| {
    bench.iter(|| black_box(extract(&sdf, ExtractMethod::MarchingCubes).triangle_count()))
  });

  group.bench_function("dual_contouring_sdf", |bench| {
    bench.iter(|| black_box(extract(&sdf, ExtractMethod::DualContouring).triangle_count()))
  });

  group.finish();
}

criterion_group!(benches, bench_linear_cut, bench_extract);
criterion_main!(benches);
