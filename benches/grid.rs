use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use voxsketch::*;

const SIZE: [i32; 3] = [64, 10, 64];

fn run_extrude() -> usize {
    let mut grid = VoxelGrid::with_size(SIZE.into());
    grid.set_corners([4, 0, 4].into(), [40, 0, 40].into());
    grid.make_box(8);
    grid.take_dirty().len()
}

fn run_random_boxes() -> usize {
    let mut grid = VoxelGrid::with_size(SIZE.into());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    place_random_boxes(&mut rng, &mut grid, 10, 10, 15, 10, 15);
    grid.take_dirty().len()
}

fn run_codec_roundtrip(grid: &VoxelGrid) -> usize {
    let image = image_from_grid(grid, 0, true).fit256([1.0; 4]);

    let mut decoded = VoxelGrid::with_size(SIZE.into());
    let params = DecodeParams {
        mark_occupied: true,
        ..DecodeParams::default()
    };
    states_from_image(&mut decoded, &image, &params);
    occupied_columns(&decoded).len()
}

fn benchmark_grid(c: &mut Criterion) {
    let mut populated = VoxelGrid::with_size(SIZE.into());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    place_random_boxes(&mut rng, &mut populated, 10, 10, 15, 10, 15);

    let mut group = c.benchmark_group("grid");
    group.bench_function("extrude", |b| b.iter(|| black_box(run_extrude())));
    group.bench_function("random_boxes", |b| b.iter(|| black_box(run_random_boxes())));
    group.bench_function("codec_roundtrip", |b| {
        b.iter(|| black_box(run_codec_roundtrip(&populated)))
    });
    group.bench_function("topology_rebuild", |b| {
        b.iter(|| black_box(Topology::new(SIZE.into()).faces(Axis::X).len()))
    });
    group.finish();
}

criterion_group!(benches, benchmark_grid);
criterion_main!(benches);
