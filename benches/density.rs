use criterion::{Criterion, black_box, criterion_group, criterion_main};
use exitwave::{CoordinateGrid, GaussianIce, Ice, ImageConfig, RealVoxelGrid};
use ndarray::Array2;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_atom_cloud(count: usize) -> (Array2<f64>, Vec<u32>) {
    let mut rng = StdRng::seed_from_u64(17);
    let positions = Array2::from_shape_fn((count, 3), |_| rng.gen_range(-4.0..4.0));
    let elements = (0..count)
        .map(|i| [1, 6, 7, 8][i % 4])
        .collect();
    (positions, elements)
}

fn bench_voxel_build(c: &mut Criterion) {
    let (positions_16, elements_16) = make_atom_cloud(16);
    let (positions_64, elements_64) = make_atom_cloud(64);
    let grid = CoordinateGrid::new(&[32, 32, 32], 0.5).unwrap();

    let mut group = c.benchmark_group("voxel_build");
    group.bench_function("16_atoms_32cubed", |b| {
        b.iter(|| {
            RealVoxelGrid::from_atoms(
                black_box(&positions_16),
                black_box(&elements_16),
                0.5,
                &grid,
            )
            .unwrap()
        })
    });
    group.bench_function("64_atoms_32cubed", |b| {
        b.iter(|| {
            RealVoxelGrid::from_atoms(
                black_box(&positions_64),
                black_box(&elements_64),
                0.5,
                &grid,
            )
            .unwrap()
        })
    });
    group.finish();
}

fn bench_ice_sampling(c: &mut Criterion) {
    let config = ImageConfig::new((256, 256), 1.0, 1.5).unwrap();
    let exit_plane = Array2::from_elem(config.shape(), Complex64::new(1.0, 0.0));
    let ice = GaussianIce::default();

    let mut group = c.benchmark_group("ice_sampling");
    group.bench_function("render_256_padded_1_5x", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            ice.render(black_box(seed), &exit_plane, &config).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_voxel_build, bench_ice_sampling);
criterion_main!(benches);
