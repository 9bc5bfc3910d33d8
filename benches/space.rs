#[macro_use]
extern crate bencher;

use bencher::{black_box, Bencher};

use nalgebra as na;
use ndarray as nd;
use nd::ShapeBuilder;
use rand::Rng;

use tensorspace_lib::Space;

const N: usize = 64;

fn random_data(len: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen::<f32>()).collect()
}

// sums a column major matrix by rows, the slow direction on purpose
fn bench_space_get(bench: &mut Bencher) {
    let m = Space::column_major_matrix(N, N, None).unwrap();
    let data = random_data(m.len());
    bench.iter(|| {
        let mut acc = 0.0f32;
        for i in 0..N {
            for j in 0..N {
                acc += m.get(&data, (i, j));
            }
        }
        black_box(acc)
    });
}

fn bench_space_get_unchecked(bench: &mut Bencher) {
    let m = Space::column_major_matrix(N, N, None).unwrap();
    let data = random_data(m.len());
    bench.iter(|| {
        let mut acc = 0.0f32;
        for i in 0..N {
            for j in 0..N {
                acc += unsafe { m.get_unchecked(&data, (i, j)) };
            }
        }
        black_box(acc)
    });
}

fn bench_space_set_rank3(bench: &mut Bencher) {
    let s = Space::build(&[16, 16, 16], Some(&[2, 0, 1]), None).unwrap();
    let mut data = s.create_vec::<f32>();
    bench.iter(|| {
        for i in 0..16 {
            for j in 0..16 {
                for k in 0..16 {
                    s.set(&mut data, [i, j, k], (i + j + k) as f32);
                }
            }
        }
        black_box(&data);
    });
}

fn bench_nd(bench: &mut Bencher) {
    let data = random_data(N * N);
    let a = nd::ArrayView2::from_shape((N, N).f(), &data).unwrap();
    bench.iter(|| {
        let mut acc = 0.0f32;
        for i in 0..N {
            for j in 0..N {
                acc += a[[i, j]];
            }
        }
        black_box(acc)
    });
}

fn bench_na(bench: &mut Bencher) {
    let data = random_data(N * N);
    let a = na::DMatrix::from_column_slice(N, N, &data);
    bench.iter(|| {
        let mut acc = 0.0f32;
        for i in 0..N {
            for j in 0..N {
                acc += a[(i, j)];
            }
        }
        black_box(acc)
    });
}

benchmark_group!(benches, bench_space_get, bench_space_get_unchecked, bench_space_set_rank3, bench_nd, bench_na);
benchmark_main!(benches);
