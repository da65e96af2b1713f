use criterion::*;
use fortune_voronoi::{generate, BoundingBox, Config, Sweep};
use geo::Rect;
use rand::{rngs::StdRng, SeedableRng};

const BBOX: [f64; 2] = [1024., 1024.];

#[path = "utils/random.rs"]
mod random;
use random::*;

fn sweep_only(c: &mut Criterion) {
    let bounds: Rect<f64> = Rect::new([0., 0.], BBOX);
    let mut group = c.benchmark_group("Fortune - uniform random sites");
    for &num_sites in &[1_000, 10_000, 100_000] {
        let sites = uniform_sites(&mut StdRng::seed_from_u64(1), bounds, num_sites);
        group.throughput(Throughput::Elements(num_sites as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_sites), &sites, |b, sites| {
            b.iter(|| {
                let mut sweep = Sweep::new(sites.iter().copied());
                sweep.run();
                black_box(sweep.finish());
            })
        });
    }
    group.finish();
}

fn bound_and_clip(c: &mut Criterion) {
    const NUM_SITES: usize = 10_000;
    let bounds: Rect<f64> = Rect::new([0., 0.], BBOX);
    let sites = uniform_sites(&mut StdRng::seed_from_u64(2), bounds, NUM_SITES);
    let clip_box = BoundingBox::new(BBOX[0] / 4., BBOX[1] / 4., BBOX[0] * 0.75, BBOX[1] * 0.75);

    c.bench_function("Fortune - sweep and bound", |b| {
        b.iter(|| black_box(generate(sites.iter().copied(), &Config::auto())))
    });
    c.bench_function("Fortune - sweep, bound and clip", |b| {
        b.iter(|| {
            black_box(generate(
                sites.iter().copied(),
                &Config::bounded(clip_box).with_clip(true),
            ))
        })
    });
}

fn clustered_sites(c: &mut Criterion) {
    const NUM_SITES: usize = 10_000;
    let bounds: Rect<f64> = Rect::new([0., 0.], BBOX);
    let sites = normal_sites(&mut StdRng::seed_from_u64(3), bounds, NUM_SITES);

    c.bench_function("Fortune - clustered random sites", |b| {
        b.iter(|| black_box(generate(sites.iter().copied(), &Config::auto())))
    });
}

criterion_group!(random, sweep_only, bound_and_clip, clustered_sites);
criterion_main!(random);
