use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use ballin::projection::{OutOfRangePolicy, Surface, project_all};
use ballin::shot::{Player, Shot};
use ballin::similarity::rank_similar;
use ballin::synthetic::{ShooterProfile, generate_shots};
use ballin::zones::ZoneSummary;

fn sample_shots(seed: u64, count: usize, profile: &ShooterProfile) -> Vec<Shot> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_shots(&mut rng, profile, count)
}

fn bench_project_small(c: &mut Criterion) {
    let shots = sample_shots(1, 1_500, &ShooterProfile::default());
    c.bench_function("project_all_1500", |b| {
        b.iter(|| {
            let points = project_all(
                black_box(&shots),
                Surface::DEFAULT,
                OutOfRangePolicy::Clamp,
            );
            black_box(points.len());
        })
    });
}

fn bench_project_season(c: &mut Criterion) {
    let shots = sample_shots(2, 40_000, &ShooterProfile::default());
    c.bench_function("project_all_40000", |b| {
        b.iter(|| {
            let points = project_all(
                black_box(&shots),
                Surface::new(1280.0, 1200.0),
                OutOfRangePolicy::Reject,
            );
            black_box(points.len());
        })
    });
}

fn bench_zone_summary(c: &mut Criterion) {
    let shots = sample_shots(3, 2_000, &ShooterProfile::spot_up());
    c.bench_function("zone_summary_2000", |b| {
        b.iter(|| {
            let summary = ZoneSummary::from_shots(black_box(&shots));
            black_box(summary.efg_pct());
        })
    });
}

fn bench_rank_similar(c: &mut Criterion) {
    let user = sample_shots(4, 300, &ShooterProfile::default());
    let profiles = [
        ShooterProfile::default(),
        ShooterProfile::spot_up(),
        ShooterProfile::interior(),
    ];
    let candidates = (0..26u64)
        .map(|i| {
            Arc::new(Player {
                name: format!("Player {i}"),
                id: i.to_string(),
                bio: None,
                shots: sample_shots(100 + i, 1_200, &profiles[i as usize % profiles.len()]),
            })
        })
        .collect::<Vec<_>>();
    c.bench_function("rank_similar_26", |b| {
        b.iter(|| {
            let ranked = rank_similar(black_box(&user), black_box(&candidates));
            black_box(ranked.first().map(|p| p.score));
        })
    });
}

criterion_group!(
    benches,
    bench_project_small,
    bench_project_season,
    bench_zone_summary,
    bench_rank_similar
);
criterion_main!(benches);
